//! Email document tree and its two wire renderings.
//!
//! Templates build a [`Document`] out of plain strings; escaping happens
//! only here, when the tree is serialized to HTML.

use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    /// Label/value pairs rendered as a two-column table.
    Fields(Vec<(String, String)>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Verbatim user text, e.g. a contact message.
    Quote(String),
    Divider,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub lang: &'static str,
    pub subject: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(lang: &'static str, subject: impl Into<String>) -> Self {
        Self {
            lang,
            subject: subject.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<!DOCTYPE html><html lang=\"{}\"><head><meta charset=\"utf-8\"><title>{}</title></head>\
             <body style=\"font-family:Arial,sans-serif;color:#1f2937;line-height:1.5\">",
            self.lang,
            escape(&self.subject)
        );

        for block in &self.blocks {
            match block {
                Block::Heading(text) => {
                    let _ = write!(out, "<h2 style=\"color:#14532d\">{}</h2>", escape(text));
                }
                Block::Paragraph(text) => {
                    let _ = write!(out, "<p>{}</p>", multiline(text));
                }
                Block::Fields(pairs) => {
                    out.push_str("<table cellpadding=\"4\">");
                    for (label, value) in pairs {
                        let _ = write!(
                            out,
                            "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
                            escape(label),
                            multiline(value)
                        );
                    }
                    out.push_str("</table>");
                }
                Block::Table { headers, rows } => {
                    out.push_str("<table cellpadding=\"4\" border=\"1\" style=\"border-collapse:collapse\"><tr>");
                    for header in headers {
                        let _ = write!(out, "<th>{}</th>", escape(header));
                    }
                    out.push_str("</tr>");
                    for row in rows {
                        out.push_str("<tr>");
                        for cell in row {
                            let _ = write!(out, "<td>{}</td>", escape(cell));
                        }
                        out.push_str("</tr>");
                    }
                    out.push_str("</table>");
                }
                Block::Quote(text) => {
                    let _ = write!(
                        out,
                        "<blockquote style=\"border-left:3px solid #14532d;padding-left:12px\">{}</blockquote>",
                        multiline(text)
                    );
                }
                Block::Divider => out.push_str("<hr>"),
            }
        }

        out.push_str("</body></html>");
        out
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Heading(text) => {
                    let _ = writeln!(out, "{text}");
                    let _ = writeln!(out, "{}", "=".repeat(text.chars().count()));
                }
                Block::Paragraph(text) | Block::Quote(text) => {
                    let _ = writeln!(out, "{text}");
                }
                Block::Fields(pairs) => {
                    for (label, value) in pairs {
                        let _ = writeln!(out, "{label}: {value}");
                    }
                }
                Block::Table { headers, rows } => {
                    let _ = writeln!(out, "{}", headers.join(" | "));
                    for row in rows {
                        let _ = writeln!(out, "{}", row.join(" | "));
                    }
                }
                Block::Divider => out.push_str("----\n"),
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn multiline(text: &str) -> String {
    escape(text).replace('\n', "<br>")
}
