//! Free-text sanitization applied before anything user supplied is stored or
//! echoed back in an email.
//!
//! Angle brackets and control characters (other than newline and tab) are
//! dropped, then surrounding whitespace is trimmed. Both steps are
//! idempotent and the second can't reintroduce anything the first removes,
//! so `sanitize(sanitize(s)) == sanitize(s)` for every input.

/// Strips unsafe characters from a free-text field.
pub fn sanitize(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !is_unsafe(*c)).collect();
    stripped.trim().to_string()
}

/// Same as [`sanitize`] but maps an absent value to the empty string.
pub fn sanitize_optional(text: Option<&str>) -> String {
    text.map(sanitize).unwrap_or_default()
}

/// Sanitizes an optional field, keeping `None` when the cleaned value is empty.
pub(crate) fn sanitize_opt(text: &Option<String>) -> Option<String> {
    text.as_deref().map(sanitize).filter(|s| !s.is_empty())
}

fn is_unsafe(c: char) -> bool {
    match c {
        '<' | '>' => true,
        '\n' | '\t' => false,
        c => c.is_control(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "Kouassi Yao",
        "  <script>alert('x')</script>  ",
        "a <",
        "\u{0} leading nul",
        "tabs\tand\nnewlines\r\n",
        "<<>> ",
        " \u{7}bell\u{1b}[0m ",
        "Société Ivoirienne de Cacao – Abidjan",
        "Москва, Россия",
        "x<\n>y",
    ];

    #[test]
    fn keeps_well_formed_text() {
        assert_eq!(sanitize("Kouassi Yao"), "Kouassi Yao");
        assert_eq!(
            sanitize("Société Ivoirienne de Cacao"),
            "Société Ivoirienne de Cacao"
        );
        assert_eq!(sanitize("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn strips_markup_and_controls() {
        assert_eq!(sanitize("<b>bold</b>"), "bbold/b");
        assert_eq!(sanitize("a\u{0}b\u{7}c"), "abc");
        assert_eq!(sanitize("  padded  "), "padded");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for sample in SAMPLES {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn optional_absent_becomes_empty() {
        assert_eq!(sanitize_optional(None), "");
        assert_eq!(sanitize_optional(Some(" <hi> ")), "hi");
    }

    #[test]
    fn optional_blank_collapses_to_none() {
        assert_eq!(sanitize_opt(&Some("  <> ".to_string())), None);
        assert_eq!(sanitize_opt(&Some(" ok ".to_string())), Some("ok".to_string()));
        assert_eq!(sanitize_opt(&None), None);
    }
}
