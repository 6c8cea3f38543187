//! Pure rendering of lead emails.
//!
//! Body copy exists in French and English; every other locale reads the
//! English body. Contact and catalog-RFQ confirmations additionally carry
//! localized subject lines for es/de/ru.

use super::document::{Block, Document};
use crate::forms::{CatalogDownloadSubmission, ContactSubmission, RfqSubmission, Submission};
use crate::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Sales team receiving the lead.
    Operator,
    /// Person who submitted the form.
    Customer,
}

struct Labels {
    name: &'static str,
    email: &'static str,
    company: &'static str,
    phone: &'static str,
    country: &'static str,
    product: &'static str,
    quantity: &'static str,
    unit: &'static str,
    grade: &'static str,
    incoterm: &'static str,
    destination: &'static str,
    desired_date: &'static str,
    frequency: &'static str,
    notes: &'static str,
    subject: &'static str,
    topic: &'static str,
    job_title: &'static str,
    annual_volume: &'static str,
    reference: &'static str,
    catalog: &'static str,
    locale: &'static str,
    totals: &'static str,
    contact_heading: &'static str,
    products_heading: &'static str,
    delivery_heading: &'static str,
    message_heading: &'static str,
    greeting: &'static str,
    rfq_received: &'static str,
    contact_received: &'static str,
    catalog_sent: &'static str,
    follow_up: &'static str,
    signature: &'static str,
}

static FR: Labels = Labels {
    name: "Nom",
    email: "E-mail",
    company: "Société",
    phone: "Téléphone",
    country: "Pays",
    product: "Produit",
    quantity: "Quantité",
    unit: "Unité",
    grade: "Qualité",
    incoterm: "Incoterm",
    destination: "Destination",
    desired_date: "Date souhaitée",
    frequency: "Fréquence",
    notes: "Remarques",
    subject: "Objet",
    topic: "Catégorie",
    job_title: "Fonction",
    annual_volume: "Volume annuel",
    reference: "Référence",
    catalog: "Catalogue",
    locale: "Langue",
    totals: "Total",
    contact_heading: "Contact",
    products_heading: "Produits demandés",
    delivery_heading: "Livraison",
    message_heading: "Message",
    greeting: "Bonjour",
    rfq_received: "Nous avons bien reçu votre demande de devis. Notre équipe commerciale l'étudie et reviendra vers vous sous 48 heures ouvrées.",
    contact_received: "Nous avons bien reçu votre message et vous répondrons dans les meilleurs délais.",
    catalog_sent: "Merci de l'intérêt que vous portez à nos produits. Votre catalogue est disponible au téléchargement.",
    follow_up: "Pour toute question, répondez simplement à cet e-mail en rappelant votre référence.",
    signature: "L'équipe commerciale",
};

static EN: Labels = Labels {
    name: "Name",
    email: "Email",
    company: "Company",
    phone: "Phone",
    country: "Country",
    product: "Product",
    quantity: "Quantity",
    unit: "Unit",
    grade: "Grade",
    incoterm: "Incoterm",
    destination: "Destination",
    desired_date: "Desired date",
    frequency: "Frequency",
    notes: "Notes",
    subject: "Subject",
    topic: "Topic",
    job_title: "Job title",
    annual_volume: "Annual volume",
    reference: "Reference",
    catalog: "Catalog",
    locale: "Language",
    totals: "Total",
    contact_heading: "Contact",
    products_heading: "Requested products",
    delivery_heading: "Delivery",
    message_heading: "Message",
    greeting: "Hello",
    rfq_received: "We have received your quote request. Our sales team is reviewing it and will get back to you within 2 business days.",
    contact_received: "We have received your message and will reply as soon as possible.",
    catalog_sent: "Thank you for your interest in our products. Your catalog is ready to download.",
    follow_up: "If you have any questions, simply reply to this email and quote your reference.",
    signature: "The sales team",
};

fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::Fr => &FR,
        _ => &EN,
    }
}

/// Renders the email for `audience` about `submission`.
///
/// `locale` is the reader's locale: the operator's configured locale for
/// [`Audience::Operator`], the submitter's for [`Audience::Customer`].
pub fn render(locale: Locale, audience: Audience, submission: &Submission, reference: &str) -> Document {
    let l = labels(locale);
    let lang = if locale == Locale::Fr { "fr" } else { "en" };
    let subject = subject(locale, audience, submission, reference);
    let mut doc = Document::new(lang, subject);

    match audience {
        Audience::Operator => operator_body(&mut doc, l, submission, reference),
        Audience::Customer => customer_body(&mut doc, l, submission, reference),
    }
    doc
}

pub fn subject(locale: Locale, audience: Audience, submission: &Submission, reference: &str) -> String {
    match audience {
        Audience::Operator => operator_subject(locale, submission, reference),
        Audience::Customer => customer_subject(locale, submission, reference),
    }
}

fn operator_subject(locale: Locale, submission: &Submission, reference: &str) -> String {
    let fr = locale == Locale::Fr;
    let company = submission.company().unwrap_or_else(|| submission.name());
    match submission {
        Submission::Rfq(_) if fr => format!("Nouvelle demande de devis {reference} ({company})"),
        Submission::Rfq(_) => format!("New quote request {reference} ({company})"),
        Submission::CatalogRfq(s) if fr => format!(
            "Nouvelle demande catalogue {reference}: {} produit(s) ({company})",
            s.products.len()
        ),
        Submission::CatalogRfq(s) => format!(
            "New catalog quote request {reference}: {} product(s) ({company})",
            s.products.len()
        ),
        Submission::Contact(s) if fr => format!("Nouveau message de contact: {}", s.subject),
        Submission::Contact(s) => format!("New contact message: {}", s.subject),
        Submission::CatalogDownload(_) if fr => format!("Catalogue téléchargé par {company}"),
        Submission::CatalogDownload(_) => format!("Catalog downloaded by {company}"),
    }
}

fn customer_subject(locale: Locale, submission: &Submission, reference: &str) -> String {
    match (submission, locale) {
        (Submission::Rfq(_), Locale::Fr) => format!("Votre demande de devis {reference} a bien été reçue"),
        (Submission::Rfq(_), _) => format!("We received your quote request {reference}"),

        (Submission::CatalogRfq(_), Locale::Fr) => format!("Votre demande de devis {reference} a bien été reçue"),
        (Submission::CatalogRfq(_), Locale::En) => format!("We received your quote request {reference}"),
        (Submission::CatalogRfq(_), Locale::Es) => format!("Hemos recibido su solicitud de cotización {reference}"),
        (Submission::CatalogRfq(_), Locale::De) => format!("Wir haben Ihre Angebotsanfrage {reference} erhalten"),
        (Submission::CatalogRfq(_), Locale::Ru) => format!("Мы получили ваш запрос коммерческого предложения {reference}"),

        (Submission::Contact(_), Locale::Fr) => "Nous avons bien reçu votre message".to_string(),
        (Submission::Contact(_), Locale::En) => "We received your message".to_string(),
        (Submission::Contact(_), Locale::Es) => "Hemos recibido su mensaje".to_string(),
        (Submission::Contact(_), Locale::De) => "Wir haben Ihre Nachricht erhalten".to_string(),
        (Submission::Contact(_), Locale::Ru) => "Мы получили ваше сообщение".to_string(),

        (Submission::CatalogDownload(_), Locale::Fr) => "Votre catalogue".to_string(),
        (Submission::CatalogDownload(_), _) => "Your catalog".to_string(),
    }
}

fn operator_body(doc: &mut Document, l: &Labels, submission: &Submission, reference: &str) {
    let heading = doc.subject.clone();
    doc.push(Block::Heading(heading));
    doc.push(Block::Fields(vec![
        (l.reference.into(), reference.into()),
        (l.locale.into(), submission.locale().to_string()),
    ]));

    match submission {
        Submission::Rfq(s) | Submission::CatalogRfq(s) => rfq_sections(doc, l, s),
        Submission::Contact(s) => contact_sections(doc, l, s),
        Submission::CatalogDownload(s) => catalog_sections(doc, l, s),
    }
}

fn customer_body(doc: &mut Document, l: &Labels, submission: &Submission, reference: &str) {
    doc.push(Block::Paragraph(format!("{} {},", l.greeting, submission.name())));

    let intro = match submission {
        Submission::Rfq(_) | Submission::CatalogRfq(_) => l.rfq_received,
        Submission::Contact(_) => l.contact_received,
        Submission::CatalogDownload(_) => l.catalog_sent,
    };
    doc.push(Block::Paragraph(intro.to_string()));
    doc.push(Block::Fields(vec![(l.reference.into(), reference.into())]));

    if let Submission::Rfq(s) | Submission::CatalogRfq(s) = submission {
        doc.push(Block::Heading(l.products_heading.into()));
        doc.push(products_table(l, s));
    }

    doc.push(Block::Paragraph(l.follow_up.into()));
    doc.push(Block::Divider);
    doc.push(Block::Paragraph(l.signature.into()));
}

fn rfq_sections(doc: &mut Document, l: &Labels, s: &RfqSubmission) {
    let mut contact = vec![
        (l.name.into(), s.contact.name.clone()),
        (l.email.into(), s.contact.email.clone()),
        (l.company.into(), s.contact.company.clone()),
        (l.phone.into(), s.contact.phone.clone()),
    ];
    push_optional(&mut contact, l.country, s.contact.country.as_deref());
    doc.push(Block::Heading(l.contact_heading.into()));
    doc.push(Block::Fields(contact));

    doc.push(Block::Heading(l.products_heading.into()));
    doc.push(products_table(l, s));
    if s.products.len() > 1 {
        let totals = s
            .totals_by_unit()
            .into_iter()
            .map(|(unit, total)| format!("{} {unit}", format_quantity(total)))
            .collect::<Vec<_>>()
            .join(", ");
        doc.push(Block::Fields(vec![(l.totals.into(), totals)]));
    }

    let mut delivery = vec![
        (l.incoterm.into(), s.delivery.incoterm.as_str().to_string()),
        (l.destination.into(), s.delivery.destination.clone()),
    ];
    push_optional(&mut delivery, l.desired_date, s.delivery.desired_date.as_deref());
    push_optional(&mut delivery, l.frequency, s.delivery.frequency.map(|f| f.as_str()));
    doc.push(Block::Heading(l.delivery_heading.into()));
    doc.push(Block::Fields(delivery));

    if let Some(notes) = &s.notes {
        doc.push(Block::Heading(l.notes.into()));
        doc.push(Block::Quote(notes.clone()));
    }
}

fn contact_sections(doc: &mut Document, l: &Labels, s: &ContactSubmission) {
    let mut fields = vec![
        (l.name.into(), s.name.clone()),
        (l.email.into(), s.email.clone()),
    ];
    push_optional(&mut fields, l.phone, s.phone.as_deref());
    push_optional(&mut fields, l.company, s.company.as_deref());
    push_optional(&mut fields, l.job_title, s.job_title.as_deref());
    push_optional(&mut fields, l.country, s.country.as_deref());
    fields.push((l.topic.into(), s.subject_type.as_str().to_string()));
    fields.push((l.subject.into(), s.subject.clone()));
    push_optional(&mut fields, l.annual_volume, s.annual_volume.as_deref());
    push_optional(&mut fields, l.incoterm, s.preferred_incoterm.map(|i| i.as_str()));

    doc.push(Block::Heading(l.contact_heading.into()));
    doc.push(Block::Fields(fields));
    doc.push(Block::Heading(l.message_heading.into()));
    doc.push(Block::Quote(s.message.clone()));
}

fn catalog_sections(doc: &mut Document, l: &Labels, s: &CatalogDownloadSubmission) {
    doc.push(Block::Heading(l.contact_heading.into()));
    doc.push(Block::Fields(vec![
        (l.name.into(), s.name.clone()),
        (l.email.into(), s.email.clone()),
        (l.company.into(), s.company.clone()),
        (l.country.into(), s.country.clone()),
        (l.catalog.into(), s.catalog_id.clone()),
    ]));
}

fn products_table(l: &Labels, s: &RfqSubmission) -> Block {
    let rows = s
        .products
        .iter()
        .map(|p| {
            vec![
                p.product_name.clone().unwrap_or_else(|| p.product_id.clone()),
                format_quantity(p.quantity),
                p.unit.clone(),
                p.grade.clone().unwrap_or_default(),
            ]
        })
        .collect();
    Block::Table {
        headers: vec![l.product.into(), l.quantity.into(), l.unit.into(), l.grade.into()],
        rows,
    }
}

fn push_optional(fields: &mut Vec<(String, String)>, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        fields.push((label.to_string(), value.to_string()));
    }
}

fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        format!("{quantity}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{self, FormKind};
    use serde_json::{Value, json};

    fn rfq_payload(locale: &str) -> Value {
        json!({
            "contact": {
                "name": "Jean Dupont",
                "email": "jean@example.fr",
                "company": "Dupont & Fils",
                "phone": "+33 1 23 45 67 89"
            },
            "products": [
                {"productId": "cocoa-beans", "productName": "Cocoa beans", "quantity": 500, "unit": "kg"},
                {"productId": "cashew", "quantity": 2.5, "unit": "t", "grade": "W320"}
            ],
            "delivery": {"incoterm": "CIF", "destination": "Le Havre"},
            "notes": "Prefer <b>organic</b>\nif possible",
            "locale": locale
        })
    }

    fn contact_payload(locale: &str) -> Value {
        json!({
            "name": "María García",
            "email": "maria@example.es",
            "subjectType": "partnership",
            "subject": "Distribution in Spain",
            "message": "We would like to discuss a partnership.",
            "locale": locale
        })
    }

    #[test]
    fn operator_rfq_lists_every_product() {
        let submission = forms::validate(FormKind::Rfq, &rfq_payload("en")).unwrap().sanitized();
        let doc = render(Locale::Fr, Audience::Operator, &submission, "RFQ-1-abcd1234");

        assert_eq!(doc.subject, "Nouvelle demande de devis RFQ-1-abcd1234 (Dupont & Fils)");
        let text = doc.to_text();
        assert!(text.contains("Cocoa beans | 500 | kg"));
        assert!(text.contains("cashew | 2.5 | t | W320"));
        assert!(text.contains("Incoterm: CIF"));

        let html = doc.to_html();
        assert!(html.contains("Dupont &amp; Fils"));
        assert!(!html.contains("<b>organic"));
    }

    #[test]
    fn rfq_confirmation_is_french_or_english() {
        let fr = forms::validate(FormKind::Rfq, &rfq_payload("fr")).unwrap();
        let de = forms::validate(FormKind::Rfq, &rfq_payload("de")).unwrap();

        let doc = render(fr.locale(), Audience::Customer, &fr, "RFQ-1");
        assert_eq!(doc.subject, "Votre demande de devis RFQ-1 a bien été reçue");
        assert!(doc.to_text().starts_with("Bonjour Jean Dupont,"));

        let doc = render(de.locale(), Audience::Customer, &de, "RFQ-1");
        assert_eq!(doc.subject, "We received your quote request RFQ-1");
        assert_eq!(doc.lang, "en");
    }

    #[test]
    fn catalog_rfq_subjects_cover_all_locales() {
        let expected = [
            ("es", "Hemos recibido su solicitud de cotización CRFQ-9"),
            ("de", "Wir haben Ihre Angebotsanfrage CRFQ-9 erhalten"),
            ("ru", "Мы получили ваш запрос коммерческого предложения CRFQ-9"),
        ];
        for (locale, subject) in expected {
            let submission = forms::validate(FormKind::CatalogRfq, &rfq_payload(locale)).unwrap();
            let doc = render(submission.locale(), Audience::Customer, &submission, "CRFQ-9");
            assert_eq!(doc.subject, subject);
        }
    }

    #[test]
    fn contact_subjects_cover_all_locales() {
        for locale in Locale::ALL {
            let submission = forms::validate(FormKind::Contact, &contact_payload(locale.as_str())).unwrap();
            let doc = render(locale, Audience::Customer, &submission, "CONTACT-1");
            assert!(!doc.subject.is_empty());
        }
        let es = forms::validate(FormKind::Contact, &contact_payload("es")).unwrap();
        assert_eq!(
            render(Locale::Es, Audience::Customer, &es, "CONTACT-1").subject,
            "Hemos recibido su mensaje"
        );
    }

    #[test]
    fn operator_contact_quotes_message() {
        let submission = forms::validate(FormKind::Contact, &contact_payload("es")).unwrap();
        let doc = render(Locale::En, Audience::Operator, &submission, "CONTACT-1");
        assert_eq!(doc.subject, "New contact message: Distribution in Spain");
        assert!(doc.blocks.contains(&Block::Quote("We would like to discuss a partnership.".into())));
    }
}
