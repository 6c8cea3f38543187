use crate::locale::Locale;

/// Path templates per CMS document type. `{l}` is the locale, `{slug}` the
/// document slug; templates with a slug are skipped when none is known.
fn templates(doc_type: &str) -> &'static [&'static str] {
    match doc_type {
        "product" => &["/{l}/products", "/{l}", "/{l}/products/{slug}"],
        "blogPost" => &["/{l}/blog", "/{l}", "/{l}/blog/{slug}"],
        "certification" => &["/{l}/quality", "/{l}"],
        "resource" => &["/{l}/resources"],
        "teamMember" => &["/{l}/about"],
        _ => &["/{l}"],
    }
}

/// Expands the paths invalidated by a change to a document of `doc_type`,
/// for every locale, without duplicates and in a stable order.
pub fn paths_for(doc_type: &str, slug: Option<&str>, locales: &[Locale]) -> Vec<String> {
    let slug = slug.map(str::trim).filter(|s| !s.is_empty());
    let mut paths: Vec<String> = Vec::new();

    for locale in locales {
        for template in templates(doc_type) {
            let path = match (template.contains("{slug}"), slug) {
                (true, None) => continue,
                (true, Some(slug)) => template.replace("{slug}", slug),
                (false, _) => template.to_string(),
            };
            let path = path.replace("{l}", locale.as_str());
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALES: &[Locale] = &[Locale::Fr, Locale::En];

    #[test]
    fn product_invalidates_listing_and_home() {
        let paths = paths_for("product", None, LOCALES);
        assert_eq!(paths, vec!["/fr/products", "/fr", "/en/products", "/en"]);
    }

    #[test]
    fn slug_adds_detail_page() {
        let paths = paths_for("blogPost", Some("harvest-2025"), &[Locale::En]);
        assert_eq!(paths, vec!["/en/blog", "/en", "/en/blog/harvest-2025"]);
    }

    #[test]
    fn single_collection_types() {
        assert_eq!(paths_for("resource", None, &[Locale::Fr]), vec!["/fr/resources"]);
        assert_eq!(paths_for("teamMember", None, &[Locale::Fr]), vec!["/fr/about"]);
        assert_eq!(paths_for("certification", None, &[Locale::De]), vec!["/de/quality", "/de"]);
    }

    #[test]
    fn unknown_types_fall_back_to_home() {
        for doc_type in ["testimonial", "page", "siteSettings", "somethingNew"] {
            assert_eq!(paths_for(doc_type, Some("x"), LOCALES), vec!["/fr", "/en"]);
        }
    }
}
