//! Sitemap generation.
//!
//! Builds `sitemap.xml` from the static top-level pages plus the CMS slug
//! lists, with one `<url>` entry per enabled locale for every page.

use chrono::Utc;

use crate::locale::LocaleRegistry;

/// Static top-level pages present in every locale. The empty string is the
/// locale home page.
pub const STATIC_PAGES: &[&str] = &["", "about", "collections", "perfumes", "news", "contact"];

/// Slug lists fetched from the CMS, one per routed document type.
#[derive(Debug, Default)]
pub struct SitemapSlugs {
    pub perfumes: Vec<String>,
    pub collections: Vec<String>,
    pub news: Vec<String>,
}

/// Render the full sitemap document.
pub fn build_sitemap(base_url: &str, slugs: &SitemapSlugs) -> String {
    let base = base_url.trim_end_matches('/');
    let lastmod = Utc::now().format("%Y-%m-%d").to_string();
    let locales = LocaleRegistry::get().list_enabled();

    let mut paths: Vec<String> = Vec::new();
    for page in STATIC_PAGES {
        if page.is_empty() {
            paths.push(String::new());
        } else {
            paths.push(format!("/{page}"));
        }
    }
    for slug in &slugs.perfumes {
        paths.push(format!("/perfumes/{slug}"));
    }
    for slug in &slugs.collections {
        paths.push(format!("/collections/{slug}"));
    }
    for slug in &slugs.news {
        paths.push(format!("/news/{slug}"));
    }

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for path in &paths {
        for locale in &locales {
            let loc = if path.is_empty() {
                format!("{}/{}/", base, locale.code)
            } else {
                format!("{}/{}{}", base, locale.code, path)
            };
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&loc)));
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
            xml.push_str("  </url>\n");
        }
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Escape text for inclusion in an XML element.
fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_is_well_formed() {
        let sitemap = build_sitemap("https://essenza.example", &SitemapSlugs::default());

        assert!(sitemap.starts_with("<?xml version=\"1.0\""));
        assert!(sitemap.contains("<urlset"));
        assert!(sitemap.ends_with("</urlset>\n"));
        assert_eq!(sitemap.matches("<url>").count(), sitemap.matches("</url>").count());
    }

    #[test]
    fn test_one_entry_per_locale_per_static_page() {
        let sitemap = build_sitemap("https://essenza.example", &SitemapSlugs::default());

        // 3 locales x 6 static pages
        assert_eq!(sitemap.matches("<url>").count(), 18);
        assert!(sitemap.contains("<loc>https://essenza.example/en/</loc>"));
        assert!(sitemap.contains("<loc>https://essenza.example/it/</loc>"));
        assert!(sitemap.contains("<loc>https://essenza.example/de/</loc>"));
        assert!(sitemap.contains("<loc>https://essenza.example/de/contact</loc>"));
    }

    #[test]
    fn test_cms_slugs_expand_per_locale() {
        let slugs = SitemapSlugs {
            perfumes: vec!["ambra".to_string()],
            collections: vec!["classics".to_string()],
            news: vec!["spring-launch".to_string()],
        };
        let sitemap = build_sitemap("https://essenza.example", &slugs);

        // (6 static + 3 slugs) x 3 locales
        assert_eq!(sitemap.matches("<url>").count(), 27);
        assert!(sitemap.contains("<loc>https://essenza.example/it/perfumes/ambra</loc>"));
        assert!(sitemap.contains("<loc>https://essenza.example/de/collections/classics</loc>"));
        assert!(sitemap.contains("<loc>https://essenza.example/en/news/spring-launch</loc>"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let sitemap = build_sitemap("https://essenza.example/", &SitemapSlugs::default());
        assert!(sitemap.contains("<loc>https://essenza.example/en/</loc>"));
        assert!(!sitemap.contains("example//en"));
    }

    #[test]
    fn test_lastmod_present_and_dated() {
        let sitemap = build_sitemap("https://essenza.example", &SitemapSlugs::default());
        let today = Utc::now().format("%Y-%m-%d").to_string();
        assert!(sitemap.contains(&format!("<lastmod>{}</lastmod>", today)));
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a&b"), "a&amp;b");
        assert_eq!(xml_escape("<tag>"), "&lt;tag&gt;");
        assert_eq!(xml_escape("plain"), "plain");
    }

    #[test]
    fn test_slug_with_ampersand_is_escaped() {
        let slugs = SitemapSlugs {
            perfumes: vec!["ambra&oud".to_string()],
            ..Default::default()
        };
        let sitemap = build_sitemap("https://essenza.example", &slugs);
        assert!(sitemap.contains("ambra&amp;oud"));
        assert!(!sitemap.contains("ambra&oud<"));
    }
}
