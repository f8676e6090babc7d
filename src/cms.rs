//! Read client for the headless CMS.
//!
//! The CMS is consumed as an opaque read API: GET requests against the
//! project's query endpoint with a bearer token, a query string per
//! document type, and a `{"result": ...}` response envelope. Queries
//! project the requested locale's field variants and coalesce to the
//! default locale when a translation is missing.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::locale::Locale;

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

/// The query language yields `null` for missing arrays; map that to empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ==================== Document projections ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perfume {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub collection_slug: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: Vec<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub perfume_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalPage {
    pub slug: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavbarConfig {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub links: Vec<NavLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfumeNote {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
}

/// Filters accepted by the find-perfumes quiz backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerfumeFilter {
    pub collection: Option<String>,
    pub note: Option<String>,
}

// ==================== Client ====================

pub struct CmsClient {
    client: reqwest::Client,
    query_url: String,
    api_token: String,
}

impl CmsClient {
    pub fn new(config: &Config) -> Self {
        let query_url = format!(
            "{}/v{}/data/query/{}",
            config.cms_project_url.trim_end_matches('/'),
            config.cms_api_version,
            config.cms_dataset
        );

        Self {
            client: reqwest::Client::new(),
            query_url,
            api_token: config.cms_api_token.clone(),
        }
    }

    /// Run a raw query and deserialize the `result` field.
    ///
    /// A null result maps to `Ok(None)` so by-slug lookups can distinguish
    /// "missing document" from a transport failure.
    pub async fn query<T: DeserializeOwned>(&self, query: &str) -> Result<Option<T>> {
        debug!("CMS query: {}", query);

        let response = self
            .client
            .get(&self.query_url)
            .bearer_auth(&self.api_token)
            .query(&[("query", query)])
            .send()
            .await
            .context("Failed to send request to CMS")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("CMS API error ({}): {}", status, body);
        }

        let envelope: QueryResponse<T> = response
            .json()
            .await
            .context("Failed to parse CMS response")?;

        Ok(envelope.result)
    }

    /// Run a query whose result is a list; a null result is an empty list.
    async fn query_list<T: DeserializeOwned>(&self, query: &str) -> Result<Vec<T>> {
        Ok(self.query(query).await?.unwrap_or_default())
    }

    // ==================== Per-type fetchers ====================

    pub async fn fetch_perfumes(&self, locale: Locale) -> Result<Vec<Perfume>> {
        let query = format!(
            r#"*[_type == "perfume"] | order(title asc) {}"#,
            perfume_projection(locale)
        );
        self.query_list(&query).await
    }

    pub async fn fetch_perfume_by_slug(
        &self,
        locale: Locale,
        slug: &str,
    ) -> Result<Option<Perfume>> {
        let query = format!(
            r#"*[_type == "perfume" && slug.current == {}][0] {}"#,
            groq_string(slug),
            perfume_projection(locale)
        );
        self.query(&query).await
    }

    pub async fn find_perfumes(
        &self,
        locale: Locale,
        filter: &PerfumeFilter,
    ) -> Result<Vec<Perfume>> {
        let mut conditions = vec![r#"_type == "perfume""#.to_string()];
        if let Some(collection) = &filter.collection {
            conditions.push(format!(
                "collection->slug.current == {}",
                groq_string(collection)
            ));
        }
        if let Some(note) = &filter.note {
            conditions.push(format!("{} in notes[]->title.en", groq_string(note)));
        }

        let query = format!(
            "*[{}] | order(title asc) {}",
            conditions.join(" && "),
            perfume_projection(locale)
        );
        self.query_list(&query).await
    }

    pub async fn fetch_collections(&self, locale: Locale) -> Result<Vec<Collection>> {
        let query = format!(
            r#"*[_type == "collection"] | order(title asc) {{
  "id": _id,
  "slug": slug.current,
  "title": {title},
  "description": {description},
  "perfume_count": count(*[_type == "perfume" && references(^._id)])
}}"#,
            title = localized("title", locale),
            description = localized("description", locale),
        );
        self.query_list(&query).await
    }

    pub async fn fetch_news(&self, locale: Locale) -> Result<Vec<NewsArticle>> {
        let query = format!(
            r#"*[_type == "news"] | order(publishedAt desc) {{
  "id": _id,
  "slug": slug.current,
  "title": {title},
  "excerpt": {excerpt},
  "published_at": publishedAt
}}"#,
            title = localized("title", locale),
            excerpt = localized("excerpt", locale),
        );
        self.query_list(&query).await
    }

    pub async fn fetch_legal_page(
        &self,
        locale: Locale,
        slug: &str,
    ) -> Result<Option<LegalPage>> {
        let query = format!(
            r#"*[_type == "legalPage" && slug.current == {slug}][0] {{
  "slug": slug.current,
  "title": {title},
  "body": {body}
}}"#,
            slug = groq_string(slug),
            title = localized("title", locale),
            body = localized("body", locale),
        );
        self.query(&query).await
    }

    pub async fn fetch_navbar(&self, locale: Locale) -> Result<NavbarConfig> {
        let query = format!(
            r#"*[_type == "navbar"][0] {{
  "links": links[] {{ "label": {label}, "href": href }}
}}"#,
            label = localized("label", locale),
        );
        Ok(self
            .query(&query)
            .await?
            .unwrap_or(NavbarConfig { links: Vec::new() }))
    }

    pub async fn fetch_notes(&self, locale: Locale) -> Result<Vec<PerfumeNote>> {
        let query = format!(
            r#"*[_type == "perfumeNote"] | order(title asc) {{
  "id": _id,
  "title": {title},
  "description": {description}
}}"#,
            title = localized("title", locale),
            description = localized("description", locale),
        );
        self.query_list(&query).await
    }

    /// Locale-independent slug list for one document type (sitemap feed).
    pub async fn fetch_slugs(&self, doc_type: &str) -> Result<Vec<String>> {
        let query = format!("*[_type == {}].slug.current", groq_string(doc_type));
        self.query_list(&query).await
    }
}

// ==================== Query helpers ====================

/// Project a localized field, coalescing to the default locale when the
/// requested translation is missing.
pub(crate) fn localized(field: &str, locale: Locale) -> String {
    let default_code = Locale::default_locale().code();
    if locale.code() == default_code {
        format!("{field}.{default_code}")
    } else {
        format!(
            "coalesce({field}.{code}, {field}.{default_code})",
            field = field,
            code = locale.code(),
            default_code = default_code
        )
    }
}

/// Standard perfume projection shared by list, by-slug, and filter queries.
pub(crate) fn perfume_projection(locale: Locale) -> String {
    format!(
        r#"{{
  "id": _id,
  "slug": slug.current,
  "title": {title},
  "subtitle": {subtitle},
  "description": {description},
  "collection_slug": collection->slug.current,
  "notes": notes[]->{note_title},
  "image_url": image.asset->url
}}"#,
        title = localized("title", locale),
        subtitle = localized("subtitle", locale),
        description = localized("description", locale),
        note_title = localized("title", locale),
    )
}

/// Quote a user-supplied value for embedding into a query string.
pub(crate) fn groq_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_user: "mailer".to_string(),
            smtp_password: "secret".to_string(),
            admin_email: "admin@essenza.example".to_string(),
            from_email: "noreply@essenza.example".to_string(),
            cms_project_url: "https://cms.example.com/".to_string(),
            cms_dataset: "production".to_string(),
            cms_api_token: "cms-token".to_string(),
            cms_api_version: "2024-01-01".to_string(),
            instagram_api_base: "https://graph.instagram.com".to_string(),
            instagram_access_token: "ig-token".to_string(),
            instagram_verify_token: "verify-me".to_string(),
            instagram_cache_ttl_secs: 3600,
            site_base_url: "https://essenza.example".to_string(),
            port: 8080,
        }
    }

    // ==================== URL Format Tests ====================

    #[test]
    fn test_query_url_format() {
        let client = CmsClient::new(&test_config());
        assert_eq!(
            client.query_url,
            "https://cms.example.com/v2024-01-01/data/query/production"
        );
    }

    // ==================== Query Helper Tests ====================

    #[test]
    fn test_localized_default_locale() {
        assert_eq!(localized("title", Locale::ENGLISH), "title.en");
    }

    #[test]
    fn test_localized_coalesces_to_default() {
        assert_eq!(
            localized("title", Locale::GERMAN),
            "coalesce(title.de, title.en)"
        );
    }

    #[test]
    fn test_groq_string_plain() {
        assert_eq!(groq_string("ambra"), "\"ambra\"");
    }

    #[test]
    fn test_groq_string_escapes_quotes() {
        assert_eq!(groq_string(r#"am"bra"#), r#""am\"bra""#);
    }

    #[test]
    fn test_groq_string_escapes_backslash() {
        assert_eq!(groq_string(r"am\bra"), r#""am\\bra""#);
    }

    #[test]
    fn test_perfume_projection_localizes_fields() {
        let projection = perfume_projection(Locale::ITALIAN);
        assert!(projection.contains("coalesce(title.it, title.en)"));
        assert!(projection.contains("coalesce(description.it, description.en)"));
        assert!(projection.contains("\"slug\": slug.current"));
    }

    // ==================== Deserialization Tests ====================

    #[test]
    fn test_perfume_deserialization() {
        let json = r#"{
            "id": "perfume-1",
            "slug": "ambra",
            "title": "Ambra",
            "subtitle": "Eau de Parfum",
            "description": "Warm amber notes",
            "collection_slug": "classics",
            "notes": ["Amber", "Vanilla"],
            "image_url": "https://cdn.example.com/ambra.jpg"
        }"#;

        let perfume: Perfume = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(perfume.slug, "ambra");
        assert_eq!(perfume.notes.len(), 2);
    }

    #[test]
    fn test_perfume_deserialization_null_optionals() {
        // A perfume without a collection, notes, or image comes back with
        // nulls from the CMS
        let json = r#"{
            "id": "perfume-2",
            "slug": "nebbia",
            "title": "Nebbia",
            "subtitle": null,
            "description": null,
            "collection_slug": null,
            "notes": null,
            "image_url": null
        }"#;

        let perfume: Perfume = serde_json::from_str(json).expect("Should deserialize");
        assert!(perfume.notes.is_empty());
        assert!(perfume.subtitle.is_none());
        assert!(perfume.collection_slug.is_none());
    }

    #[test]
    fn test_perfume_deserialization_missing_optionals() {
        let json = r#"{
            "id": "perfume-2",
            "slug": "nebbia",
            "title": "Nebbia"
        }"#;

        let perfume: Perfume = serde_json::from_str(json).expect("Should deserialize");
        assert!(perfume.notes.is_empty());
        assert!(perfume.image_url.is_none());
    }

    #[test]
    fn test_query_envelope_null_result() {
        let envelope: QueryResponse<Perfume> =
            serde_json::from_str(r#"{"result": null}"#).expect("Should deserialize");
        assert!(envelope.result.is_none());
    }

    #[test]
    fn test_navbar_deserialization() {
        let json = r#"{"links": [{"label": "Perfumes", "href": "/perfumes"}]}"#;
        let navbar: NavbarConfig = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(navbar.links.len(), 1);
        assert_eq!(navbar.links[0].label, "Perfumes");
    }

    #[test]
    fn test_filter_deserialization_from_query_params() {
        let filter: PerfumeFilter =
            serde_json::from_str(r#"{"collection": "classics"}"#).expect("Should deserialize");
        assert_eq!(filter.collection.as_deref(), Some("classics"));
        assert!(filter.note.is_none());
    }
}
