//! Cross-type site search.
//!
//! Issues one CMS query per searchable document type (perfumes and news)
//! and returns the merged per-type lists. No ranking or pagination; the
//! frontend renders the two lists as-is.

use anyhow::Result;
use serde::Serialize;

use crate::cms::{groq_string, localized, perfume_projection, CmsClient, NewsArticle, Perfume};
use crate::locale::Locale;

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub perfumes: Vec<Perfume>,
    pub articles: Vec<NewsArticle>,
}

/// Search perfumes and news articles for a free-text query.
///
/// A blank query short-circuits to empty results without contacting the CMS.
pub async fn search(cms: &CmsClient, locale: Locale, query: &str) -> Result<SearchResults> {
    let term = query.trim();
    if term.is_empty() {
        return Ok(SearchResults {
            perfumes: Vec::new(),
            articles: Vec::new(),
        });
    }

    let perfume_query = perfume_search_query(locale, term);
    let news_query = news_search_query(locale, term);

    let (perfumes, articles) = futures::try_join!(
        async {
            Ok::<_, anyhow::Error>(
                cms.query::<Vec<Perfume>>(&perfume_query)
                    .await?
                    .unwrap_or_default(),
            )
        },
        async {
            Ok::<_, anyhow::Error>(
                cms.query::<Vec<NewsArticle>>(&news_query)
                    .await?
                    .unwrap_or_default(),
            )
        },
    )?;

    Ok(SearchResults { perfumes, articles })
}

fn perfume_search_query(locale: Locale, term: &str) -> String {
    let pattern = groq_string(&format!("{term}*"));
    format!(
        "*[_type == \"perfume\" && ({title} match {pattern} || {description} match {pattern})] {projection}",
        title = localized("title", locale),
        description = localized("description", locale),
        pattern = pattern,
        projection = perfume_projection(locale),
    )
}

fn news_search_query(locale: Locale, term: &str) -> String {
    let pattern = groq_string(&format!("{term}*"));
    format!(
        r#"*[_type == "news" && ({title} match {pattern} || {excerpt} match {pattern})] {{
  "id": _id,
  "slug": slug.current,
  "title": {title},
  "excerpt": {excerpt},
  "published_at": publishedAt
}}"#,
        title = localized("title", locale),
        excerpt = localized("excerpt", locale),
        pattern = pattern,
    )
}
