use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // SMTP relay
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub admin_email: String,
    pub from_email: String,

    // CMS
    pub cms_project_url: String,
    pub cms_dataset: String,
    pub cms_api_token: String,
    pub cms_api_version: String,

    // Instagram
    pub instagram_api_base: String,
    pub instagram_access_token: String,
    pub instagram_verify_token: String,
    pub instagram_cache_ttl_secs: u64,

    // Site
    pub site_base_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // SMTP relay
            smtp_host: std::env::var("SMTP_HOST")
                .context("SMTP_HOST not set")?,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            smtp_user: std::env::var("SMTP_USER")
                .context("SMTP_USER not set")?,
            smtp_password: std::env::var("SMTP_PASSWORD")
                .context("SMTP_PASSWORD not set")?,
            admin_email: std::env::var("ADMIN_EMAIL")
                .context("ADMIN_EMAIL not set")?,
            from_email: std::env::var("FROM_EMAIL")
                .context("FROM_EMAIL not set")?,

            // CMS
            cms_project_url: std::env::var("CMS_PROJECT_URL")
                .context("CMS_PROJECT_URL not set")?,
            cms_dataset: std::env::var("CMS_DATASET")
                .context("CMS_DATASET not set")?,
            cms_api_token: std::env::var("CMS_API_TOKEN")
                .context("CMS_API_TOKEN not set")?,
            cms_api_version: std::env::var("CMS_API_VERSION")
                .unwrap_or_else(|_| "2024-01-01".to_string()),

            // Instagram
            instagram_api_base: std::env::var("INSTAGRAM_API_BASE")
                .unwrap_or_else(|_| "https://graph.instagram.com".to_string()),
            instagram_access_token: std::env::var("INSTAGRAM_ACCESS_TOKEN")
                .context("INSTAGRAM_ACCESS_TOKEN not set")?,
            instagram_verify_token: std::env::var("INSTAGRAM_VERIFY_TOKEN")
                .context("INSTAGRAM_VERIFY_TOKEN not set")?,
            instagram_cache_ttl_secs: std::env::var("INSTAGRAM_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),

            // Site
            site_base_url: std::env::var("SITE_BASE_URL")
                .unwrap_or_else(|_| "https://essenza.example".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}
