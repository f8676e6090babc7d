use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::cache::TagCache;
use crate::cms::CmsClient;
use crate::config::Config;
use crate::instagram::InstagramClient;
use crate::mailer::Mailer;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable: all inner data is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cms: Arc<CmsClient>,
    pub mailer: Arc<Mailer>,
    pub instagram: Arc<InstagramClient>,
    pub cache: Arc<TagCache>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let cms = CmsClient::new(&config);
        let mailer = Mailer::new(&config)?;
        let instagram = InstagramClient::new(&config);
        let cache = TagCache::new(Duration::from_secs(config.instagram_cache_ttl_secs));

        Ok(Self {
            config: Arc::new(config),
            cms: Arc::new(cms),
            mailer: Arc::new(mailer),
            instagram: Arc::new(instagram),
            cache: Arc::new(cache),
        })
    }
}
