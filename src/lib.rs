pub mod cache;
pub mod cms;
pub mod config;
pub mod error;
pub mod handlers;
pub mod instagram;
pub mod locale;
pub mod mailer;
pub mod router;
pub mod search;
pub mod security;
pub mod sitemap;
pub mod state;

pub use config::Config;
pub use router::build_router;
pub use state::AppState;
