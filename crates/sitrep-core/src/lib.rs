//! Shared types and configuration for the situation-report pipeline.

pub mod app_config;
pub mod config;
pub mod error;
pub mod post;
pub mod scoring;
pub mod taxonomy;

pub use app_config::{AppConfig, Backend, ClassifierKind};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use post::Post;
pub use scoring::{engagement_score, with_z_scores, z_scores};
pub use taxonomy::Category;
