pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use config::SiteConfig;
pub use crate::core::{contact_form::ContactFormDriver, generation::GeminiClient, site::SiteEngine};
pub use utils::error::{Result, SiteError};
