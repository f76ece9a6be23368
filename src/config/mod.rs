//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The resulting [`Config`] is immutable and shared by reference with every
//! component.
//!
//! # Example
//!
//! ```no_run
//! use tadu_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tadu.toml")).unwrap();
//! println!("Listing template: {}", config.site.listing_url_template);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AssetsConfig, BrowserConfig, Config, CrawlConfig, HttpConfig, RendererKind, ServerConfig,
    SiteConfig,
};

// Re-export parser functions
pub use parser::{apply_env_overrides, compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
