//! Configuration module for the game crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use game_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gamecrawler.toml")).unwrap();
//! println!("Crawling {} platforms", config.catalog.platforms.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CatalogConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
