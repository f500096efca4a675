//! platform-host: serve a pre-built HTML platform inside a host page
//!
//! The host loads a primary document from disk, falls back to a second
//! document when the primary is missing, and embeds whichever loaded in a
//! page with a header, metric widgets and expandable panels. Failures are
//! shown as notices instead of content.

pub mod commands;
pub mod config;
pub mod document;
pub mod helpers;
pub mod notice;
pub mod render;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use render::RenderOutcome;

/// The host application
#[derive(Clone)]
pub struct Platform {
    /// Page configuration
    pub config: config::PlatformConfig,
    /// Base directory documents are resolved against
    pub base_dir: PathBuf,
}

impl Platform {
    /// Create a new instance from a directory, reading `_platform.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::PlatformConfig::load_or_default(&base_dir)?;
        Ok(Self { config, base_dir })
    }

    /// Create an instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::PlatformConfig) -> Self {
        Self {
            config,
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(config::CONFIG_FILE)
    }

    /// Run one render pass
    pub fn render_pass(&self) -> RenderOutcome {
        render::pass::run(&self.config, &self.base_dir)
    }

    /// Run one render pass and assemble the page
    pub fn render_page(&self) -> String {
        let outcome = self.render_pass();
        render::render_page(&self.config, &outcome)
    }
}
