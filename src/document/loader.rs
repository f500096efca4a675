//! Document loader - locates and reads primary/fallback documents

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::DocumentSpec;

/// Position of a document in the preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Primary,
    Fallback,
}

/// Errors raised while loading a document
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("platform file '{path}' not found")]
    MissingPrimaryDocument { path: String },

    #[error("fallback file '{path}' not found")]
    MissingFallbackDocument { path: String },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not valid UTF-8 text: {source}")]
    Encoding {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl LoadError {
    /// Missing-file errors, as opposed to failures reading a file that exists
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            LoadError::MissingPrimaryDocument { .. } | LoadError::MissingFallbackDocument { .. }
        )
    }
}

/// A static markup file, read once and never modified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path as configured, relative to the base directory
    pub path: String,
    /// Raw file contents
    pub content: String,
    /// Absence is fatal rather than a reason to fall back
    pub required: bool,
    pub tier: Tier,
}

/// Resolve a document path against the base directory if it exists
pub fn locate(base_dir: &Path, spec: &DocumentSpec) -> Option<PathBuf> {
    let full_path = base_dir.join(&spec.path);
    if full_path.exists() {
        Some(full_path)
    } else {
        None
    }
}

/// Locate and read a document as UTF-8 text
///
/// `required` marks a document whose absence ends the pass, i.e. the
/// fallback, or a primary with no fallback behind it.
pub fn load(
    base_dir: &Path,
    spec: &DocumentSpec,
    tier: Tier,
    required: bool,
) -> Result<Document, LoadError> {
    let full_path = locate(base_dir, spec).ok_or_else(|| match tier {
        Tier::Primary => LoadError::MissingPrimaryDocument {
            path: spec.path.clone(),
        },
        Tier::Fallback => LoadError::MissingFallbackDocument {
            path: spec.path.clone(),
        },
    })?;
    tracing::debug!(
        "Reading {:?} document {:?} (required: {})",
        tier,
        full_path,
        required
    );

    let bytes = fs::read(&full_path).map_err(|source| LoadError::Read {
        path: spec.path.clone(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|source| LoadError::Encoding {
        path: spec.path.clone(),
        source,
    })?;

    Ok(Document {
        path: spec.path.clone(),
        content,
        required,
        tier,
    })
}
