//! The load-render-fallback sequence, run once per page view

use serde::Serialize;
use std::path::Path;

use crate::config::{DocumentSpec, PlatformConfig};
use crate::document::{self, Document, LoadError, Tier};
use crate::notice::Notice;

/// Shown after any load failure that ends the pass without content
pub const LOAD_HINT: &str =
    "Please check that all required files are present and properly formatted.";

/// The single region of content chosen by a render pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embedded {
    pub tier: Tier,
    pub path: String,
    pub content: String,
    pub height: u32,
    pub scrolling: bool,
}

impl Embedded {
    fn new(document: Document, spec: &DocumentSpec) -> Self {
        Self {
            tier: document.tier,
            path: document.path,
            content: document.content,
            height: spec.height,
            scrolling: spec.scrolling,
        }
    }
}

/// Everything a host needs to draw one page view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutcome {
    /// Notices in the order they were raised
    pub notices: Vec<Notice>,
    pub embedded: Option<Embedded>,
}

impl RenderOutcome {
    /// Which tier ended up embedded, if any
    pub fn tier(&self) -> Option<Tier> {
        self.embedded.as_ref().map(|e| e.tier)
    }

    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(Notice::is_error)
    }
}

/// Run one render pass against the documents under `base_dir`
///
/// Never fails: every load error ends up as a notice in the outcome.
pub fn run(config: &PlatformConfig, base_dir: &Path) -> RenderOutcome {
    let mut notices = Vec::new();

    let embedded = match load_with_fallback(config, base_dir, &mut notices) {
        Ok(embedded) => embedded,
        Err(e) => {
            tracing::error!("Error loading platform: {}", e);
            notices.push(Notice::error(format!("Error loading platform: {}", e)));
            notices.push(Notice::info(LOAD_HINT));
            None
        }
    };

    if let Some(embedded) = &embedded {
        tracing::info!(
            "Embedding {:?} document {} ({} bytes)",
            embedded.tier,
            embedded.path,
            embedded.content.len()
        );
    }

    RenderOutcome { notices, embedded }
}

fn load_with_fallback(
    config: &PlatformConfig,
    base_dir: &Path,
    notices: &mut Vec<Notice>,
) -> Result<Option<Embedded>, LoadError> {
    let primary_required = config.fallback.is_none();
    let primary_error =
        match document::load(base_dir, &config.primary, Tier::Primary, primary_required) {
            Ok(doc) => return Ok(Some(Embedded::new(doc, &config.primary))),
            Err(e) if e.is_missing() => e,
            Err(e) => return Err(e),
        };

    notices.push(Notice::error(format!(
        "{}. Please ensure all files are properly uploaded.",
        primary_error
    )));

    let fallback = match &config.fallback {
        Some(fallback) if !primary_required => fallback,
        _ => {
            tracing::error!("{} and no fallback is configured", primary_error);
            return Ok(None);
        }
    };

    tracing::warn!("{}, falling back to {}", primary_error, fallback.path);
    notices.push(Notice::warning(format!(
        "Falling back to {}...",
        fallback.display_name()
    )));

    let doc = document::load(base_dir, fallback, Tier::Fallback, true)?;
    Ok(Some(Embedded::new(doc, fallback)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeKind;
    use std::fs;

    fn config() -> PlatformConfig {
        let mut config = PlatformConfig::default();
        config.primary = DocumentSpec::new("primary.html", 1200);
        config.fallback =
            Some(DocumentSpec::new("fallback.html", 1000).with_label("basic calculator"));
        config
    }

    fn kinds(outcome: &RenderOutcome) -> Vec<NoticeKind> {
        outcome.notices.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_primary_present() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("primary.html"), "<h1>A</h1>").unwrap();

        let outcome = run(&config(), dir.path());
        let embedded = outcome.embedded.as_ref().unwrap();
        assert_eq!(embedded.content, "<h1>A</h1>");
        assert_eq!(embedded.height, 1200);
        assert!(embedded.scrolling);
        assert_eq!(outcome.tier(), Some(Tier::Primary));
        assert!(outcome.notices.is_empty());
    }

    #[test]
    fn test_primary_wins_over_fallback() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("primary.html"), "<h1>A</h1>").unwrap();
        fs::write(dir.path().join("fallback.html"), "<p>B</p>").unwrap();

        let outcome = run(&config(), dir.path());
        assert_eq!(outcome.embedded.unwrap().content, "<h1>A</h1>");
    }

    #[test]
    fn test_fallback_when_primary_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fallback.html"), "<p>B</p>").unwrap();

        let outcome = run(&config(), dir.path());
        assert_eq!(kinds(&outcome), vec![NoticeKind::Error, NoticeKind::Warning]);
        assert_eq!(
            outcome.notices[0].message,
            "platform file 'primary.html' not found. Please ensure all files are properly uploaded."
        );
        assert_eq!(
            outcome.notices[1].message,
            "Falling back to basic calculator..."
        );

        let embedded = outcome.embedded.unwrap();
        assert_eq!(embedded.tier, Tier::Fallback);
        assert_eq!(embedded.content, "<p>B</p>");
        assert_eq!(embedded.height, 1000);
    }

    #[test]
    fn test_fallback_uses_its_own_scrolling() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fallback.html"), "<p>B</p>").unwrap();
        let mut config = config();
        if let Some(fallback) = config.fallback.as_mut() {
            fallback.scrolling = false;
        }

        let embedded = run(&config, dir.path()).embedded.unwrap();
        assert!(!embedded.scrolling);
    }

    #[test]
    fn test_invalid_utf8_primary_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("primary.html"), b"<h1>\xff\xfe</h1>").unwrap();
        fs::write(dir.path().join("fallback.html"), "<p>B</p>").unwrap();

        let outcome = run(&config(), dir.path());
        assert!(outcome.embedded.is_none());
        assert_eq!(kinds(&outcome), vec![NoticeKind::Error, NoticeKind::Info]);
        assert!(outcome.notices[0]
            .message
            .starts_with("Error loading platform: "));
        assert_eq!(outcome.notices[1].message, LOAD_HINT);
    }

    #[test]
    fn test_both_missing_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();

        let outcome = run(&config(), dir.path());
        assert!(outcome.embedded.is_none());
        assert!(outcome.has_errors());
        assert_eq!(
            kinds(&outcome),
            vec![
                NoticeKind::Error,
                NoticeKind::Warning,
                NoticeKind::Error,
                NoticeKind::Info
            ]
        );
        assert_eq!(
            outcome.notices[2].message,
            "Error loading platform: fallback file 'fallback.html' not found"
        );
    }

    #[test]
    fn test_primary_missing_without_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config();
        config.fallback = None;

        let outcome = run(&config, dir.path());
        assert!(outcome.embedded.is_none());
        assert_eq!(kinds(&outcome), vec![NoticeKind::Error]);
    }

    #[test]
    fn test_basic_profile_with_missing_calculator() {
        let dir = tempfile::tempdir().unwrap();

        let outcome = run(&PlatformConfig::basic(), dir.path());
        assert!(outcome.embedded.is_none());
        assert_eq!(
            outcome.notices,
            vec![Notice::error(
                "platform file 'demographic_calculator.html' not found. \
                 Please ensure all files are properly uploaded."
            )]
        );
    }

    #[test]
    fn test_unreadable_fallback_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("fallback.html")).unwrap();

        let outcome = run(&config(), dir.path());
        assert!(outcome.embedded.is_none());
        assert_eq!(outcome.notices.last().unwrap().message, LOAD_HINT);
    }

    #[test]
    fn test_repeated_passes_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fallback.html"), "<p>B</p>").unwrap();

        let first = run(&config(), dir.path());
        let second = run(&config(), dir.path());
        assert_eq!(first, second);
    }
}
