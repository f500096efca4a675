//! Report which document a render pass would embed

use anyhow::Result;

use crate::document::Tier;
use crate::Platform;

/// Run one pass and print the result
///
/// Returns whether a document was embedded.
pub fn run(platform: &Platform, json: bool) -> Result<bool> {
    let outcome = platform.render_pass();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary(&outcome))?);
        return Ok(outcome.embedded.is_some());
    }

    for notice in &outcome.notices {
        println!("{}", notice);
    }

    match &outcome.embedded {
        Some(embedded) => {
            let tier = match embedded.tier {
                Tier::Primary => "primary",
                Tier::Fallback => "fallback",
            };
            println!(
                "Embedding {} document {} ({} bytes, height {}px, scrolling {})",
                tier,
                embedded.path,
                embedded.content.len(),
                embedded.height,
                if embedded.scrolling { "on" } else { "off" }
            );
        }
        None => println!("No document embedded"),
    }

    Ok(outcome.embedded.is_some())
}

/// JSON view of an outcome without the document body
fn summary(outcome: &crate::render::RenderOutcome) -> serde_json::Value {
    serde_json::json!({
        "tier": outcome.tier(),
        "embedded": outcome.embedded.as_ref().map(|e| serde_json::json!({
            "path": e.path,
            "bytes": e.content.len(),
            "height": e.height,
            "scrolling": e.scrolling,
        })),
        "notices": outcome.notices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DocumentSpec, PlatformConfig};
    use std::fs;

    fn platform(dir: &std::path::Path) -> Platform {
        let mut config = PlatformConfig::default();
        config.primary = DocumentSpec::new("primary.html", 1200);
        config.fallback = Some(DocumentSpec::new("fallback.html", 1000));
        Platform::with_config(dir, config)
    }

    #[test]
    fn test_check_reports_fallback() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fallback.html"), "<p>B</p>").unwrap();

        let outcome = platform(dir.path()).render_pass();
        let value = summary(&outcome);
        assert_eq!(value["tier"], "fallback");
        assert_eq!(value["embedded"]["bytes"], 8);
        assert_eq!(value["notices"][0]["kind"], "error");
        assert_eq!(value["notices"][1]["kind"], "warning");
    }

    #[test]
    fn test_check_without_documents() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!run(&platform(dir.path()), true).unwrap());
        assert!(!run(&platform(dir.path()), false).unwrap());
    }
}
