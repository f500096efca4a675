//! Render the host page once

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::render;
use crate::Platform;

/// Run one render pass and write the page to `output`, or stdout
pub fn run(platform: &Platform, output: Option<&Path>) -> Result<()> {
    let start = std::time::Instant::now();

    let outcome = platform.render_pass();
    for notice in &outcome.notices {
        tracing::debug!("{}", notice);
    }
    let page = render::render_page(&platform.config, &outcome);

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, &page)?;
            tracing::info!("Wrote {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(page.as_bytes())?;
            stdout.flush()?;
        }
    }

    let duration = start.elapsed();
    tracing::info!("Rendered in {:.3}s", duration.as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DocumentSpec, PlatformConfig};

    #[test]
    fn test_render_to_file_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("primary.html"), "<h1>A</h1>").unwrap();

        let mut config = PlatformConfig::default();
        config.primary = DocumentSpec::new("primary.html", 1200);
        let platform = Platform::with_config(dir.path(), config);

        let first = dir.path().join("out/first.html");
        let second = dir.path().join("out/second.html");
        run(&platform, Some(&first)).unwrap();
        run(&platform, Some(&second)).unwrap();

        let first = fs::read(first).unwrap();
        assert_eq!(first, fs::read(second).unwrap());
        assert!(String::from_utf8(first)
            .unwrap()
            .contains("&lt;h1&gt;A&lt;/h1&gt;"));
    }
}
