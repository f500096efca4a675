//! Initialize a new host directory

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::{PlatformConfig, CONFIG_FILE};

const CONFIG_HEADER: &str = "# platform-host configuration
## Documents are resolved relative to this file.
## Set `fallback: ~` to disable the fallback document.

";

/// Write a default `_platform.yml` into `target_dir`
///
/// `basic` selects the single-calculator profile with no fallback.
pub fn init_site(target_dir: &Path, basic: bool) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("File already exists: {:?}", config_path);
    }

    let config = if basic {
        PlatformConfig::basic()
    } else {
        PlatformConfig::default()
    };

    let content = format!("{}{}", CONFIG_HEADER, config.to_yaml()?);
    fs::write(&config_path, content)?;
    tracing::info!("Created: {:?}", config_path);

    println!("Place your documents next to {}:", CONFIG_FILE);
    println!("  primary:  {}", config.primary.path);
    if let Some(fallback) = &config.fallback {
        println!("  fallback: {}", fallback.path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path(), false).unwrap();

        let config = PlatformConfig::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, PlatformConfig::default());
    }

    #[test]
    fn test_init_basic_profile() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("calculator");
        init_site(&target, true).unwrap();

        let config = PlatformConfig::load(target.join(CONFIG_FILE)).unwrap();
        assert!(config.fallback.is_none());
        assert_eq!(config.primary.path, "demographic_calculator.html");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "title: mine\n").unwrap();
        assert!(init_site(dir.path(), false).is_err());
        let kept = fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(kept, "title: mine\n");
    }
}
