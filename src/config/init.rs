use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use super::schema::Config;
use crate::persist::write_atomically;

const HEADER: &str = "\
# aps-check configuration
# profile:   path to your profile JSON
# catalogue: path to the degree catalogue JSON
";

/// Write the starter config to `path`. Refuses to overwrite unless `force`.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    let yaml = serde_saphyr::to_string(&Config::starter()).context("Failed to serialize config")?;
    write_atomically(path, &[HEADER.as_bytes(), yaml.as_bytes()])?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use std::env;

    #[test]
    fn test_write_then_load() {
        let path = env::temp_dir()
            .join("aps_check_test_init")
            .join("config.yaml");
        let _ = std::fs::remove_file(&path);

        write_default_config(&path, false).unwrap();
        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config, Config::starter());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let path = env::temp_dir().join("aps_check_test_init_exists.yaml");
        std::fs::write(&path, "{}").unwrap();

        let err = write_default_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        write_default_config(&path, true).unwrap();

        let _ = std::fs::remove_file(&path);
    }
}
