use anyhow::Context as _;
use std::path::{Path, PathBuf};
use unrelated_apigw_integration::config::{IntegrationConfig, load_config};

const CONFIG_FILE: &str = "apigw-swagger.yaml";

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    default_config_path_from(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

fn default_config_path_from(xdg: Option<String>, home: Option<String>) -> anyhow::Result<PathBuf> {
    let base = match (xdg, home) {
        (Some(v), _) if !v.is_empty() => PathBuf::from(v),
        (_, Some(home)) => PathBuf::from(home).join(".config"),
        _ => anyhow::bail!("HOME is not set"),
    };
    Ok(base.join("unrelated").join(CONFIG_FILE))
}

/// Load the explicit config file, or the default one if it exists, or an empty config.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<IntegrationConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Ok(p) if p.is_file() => p,
            _ => {
                tracing::debug!("no configuration file; using defaults");
                return Ok(IntegrationConfig::default());
            }
        },
    };
    tracing::info!(path = %path.display(), "loading integration config");
    load_config(&path).with_context(|| format!("load config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use unrelated_apigw_test_support::{INTEGRATION_CONFIG_YAML, write_fixture};

    #[test]
    fn test_default_config_path_prefers_xdg() {
        let p = default_config_path_from(Some("/xdg".into()), Some("/home/u".into())).unwrap();
        assert_eq!(p, PathBuf::from("/xdg/unrelated/apigw-swagger.yaml"));

        let p = default_config_path_from(Some(String::new()), Some("/home/u".into())).unwrap();
        assert_eq!(p, PathBuf::from("/home/u/.config/unrelated/apigw-swagger.yaml"));

        assert!(default_config_path_from(None, None).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "cfg.yaml", INTEGRATION_CONFIG_YAML).unwrap();
        let cfg = load(Some(&path)).unwrap();
        assert_eq!(
            cfg.backend_base_url.as_deref(),
            Some("https://backend.example.com/app/")
        );

        let err = load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("nope.yaml"));
    }
}
