use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use figment::{
    Figment,
    providers::{Format, Json, Serialized, Toml, Yaml},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{cli::CliArgs, core::reconcile::SearchFilter, display::OutputFormat};

const DEFAULT_CONFIG_PATH: &str = "healthlink.toml";

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct Api {
    /// Backend base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Path of the search-by-image endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_path: Option<String>,
    /// Bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct Search {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub search: Search,
    #[serde(default)]
    pub output: Output,
}

impl Config {
    pub fn search_filter(&self) -> SearchFilter {
        SearchFilter {
            product_type: self.search.product_type.clone(),
            max_distance: self.search.max_distance,
            limit: self.search.limit,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        if self.api.timeout == Some(0) {
            bail!("api.timeout must be greater than 0");
        }
        if let Some(max_distance) = self.search.max_distance
            && !(max_distance.is_finite() && max_distance >= 0.0)
        {
            bail!("search.max_distance must be a non-negative number");
        }
        Ok(())
    }
}

fn defaults() -> serde_json::Value {
    json!({
        "api": {
            "base_url": "http://localhost:5000",
            "search_path": "/api/products/search/image",
            "timeout": 30
        },
        "output": {
            "format": "text"
        }
    })
}

fn file_provider(figment: Figment, config_path: &Path) -> Result<Figment> {
    let unknown = || anyhow!("Cannot identify config file type. Must be .toml, .json or .yaml");

    let ext = config_path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(unknown)?;

    Ok(match ext {
        "toml" => figment.merge(Toml::file(config_path)),
        "json" => figment.merge(Json::file(config_path)),
        "yaml" | "yml" => figment.merge(Yaml::file(config_path)),
        _ => return Err(unknown()),
    })
}

/// Defaults, then the config file, then CLI flags and environment.
pub fn load_config(args: &CliArgs) -> Result<Config> {
    let mut figment = Figment::new().merge(Serialized::defaults(defaults()));

    let config_path = PathBuf::from(args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));

    if config_path.exists() {
        log::info!("Config file found: {}", config_path.display());
        figment = file_provider(figment, &config_path)?;
    } else if args.config.is_some() {
        bail!("Config file not found: {}", config_path.display());
    }

    let config: Config = figment
        .merge(Serialized::defaults(args.as_config()))
        .extract()?;

    config.validate()?;
    log::debug!("Loaded config: {:#?}", config);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["healthlink-search"];
        argv.extend_from_slice(extra);
        argv.push("query.jpg");
        CliArgs::parse_from(argv)
    }

    /// The returned dir must outlive the path
    fn write_config(name: &str, content: &str) -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        (dir, path.to_string_lossy().into_owned())
    }

    #[test]
    fn test_defaults() {
        let config = load_config(&args(&[])).unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.api.timeout, Some(30));
        assert_eq!(config.format(), OutputFormat::Text);
        assert_eq!(config.search_filter(), SearchFilter::default());
    }

    #[test]
    fn test_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("healthlink.toml");
        let path = path.to_string_lossy().into_owned();

        assert!(load_config(&args(&["--config", &path])).is_err());
    }

    #[test]
    fn test_file_then_flags() {
        let (_dir, path) = write_config(
            "healthlink.toml",
            r#"
            [api]
            base_url = "https://api.healthlink.example"
            timeout = 5

            [search]
            product_type = "equipment"
            limit = 10
            "#,
        );

        let config = load_config(&args(&["--config", &path, "--limit", "3"])).unwrap();

        assert_eq!(
            config.api.base_url.as_deref(),
            Some("https://api.healthlink.example")
        );
        assert_eq!(
            config.api.search_path.as_deref(),
            Some("/api/products/search/image")
        );
        assert_eq!(config.api.timeout, Some(5));
        assert_eq!(config.search.product_type.as_deref(), Some("equipment"));
        assert_eq!(config.search.limit, Some(3));
    }

    #[test]
    fn test_json_config() {
        let (_dir, path) = write_config(
            "healthlink.json",
            r#"{"output": {"format": "json"}, "search": {"max_distance": 0.4}}"#,
        );

        let config = load_config(&args(&["--config", &path])).unwrap();
        assert_eq!(config.format(), OutputFormat::Json);
        assert_eq!(config.search_filter().max_distance, Some(0.4));
    }

    #[test]
    fn test_yaml_config() {
        let content = "api:\n  search_path: /v2/search\n  token: abc\nsearch:\n  product_type: medical_supply\noutput:\n  format: json\n";

        for name in ["healthlink.yaml", "healthlink.yml"] {
            let (_dir, path) = write_config(name, content);

            let config = load_config(&args(&["--config", &path])).unwrap();
            assert_eq!(config.api.search_path.as_deref(), Some("/v2/search"));
            assert_eq!(config.api.token.as_deref(), Some("abc"));
            assert_eq!(config.api.base_url.as_deref(), Some("http://localhost:5000"));
            assert_eq!(
                config.search.product_type.as_deref(),
                Some("medical_supply")
            );
            assert_eq!(config.format(), OutputFormat::Json);
        }
    }

    #[test]
    fn test_unknown_extension() {
        let (_dir, path) = write_config("healthlink.ini", "timeout=1");

        assert!(load_config(&args(&["--config", &path])).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(load_config(&args(&["--timeout", "0"])).is_err());
    }
}
