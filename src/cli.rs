use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::{Api, Config, Output, Search},
    display::OutputFormat,
};

#[derive(Parser, Debug)]
#[command(about = "Find HealthLink products that look like a photo")]
pub struct CliArgs {
    /// Images to search with
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Backend base URL (default: "http://localhost:5000")
    #[arg(long, env = "HL_API_URL")]
    pub api_url: Option<String>,

    /// Search endpoint path (default: "/api/products/search/image")
    #[arg(long, env = "HL_SEARCH_PATH")]
    pub search_path: Option<String>,

    /// Bearer token for the backend
    #[arg(long, env = "HL_TOKEN")]
    pub token: Option<String>,

    /// Request timeout in sec (default: 30)
    #[arg(long, env = "HL_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Only show products of this type
    #[arg(short = 't', long = "type", env = "HL_PRODUCT_TYPE")]
    pub product_type: Option<String>,

    /// Drop products further away than this distance
    #[arg(short, long, env = "HL_MAX_DISTANCE")]
    pub max_distance: Option<f64>,

    /// Show at most this many products per image
    #[arg(short, long, env = "HL_LIMIT")]
    pub limit: Option<usize>,

    /// Output format (default: text)
    #[arg(short, long, value_enum, env = "HL_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Config file path (default: "healthlink.toml")
    #[arg(short, long, env = "HL_CONFIG")]
    pub config: Option<String>,
}

impl CliArgs {
    pub fn as_config(&self) -> Config {
        Config {
            api: Api {
                base_url: self.api_url.clone(),
                search_path: self.search_path.clone(),
                token: self.token.clone(),
                timeout: self.timeout,
            },
            search: Search {
                product_type: self.product_type.clone(),
                max_distance: self.max_distance,
                limit: self.limit,
            },
            output: Output {
                format: self.format,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "healthlink-search",
            "--api-url",
            "http://backend:8080",
            "--type",
            "equipment",
            "--limit",
            "5",
            "--format",
            "json",
            "gloves.jpg",
            "mask.png",
        ]);

        assert_eq!(
            args.images,
            vec![PathBuf::from("gloves.jpg"), PathBuf::from("mask.png")]
        );

        let config = args.as_config();
        assert_eq!(config.api.base_url.as_deref(), Some("http://backend:8080"));
        assert_eq!(config.search.product_type.as_deref(), Some("equipment"));
        assert_eq!(config.search.limit, Some(5));
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert_eq!(config.api.timeout, None);
    }

    #[test]
    fn test_requires_an_image() {
        assert!(CliArgs::try_parse_from(["healthlink-search"]).is_err());
    }
}
