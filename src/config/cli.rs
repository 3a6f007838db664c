use crate::config::toml_config::SiteConfig;
use crate::core::Storage;
use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "inframax-site")]
#[command(about = "Render the VRC INFRAMAX marketing page with generated copy")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, help = "Generation API base URL")]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Show the prompt and schema without calling the API
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// 載入設定檔（若有），再套用命令列覆蓋
    pub fn resolve(&self) -> Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => SiteConfig::from_file(path)?,
            None => SiteConfig::default(),
        };

        if let Some(output_path) = &self.output_path {
            config.output.output_path = output_path.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.generation.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.generation.model = model.clone();
        }

        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use tempfile::TempDir;

    #[test]
    fn test_cli_overrides_config_file() {
        let args = CliConfig::parse_from([
            "inframax-site",
            "--output-path",
            "./dist",
            "--model",
            "gemini-2.5-pro",
        ]);

        let config = args.resolve().unwrap();
        assert_eq!(config.output_path(), "./dist");
        assert_eq!(config.model(), "gemini-2.5-pro");
        assert_eq!(config.output_filename(), "index.html");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = CliConfig::parse_from(["inframax-site", "--config", "/nonexistent/site.toml"]);
        assert!(args.resolve().is_err());
    }

    #[tokio::test]
    async fn test_local_storage_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested");
        let storage = LocalStorage::new(base.to_string_lossy().to_string());

        storage.write_file("index.html", b"<!DOCTYPE html>").await.unwrap();
        let data = tokio::fs::read(base.join("index.html")).await.unwrap();
        assert_eq!(data, b"<!DOCTYPE html>");
    }
}
