use crate::core::contact_form::DEFAULT_SUBMISSION_DELAY;
use crate::core::generation::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{self, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_COMPANY_NAME: &str = "VRC INFRAMAX PRIVATE LIMITED";

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub contact_form: ContactFormConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub company_name: String,
    pub page_title: Option<String>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            page_title: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    pub fill_unmatched: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./public".to_string(),
            filename: "index.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFormConfig {
    pub submission_delay_ms: u64,
}

impl Default for ContactFormConfig {
    fn default() -> Self {
        Self {
            submission_delay_ms: DEFAULT_SUBMISSION_DELAY.as_millis() as u64,
        }
    }
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，缺少的區段使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("site.company_name", &self.site.company_name)?;
        validation::validate_url("generation.endpoint", &self.generation.endpoint)?;
        validation::validate_non_empty_string("generation.model", &self.generation.model)?;

        if let Some(timeout) = self.generation.timeout_seconds {
            validation::validate_positive_number("generation.timeout_seconds", timeout, 1)?;
        }

        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_file_extension("output.filename", &self.output.filename, &["html", "htm"])?;

        validation::validate_range(
            "contact_form.submission_delay_ms",
            self.contact_form.submission_delay_ms,
            0,
            60_000,
        )?;

        Ok(())
    }
}

impl ConfigProvider for SiteConfig {
    fn company_name(&self) -> &str {
        &self.site.company_name
    }

    fn page_title(&self) -> &str {
        self.site
            .page_title
            .as_deref()
            .unwrap_or(&self.site.company_name)
    }

    fn generation_endpoint(&self) -> &str {
        &self.generation.endpoint
    }

    fn model(&self) -> &str {
        &self.generation.model
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.generation.timeout_seconds.map(Duration::from_secs)
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_filename(&self) -> &str {
        &self.output.filename
    }

    fn submission_delay(&self) -> Duration {
        Duration::from_millis(self.contact_form.submission_delay_ms)
    }

    fn fill_unmatched(&self) -> bool {
        self.content.fill_unmatched.unwrap_or(false)
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();

        assert_eq!(config.company_name(), DEFAULT_COMPANY_NAME);
        assert_eq!(config.page_title(), DEFAULT_COMPANY_NAME);
        assert_eq!(config.model(), "gemini-2.5-flash");
        assert_eq!(config.submission_delay(), Duration::from_secs(1));
        assert!(config.request_timeout().is_none());
        assert!(!config.fill_unmatched());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[site]
company_name = "Acme Builders"
page_title = "Acme | Builders"

[generation]
endpoint = "http://localhost:9000/v1beta"
model = "gemini-2.5-pro"
timeout_seconds = 20

[content]
fill_unmatched = true

[output]
output_path = "./dist"
filename = "home.html"

[contact_form]
submission_delay_ms = 250
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.company_name(), "Acme Builders");
        assert_eq!(config.page_title(), "Acme | Builders");
        assert_eq!(config.generation_endpoint(), "http://localhost:9000/v1beta");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(20)));
        assert!(config.fill_unmatched());
        assert_eq!(config.output_filename(), "home.html");
        assert_eq!(config.submission_delay(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("INFRAMAX_TEST_OUTPUT_DIR", "/tmp/inframax-site");

        let toml_content = r#"
[output]
output_path = "${INFRAMAX_TEST_OUTPUT_DIR}"
filename = "index.html"
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/inframax-site");

        std::env::remove_var("INFRAMAX_TEST_OUTPUT_DIR");
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = SiteConfig::from_toml_str(
            r#"
[generation]
endpoint = "invalid-url"
model = "gemini-2.5-flash"
"#,
        )
        .unwrap();
        assert!(bad_endpoint.validate().is_err());

        let bad_filename = SiteConfig::from_toml_str(
            r#"
[output]
output_path = "./public"
filename = "index.txt"
"#,
        )
        .unwrap();
        assert!(bad_filename.validate().is_err());

        let bad_delay = SiteConfig::from_toml_str(
            r#"
[contact_form]
submission_delay_ms = 120000
"#,
        )
        .unwrap();
        assert!(bad_delay.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = SiteConfig::from_toml_str("[site\ncompany_name = 1").unwrap_err();
        assert!(matches!(err, SiteError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[site]
company_name = "File Test Co"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.company_name(), "File Test Co");
    }
}
