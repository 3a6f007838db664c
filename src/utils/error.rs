use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    ApiStatusError { status: u16, body: String },

    #[error("API response contained no generated text")]
    EmptyResponseError,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Required element not found: #{id}")]
    MissingElementError { id: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Document,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ApiError(_) => ErrorCategory::Network,
            SiteError::ApiStatusError { .. } | SiteError::EmptyResponseError => ErrorCategory::Api,
            SiteError::SerializationError(_) => ErrorCategory::Data,
            SiteError::MissingElementError { .. } => ErrorCategory::Document,
            SiteError::IoError(_) => ErrorCategory::Storage,
            SiteError::MissingConfigError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 生成失敗時頁面仍會以預設文字輸出
            ErrorCategory::Network | ErrorCategory::Api | ErrorCategory::Data => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Document | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::ApiError(_) => "無法連線到內容生成服務".to_string(),
            SiteError::ApiStatusError { status, .. } => {
                format!("內容生成服務回傳錯誤狀態 {}", status)
            }
            SiteError::EmptyResponseError => "內容生成服務沒有回傳任何內容".to_string(),
            SiteError::SerializationError(_) => "生成的內容格式不正確".to_string(),
            SiteError::MissingElementError { id } => format!("頁面缺少必要元素 #{}", id),
            SiteError::IoError(e) => format!("檔案寫入失敗: {}", e),
            SiteError::MissingConfigError { field } => format!("缺少設定值: {}", field),
            _ => format!("設定錯誤: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SiteError::ApiError(_) => "Check network connectivity and the generation endpoint",
            SiteError::ApiStatusError { .. } => "Verify the API_KEY value and the model name",
            SiteError::EmptyResponseError | SiteError::SerializationError(_) => {
                "Re-run the generation; the model returned unusable output"
            }
            SiteError::MissingElementError { .. } => {
                "Make sure the page shell contains #tagline and #services-container"
            }
            SiteError::IoError(_) => "Check that the output path exists and is writable",
            SiteError::MissingConfigError { .. } => "Set the missing value in the environment or config file",
            SiteError::InvalidConfigValueError { .. }
            | SiteError::ConfigValidationError { .. } => "Fix the configuration file and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
