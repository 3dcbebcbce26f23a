use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid course id '{value}': {reason}")]
    InvalidCourseId { value: String, reason: String },

    #[error("Unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },

    #[error("Catalog error: {message}")]
    CatalogError { message: String },

    #[error("Export error: {message}")]
    ExportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 行程結束碼；任何錯誤都不以 0 結束
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low | ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::ApiError(_) => ErrorCategory::Network,
            CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CartError::CsvError(_)
            | CartError::SerializationError(_)
            | CartError::InvalidCourseId { .. }
            | CartError::UnexpectedResponse { .. }
            | CartError::CatalogError { .. } => ErrorCategory::Data,
            CartError::IoError(_) | CartError::ExportError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 評分資料缺失時仍可瀏覽課程
            CartError::ApiError(_) | CartError::UnexpectedResponse { .. } => ErrorSeverity::Medium,
            CartError::InvalidCourseId { .. } => ErrorSeverity::Low,
            CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. }
            | CartError::CatalogError { .. }
            | CartError::CsvError(_)
            | CartError::SerializationError(_)
            | CartError::ExportError { .. } => ErrorSeverity::High,
            CartError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CartError::ApiError(_) => {
                "Check the ratings endpoint and your network connection, then retry"
            }
            CartError::UnexpectedResponse { .. } => {
                "Check ratings.mode: bulk expects a JSON array, per_course a single object"
            }
            CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. } => {
                "Review course-cart.toml and the command line flags"
            }
            CartError::InvalidCourseId { .. } => {
                "Course ids look like DEPT-NUMBER, for example CIS-120"
            }
            CartError::CatalogError { .. } | CartError::SerializationError(_) => {
                "Make sure the catalog file is a JSON array of courses with unique ids"
            }
            CartError::CsvError(_) | CartError::ExportError { .. } => {
                "Check the export output path and formats"
            }
            CartError::IoError(_) => "Check that the file exists and is readable/writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::ApiError(_) => "Could not reach the course review service".to_string(),
            CartError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
