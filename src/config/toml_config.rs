use crate::core::ConfigProvider;
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CATALOG_PATH: &str = "data/courses.json";
pub const DEFAULT_RATINGS_ENDPOINT: &str = "https://penncoursereview.com/api/base/2022A/courses";
const DEFAULT_CONCURRENT_REQUESTS: usize = 5;
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub ratings: RatingsConfig,
    pub export: Option<ExportConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingsConfig {
    pub endpoint: String,
    /// "per_course" 或 "bulk"
    pub mode: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub concurrent_requests: Option<usize>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: String,
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// 每門課各自查詢 `{endpoint}/{id}/`
    PerCourse,
    /// 一次取得 `{endpoint}/` 下所有評分
    Bulk,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                path: DEFAULT_CATALOG_PATH.to_string(),
            },
            ratings: RatingsConfig {
                endpoint: DEFAULT_RATINGS_ENDPOINT.to_string(),
                mode: None,
                timeout_seconds: None,
                concurrent_requests: None,
                headers: None,
            },
            export: None,
            logging: None,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CartError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REVIEW_API_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CartError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_catalog_file("catalog.path", &self.catalog.path)?;
        validation::validate_url("ratings.endpoint", &self.ratings.endpoint)?;

        if let Some(mode) = &self.ratings.mode {
            validation::validate_one_of("ratings.mode", mode, &["per_course", "bulk"])?;
        }
        if let Some(concurrent) = self.ratings.concurrent_requests {
            validation::validate_positive_number("ratings.concurrent_requests", concurrent, 1)?;
        }
        if let Some(timeout) = self.ratings.timeout_seconds {
            validation::validate_range("ratings.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(export) = &self.export {
            validation::validate_path("export.output_path", &export.output_path)?;
            for format in &export.formats {
                validation::validate_one_of("export.formats", format, &["csv", "json"])?;
            }
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            validation::validate_one_of("logging.format", format, &["compact", "json"])?;
        }

        Ok(())
    }

    pub fn fetch_mode(&self) -> FetchMode {
        match self.ratings.mode.as_deref() {
            Some("bulk") => FetchMode::Bulk,
            _ => FetchMode::PerCourse,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.ratings
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    pub fn headers(&self) -> HashMap<String, String> {
        self.ratings.headers.clone().unwrap_or_default()
    }

    /// 匯出需要 `[export]` 區段，且至少指定一種格式
    pub fn export_settings(&self) -> Result<&ExportConfig> {
        let export = self
            .export
            .as_ref()
            .ok_or_else(|| CartError::MissingConfigError {
                field: "export".to_string(),
            })?;
        if export.formats.is_empty() {
            return Err(CartError::MissingConfigError {
                field: "export.formats".to_string(),
            });
        }
        Ok(export)
    }

    pub fn log_format(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.format.as_deref())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl ConfigProvider for AppConfig {
    fn ratings_endpoint(&self) -> &str {
        &self.ratings.endpoint
    }

    fn catalog_path(&self) -> &str {
        &self.catalog.path
    }

    fn output_path(&self) -> &str {
        self.export
            .as_ref()
            .map(|e| e.output_path.as_str())
            .unwrap_or("./output")
    }

    fn concurrent_requests(&self) -> usize {
        self.ratings
            .concurrent_requests
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }
}
