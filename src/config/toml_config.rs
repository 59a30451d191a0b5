use crate::core::ConfigProvider;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    is_insecure_remote_url, validate_file_name, validate_path, validate_positive_number,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_RETRIEVAL_ENDPOINT: &str =
    "https://resultextractor-gvbyamg4cch3a0f0.centralindia-01.azurewebsites.net/";
pub const DEFAULT_ANALYSIS_ENDPOINT: &str = "http://localhost:3000/analyze";
pub const DEFAULT_OUTPUT_PATH: &str = ".";
pub const DEFAULT_DOWNLOAD_FILENAME: &str = "results.csv";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_retrieval_endpoint")]
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_analysis_endpoint")]
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_download_filename")]
    pub filename: String,
}

fn default_retrieval_endpoint() -> String {
    DEFAULT_RETRIEVAL_ENDPOINT.to_string()
}

fn default_analysis_endpoint() -> String {
    DEFAULT_ANALYSIS_ENDPOINT.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_download_filename() -> String {
    DEFAULT_DOWNLOAD_FILENAME.to_string()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            endpoint: default_retrieval_endpoint(),
            timeout_seconds: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_analysis_endpoint(),
            timeout_seconds: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            filename: default_download_filename(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ANALYSIS_HOST})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(
        &mut self,
        retrieval_endpoint: Option<String>,
        analysis_endpoint: Option<String>,
        output_path: Option<String>,
    ) {
        if let Some(endpoint) = retrieval_endpoint {
            tracing::debug!("🔧 Retrieval endpoint overridden to: {}", endpoint);
            self.retrieval.endpoint = endpoint;
        }
        if let Some(endpoint) = analysis_endpoint {
            tracing::debug!("🔧 Analysis endpoint overridden to: {}", endpoint);
            self.analysis.endpoint = endpoint;
        }
        if let Some(path) = output_path {
            tracing::debug!("🔧 Output path overridden to: {}", path);
            self.output.output_path = path;
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("retrieval.endpoint", &self.retrieval.endpoint)?;
        validate_url("analysis.endpoint", &self.analysis.endpoint)?;

        if let Some(timeout) = self.retrieval.timeout_seconds {
            validate_positive_number("retrieval.timeout_seconds", timeout, 1)?;
        }
        if let Some(timeout) = self.analysis.timeout_seconds {
            validate_positive_number("analysis.timeout_seconds", timeout, 1)?;
        }

        validate_path("output.output_path", &self.output.output_path)?;
        validate_file_name("output.filename", &self.output.filename)?;

        for (field, endpoint) in [
            ("retrieval.endpoint", &self.retrieval.endpoint),
            ("analysis.endpoint", &self.analysis.endpoint),
        ] {
            if is_insecure_remote_url(endpoint) {
                tracing::warn!(
                    "⚠️ {} uses plain HTTP to a remote host ({}); data travels unencrypted",
                    field,
                    endpoint
                );
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn retrieval_endpoint(&self) -> &str {
        &self.retrieval.endpoint
    }

    fn analysis_endpoint(&self) -> &str {
        &self.analysis.endpoint
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn download_filename(&self) -> &str {
        &self.output.filename
    }

    fn retrieval_timeout(&self) -> Option<Duration> {
        self.retrieval.timeout_seconds.map(Duration::from_secs)
    }

    fn analysis_timeout(&self) -> Option<Duration> {
        self.analysis.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
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
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.retrieval_endpoint(), DEFAULT_RETRIEVAL_ENDPOINT);
        assert_eq!(config.analysis_endpoint(), DEFAULT_ANALYSIS_ENDPOINT);
        assert_eq!(config.output_path(), ".");
        assert_eq!(config.download_filename(), "results.csv");
        assert_eq!(config.retrieval_timeout(), None);
        assert_eq!(config.analysis_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[retrieval]
endpoint = "https://results.example.com/"
timeout_seconds = 120

[analysis]
endpoint = "https://analysis.example.com/analyze"
timeout_seconds = 30

[output]
output_path = "./downloads"
filename = "sem5.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.retrieval_endpoint(), "https://results.example.com/");
        assert_eq!(config.retrieval_timeout(), Some(Duration::from_secs(120)));
        assert_eq!(config.analysis_endpoint(), "https://analysis.example.com/analyze");
        assert_eq!(config.analysis_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.output_path(), "./downloads");
        assert_eq!(config.download_filename(), "sem5.csv");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RESULT_EXTRACTOR_TEST_ANALYSIS_HOST", "analysis.internal:8443");

        let toml_content = r#"
[analysis]
endpoint = "https://${RESULT_EXTRACTOR_TEST_ANALYSIS_HOST}/analyze"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.analysis.endpoint, "https://analysis.internal:8443/analyze");

        std::env::remove_var("RESULT_EXTRACTOR_TEST_ANALYSIS_HOST");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[retrieval]
endpoint = "invalid-url"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[analysis]
timeout_seconds = 0
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[output]
filename = "nested/results.csv"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[retrieval\nendpoint = 1").unwrap_err();
        assert!(matches!(err, AppError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = TomlConfig::default();
        config.apply_overrides(
            Some("https://results.example.com/".to_string()),
            None,
            Some("./out".to_string()),
        );

        assert_eq!(config.retrieval_endpoint(), "https://results.example.com/");
        assert_eq!(config.analysis_endpoint(), DEFAULT_ANALYSIS_ENDPOINT);
        assert_eq!(config.output_path(), "./out");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[output]
filename = "from-file.csv"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.download_filename(), "from-file.csv");
    }
}
