use crate::core::csv_input::parse_csv;
use crate::core::AnalysisService;
use crate::domain::model::{AnalysisRequest, AnalysisResult, Record};
use crate::utils::error::{AppError, Result};
use std::path::Path;

pub struct AnalyzeController<A: AnalysisService> {
    service: A,
    file_name: Option<String>,
    rows: Option<Vec<Record>>,
    prompt: String,
    results: Option<AnalysisResult>,
}

impl<A: AnalysisService> AnalyzeController<A> {
    pub fn new(service: A) -> Self {
        Self {
            service,
            file_name: None,
            rows: None,
            prompt: String::new(),
            results: None,
        }
    }

    /// Parses an uploaded CSV. Replaces any previously loaded file.
    pub fn load_csv(&mut self, file_name: impl Into<String>, data: &[u8]) -> Result<usize> {
        let file_name = file_name.into();
        let rows = parse_csv(data)?;
        let count = rows.len();

        tracing::info!("📄 Loaded {} rows from {}", count, file_name);
        self.file_name = Some(file_name);
        self.rows = Some(rows);
        Ok(count)
    }

    pub async fn load_csv_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        self.load_csv(path.display().to_string(), &data)
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn rows(&self) -> Option<&[Record]> {
        self.rows.as_deref()
    }

    pub fn results(&self) -> Option<&AnalysisResult> {
        self.results.as_ref()
    }

    /// The analyze action is only enabled with a parsed file and a prompt.
    pub fn can_analyze(&self) -> bool {
        self.rows.is_some() && !self.prompt.is_empty()
    }

    /// Sends the parsed rows and prompt to the analysis service.
    ///
    /// Failures are logged and otherwise ignored: the previous result, if
    /// any, stays in place and `None` is returned.
    pub async fn analyze(&mut self) -> Option<&AnalysisResult> {
        let Some(rows) = self.rows.as_deref() else {
            tracing::debug!("Analyze skipped: no CSV loaded");
            return None;
        };
        if self.prompt.is_empty() {
            tracing::debug!("Analyze skipped: empty prompt");
            return None;
        }

        tracing::info!("🧠 Analyzing {} rows", rows.len());
        let request = AnalysisRequest {
            data: rows,
            prompt: &self.prompt,
        };

        match self.service.analyze(&request).await {
            Ok(result) => {
                tracing::info!("✅ Analysis returned {} rows", result.len());
                self.results = Some(result);
                self.results.as_ref()
            }
            Err(e) => {
                tracing::error!("Analysis error: {}", e);
                None
            }
        }
    }
}
