use crate::domain::model::{AnalysisRequest, AnalysisResult, FormInput};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn retrieval_endpoint(&self) -> &str;
    fn analysis_endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    fn download_filename(&self) -> &str;
    fn retrieval_timeout(&self) -> Option<Duration>;
    fn analysis_timeout(&self) -> Option<Duration>;
}

/// The remote result-extraction service.
#[async_trait]
pub trait RetrievalService: Send + Sync {
    /// Posts one form submission and returns the raw response body.
    async fn retrieve(&self, input: &FormInput) -> Result<Vec<u8>>;
}

/// The remote CSV analysis service.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisResult>;
}
