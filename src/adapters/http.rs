use crate::domain::model::{AnalysisRequest, AnalysisResult, FormInput};
use crate::domain::ports::{AnalysisService, ConfigProvider, RetrievalService};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Any non-2xx status is turned into an error, same as a transport failure.
fn ensure_success(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status from {}: {}", url, status);

    if !status.is_success() {
        return Err(AppError::HttpStatusError {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

#[derive(Debug, Clone)]
pub struct HttpRetrievalClient {
    client: Client,
    endpoint: String,
}

impl HttpRetrievalClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.retrieval_endpoint(), config.retrieval_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RetrievalService for HttpRetrievalClient {
    async fn retrieve(&self, input: &FormInput) -> Result<Vec<u8>> {
        tracing::debug!(
            "POST {} (institute {}, rolls {}..={}, semester {})",
            self.endpoint,
            input.institute_code,
            input.roll_start,
            input.roll_end,
            input.semester
        );

        let response = self.client.post(&self.endpoint).json(input).send().await?;
        let response = ensure_success(response, &self.endpoint)?;
        let bytes = response.bytes().await?;

        tracing::debug!("Received {} bytes from retrieval service", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.analysis_endpoint(), config.analysis_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisResult> {
        tracing::debug!(
            "POST {} with {} rows, prompt of {} chars",
            self.endpoint,
            request.data.len(),
            request.prompt.chars().count()
        );

        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let response = ensure_success(response, &self.endpoint)?;

        // 先讀取完整內容，解析錯誤才能歸類為資料錯誤
        let body = response.bytes().await?;
        let result: AnalysisResult = serde_json::from_slice(&body)?;

        tracing::debug!("Analysis service returned {} rows", result.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_retrieve_posts_form_as_json() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/").json_body(json!({
                "rollStart": 1001,
                "rollEnd": 1003,
                "semester": 4,
                "instituteCode": "0818IT22"
            }));
            then.status(200)
                .header("Content-Type", "text/csv")
                .body("roll,sgpa\n0818IT221001,8.1\n");
        });

        let client = HttpRetrievalClient::new(server.url("/"), None).unwrap();
        let body = client
            .retrieve(&FormInput::new("0818IT22", 1001, 1003, 4))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(body, b"roll,sgpa\n0818IT221001,8.1\n");
    }

    #[tokio::test]
    async fn test_retrieve_non_success_status_is_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(503);
        });

        let client = HttpRetrievalClient::new(server.url("/"), None).unwrap();
        let err = client
            .retrieve(&FormInput::new("0818IT22", 1001, 1003, 4))
            .await
            .unwrap_err();

        api_mock.assert();
        assert!(matches!(err, AppError::HttpStatusError { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_retrieve_slow_response_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .body("late")
                .delay(Duration::from_secs(3));
        });

        let client =
            HttpRetrievalClient::new(server.url("/"), Some(Duration::from_millis(200))).unwrap();
        let err = client
            .retrieve(&FormInput::new("0818IT22", 1001, 1003, 4))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ApiError(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_analyze_returns_rows() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/analyze")
                .json_body(json!({"data": [{"name": "Asha", "marks": "91"}], "prompt": "top 1"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{"name": "Asha", "marks": 91}]));
        });

        let mut row = Record::new();
        row.insert("name", "Asha");
        row.insert("marks", "91");
        let rows = vec![row];

        let client = HttpAnalysisClient::new(server.url("/analyze"), None).unwrap();
        let result = client
            .analyze(&AnalysisRequest {
                data: &rows,
                prompt: "top 1",
            })
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0].get("marks"), Some(&json!(91)));
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_array_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/analyze");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"answer": "Asha"}));
        });

        let client = HttpAnalysisClient::new(server.url("/analyze"), None).unwrap();
        let err = client
            .analyze(&AnalysisRequest {
                data: &[],
                prompt: "who?",
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::SerializationError(_)));
    }
}
