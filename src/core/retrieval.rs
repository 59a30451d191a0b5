use crate::core::{ConfigProvider, RetrievalService, Storage};
use crate::domain::model::FormInput;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStatus {
    Idle,
    Loading,
    Completed,
    Failed,
}

impl RetrievalStatus {
    pub fn heading(&self) -> &'static str {
        match self {
            RetrievalStatus::Idle => "Enter details to start",
            RetrievalStatus::Loading => "Fetching is in progress...",
            RetrievalStatus::Completed => "Fetching completed!",
            RetrievalStatus::Failed => "Fetching failed!",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RetrievalStatus::Loading => "Please wait, fetching is in progress...",
            RetrievalStatus::Failed => "Something went wrong, try again.",
            RetrievalStatus::Idle | RetrievalStatus::Completed => "File generated successfully.",
        }
    }
}

/// Response body kept in memory until the user saves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl Download {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub struct RetrievalController<S: Storage, R: RetrievalService> {
    storage: S,
    service: R,
    file_name: String,
    output_path: String,
    status: RetrievalStatus,
    download: Option<Download>,
}

impl<S: Storage, R: RetrievalService> RetrievalController<S, R> {
    pub fn new(
        storage: S,
        service: R,
        file_name: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            service,
            file_name: file_name.into(),
            output_path: output_path.into(),
            status: RetrievalStatus::Idle,
            download: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(storage: S, service: R, config: &C) -> Self {
        Self::new(storage, service, config.download_filename(), config.output_path())
    }

    pub fn status(&self) -> RetrievalStatus {
        self.status
    }

    pub fn download_ready(&self) -> Option<&Download> {
        self.download.as_ref()
    }

    pub fn can_download(&self) -> bool {
        self.status == RetrievalStatus::Completed && self.download.is_some()
    }

    /// Submits one form.
    ///
    /// Invalid input is rejected before any request is made. Every failure
    /// after that ends in `Failed` rather than an `Err`.
    pub async fn submit(&mut self, input: FormInput) -> Result<RetrievalStatus> {
        input.validate()?;

        self.download = None;
        self.status = RetrievalStatus::Loading;
        tracing::info!(
            "🚀 Fetching results for {} (rolls {}..={}, {} students, semester {})",
            input.institute_code,
            input.roll_start,
            input.roll_end,
            input.roll_count(),
            input.semester
        );

        match self.service.retrieve(&input).await {
            Ok(data) => {
                tracing::info!("✅ Received {} bytes", data.len());
                self.download = Some(Download {
                    file_name: self.file_name.clone(),
                    data,
                });
                self.status = RetrievalStatus::Completed;
            }
            Err(e) => {
                tracing::error!("❌ Fetching failed: {} (Category: {:?})", e, e.category());
                self.status = RetrievalStatus::Failed;
            }
        }

        Ok(self.status)
    }

    /// Saves the pending download. Does nothing when there is none.
    pub async fn download(&self) -> Result<Option<String>> {
        let Some(download) = self.download.as_ref() else {
            tracing::debug!("Nothing to download");
            return Ok(None);
        };

        self.storage.write_file(&download.file_name, &download.data).await?;

        let output_path = format!("{}/{}", self.output_path, download.file_name);
        tracing::info!("📁 Saved {} bytes to {}", download.len(), output_path);
        Ok(Some(output_path))
    }
}
