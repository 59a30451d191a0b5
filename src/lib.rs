pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{HttpAnalysisClient, HttpRetrievalClient};
pub use crate::config::cli::LocalStorage;
pub use crate::config::toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::core::{
    analysis::AnalyzeController,
    retrieval::{RetrievalController, RetrievalStatus},
    table::Table,
};
pub use crate::domain::model::{AnalysisResult, FormInput, Record};
pub use crate::utils::error::{AppError, Result};
