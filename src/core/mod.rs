pub mod analysis;
pub mod csv_input;
pub mod retrieval;
pub mod table;

pub use crate::domain::model::{AnalysisRequest, AnalysisResult, FormInput, Record};
pub use crate::domain::ports::{AnalysisService, ConfigProvider, RetrievalService, Storage};
pub use crate::utils::error::Result;
