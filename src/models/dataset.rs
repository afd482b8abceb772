use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::identity::DatasetId;
use crate::error::ClientError;

/// Lifecycle of a dataset; expected to move draft -> published -> archived,
/// though the client does not police transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "createdAt", alias = "created_at", with = "super::wire_time")]
    pub created_at: NaiveDateTime,
    pub status: DatasetStatus,
}

/// Input for dataset creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDataset {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewDataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Rejects a blank name and trims the one that is sent.
    pub fn validated(self) -> Result<Self, ClientError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation(
                "dataset name must not be blank".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            description: self.description,
        })
    }
}

/// One page of the dataset catalog. `page` is 1-indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPage {
    pub items: Vec<Dataset>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Success wrapper the catalog puts around every body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: serde_json::Value,
    pub message: String,
    pub data: T,
}

/// Outcome of one server-side ingestion sweep. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub status: String,
    pub message: String,
    pub files_processed: u64,
}

/// File record returned by the catalog after an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}
