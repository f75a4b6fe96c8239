// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record lookup and repository editing bodies.

use hc_core::{RepositoryId, Schedule};
use serde::{Deserialize, Serialize};

/// One hit of `GET /records/find`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    /// Identifier inside the preservation store
    pub ip_name: String,
    #[serde(default)]
    pub oai_identifier: String,
    pub repository_id: RepositoryId,
    /// Processing stage label, e.g. `"pending"`
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts_create: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts_processed: Option<String>,
}

/// Body of `GET /records/status/<ipName>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    #[serde(flatten)]
    pub summary: RecordSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub errors: Vec<RecordError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts_created: Option<String>,
}

/// Entry of `GET /record-status/status-codes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCodeEntry {
    pub code: i32,
    pub status: String,
}

/// Body of `POST /repositories` and `PUT /repositories/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryForm {
    pub name: String,
    pub url: String,
    pub metadata_prefix: String,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub schedule: Schedule,
}

impl RepositoryForm {
    /// Pre-fill an edit form from the stored repository.
    pub fn from_repository(repository: &hc_core::Repository) -> Self {
        Self {
            name: repository.name.clone(),
            url: repository.url.clone(),
            metadata_prefix: repository.metadata_prefix.clone(),
            set: repository.set.clone(),
            schedule: repository.schedule,
        }
    }

    /// Required fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [("name", &self.name), ("url", &self.url), ("metadataPrefix", &self.metadata_prefix)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect()
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
