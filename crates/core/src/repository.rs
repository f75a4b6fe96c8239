// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository identity and static (admin-edited) attributes.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of a harvested repository, assigned by the backend.
    ///
    /// Stable for the lifetime of the repository record.
    pub struct RepositoryId;
}

/// How often the backend harvests a repository automatically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Schedule {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Once,
}

crate::simple_display! {
    Schedule {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
        Once => "once",
    }
}

impl Schedule {
    /// Human label used in tables.
    pub fn label(self) -> &'static str {
        match self {
            Schedule::Daily => "Daily",
            Schedule::Weekly => "Weekly",
            Schedule::Monthly => "Monthly",
            Schedule::Once => "Once (manual)",
        }
    }
}

impl std::str::FromStr for Schedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Schedule::Daily),
            "weekly" => Ok(Schedule::Weekly),
            "monthly" => Ok(Schedule::Monthly),
            "once" => Ok(Schedule::Once),
            other => Err(format!("unknown schedule: {other}")),
        }
    }
}

/// A repository harvest definition as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: RepositoryId,
    pub name: String,
    /// OAI-PMH endpoint
    pub url: String,
    #[serde(default)]
    pub metadata_prefix: String,
    #[serde(default)]
    pub set: String,
    /// Datestamp of the last completed harvest, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_stamp: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub schedule: Schedule,
}

crate::builder! {
    pub struct RepositoryBuilder => Repository {
        into {
            id: RepositoryId = "1",
            name: String = "test-repo",
            url: String = "http://oai.example.org/oai",
            metadata_prefix: String = "nl_didl",
            set: String = "",
        }
        set {
            enabled: bool = false,
            schedule: Schedule = Schedule::Daily,
        }
        option {
            date_stamp: String = None,
        }
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
