// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push-channel message decoding.
//!
//! Frames are JSON objects tagged by `type`. Each carries a `repositoryId`
//! (string or number), an optional `sequence`, and a type-specific payload.
//! `record-fetcher` frames are the exception: they describe the backend's
//! global record fetcher and carry no repository.

use hc_core::{
    CountsMode, FetcherState, RecordStage, RecordStatusCounts, RepositoryId, RunState, Sequence,
    StatusEvent,
};
use serde_json::Value;

/// A push frame that could not be turned into a status event.
#[derive(Debug, thiserror::Error)]
pub enum MalformedEventError {
    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Result of decoding a well-formed push frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Event(StatusEvent),
    /// Run-state of the global record fetcher
    Fetcher { state: FetcherState, sequence: Sequence },
    /// Well-formed, but the `type` tag is not a status event.
    Unrecognized(String),
}

/// Decode one push frame.
///
/// `receive_sequence` is only called when the frame has no `sequence` of
/// its own.
pub fn decode_push(
    text: &str,
    receive_sequence: impl FnOnce() -> Sequence,
) -> Result<Decoded, MalformedEventError> {
    let json: Value = serde_json::from_str(text)?;
    let object = json.as_object().ok_or(MalformedEventError::NotAnObject)?;
    let tag = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(MalformedEventError::MissingField("type"))?;

    let event = match tag {
        "run-state" | "harvester-runstate" => {
            let repository_id = repository_id(&json)?;
            let run_state = run_state(&json)?;
            StatusEvent::RunStateChanged {
                repository_id,
                run_state,
                sequence: sequence(&json, receive_sequence)?,
            }
        }
        "record-status" | "status-update" => {
            let repository_id = repository_id(&json)?;
            let counts = counts(&json)?;
            StatusEvent::RecordCountsChanged {
                repository_id,
                counts,
                mode: CountsMode::Merge,
                sequence: sequence(&json, receive_sequence)?,
            }
        }
        "error" | "error-status" => {
            let repository_id = repository_id(&json)?;
            let message = json
                .get("message")
                .and_then(Value::as_str)
                .ok_or(MalformedEventError::MissingField("message"))?
                .to_string();
            StatusEvent::ErrorRaised {
                repository_id,
                message,
                sequence: sequence(&json, receive_sequence)?,
            }
        }
        "socket-closed" => {
            let repository_id = match json.get("repositoryId") {
                None | Some(Value::Null) => None,
                Some(_) => Some(repository_id(&json)?),
            };
            StatusEvent::SocketClosed { repository_id, sequence: sequence(&json, receive_sequence)? }
        }
        "record-fetcher" => {
            // The backend sends the state as the frame's bare `data` payload.
            let raw = json
                .get("runState")
                .or_else(|| json.get("data"))
                .and_then(Value::as_str)
                .ok_or(MalformedEventError::MissingField("runState"))?;
            let state = raw.parse().map_err(|e: hc_core::UnknownFetcherState| {
                MalformedEventError::InvalidField { field: "runState", reason: e.to_string() }
            })?;
            return Ok(Decoded::Fetcher { state, sequence: sequence(&json, receive_sequence)? });
        }
        other => return Ok(Decoded::Unrecognized(other.to_string())),
    };
    Ok(Decoded::Event(event))
}

fn repository_id(json: &Value) -> Result<RepositoryId, MalformedEventError> {
    match json.get("repositoryId") {
        Some(Value::String(s)) if !s.is_empty() => Ok(RepositoryId::new(s.as_str())),
        Some(Value::Number(n)) => n.as_u64().map(RepositoryId::from).ok_or_else(|| {
            MalformedEventError::InvalidField {
                field: "repositoryId",
                reason: format!("{n} is not a valid id"),
            }
        }),
        Some(other) => Err(MalformedEventError::InvalidField {
            field: "repositoryId",
            reason: format!("unexpected value {other}"),
        }),
        None => Err(MalformedEventError::MissingField("repositoryId")),
    }
}

fn run_state(json: &Value) -> Result<RunState, MalformedEventError> {
    let raw = json
        .get("runState")
        .and_then(Value::as_str)
        .ok_or(MalformedEventError::MissingField("runState"))?;
    raw.parse()
        .map_err(|e: hc_core::UnknownRunState| MalformedEventError::InvalidField {
            field: "runState",
            reason: e.to_string(),
        })
}

fn counts(json: &Value) -> Result<RecordStatusCounts, MalformedEventError> {
    let map = json
        .get("counts")
        .and_then(Value::as_object)
        .ok_or(MalformedEventError::MissingField("counts"))?;
    map.iter()
        .map(|(label, count)| {
            let count = count.as_u64().ok_or_else(|| MalformedEventError::InvalidField {
                field: "counts",
                reason: format!("count for {label:?} is not a non-negative integer"),
            })?;
            Ok::<_, MalformedEventError>((RecordStage::from(label.as_str()), count))
        })
        .collect()
}

fn sequence(
    json: &Value,
    receive_sequence: impl FnOnce() -> Sequence,
) -> Result<Sequence, MalformedEventError> {
    match json.get("sequence") {
        None | Some(Value::Null) => Ok(receive_sequence()),
        Some(value) => value.as_u64().map(Sequence).ok_or_else(|| {
            MalformedEventError::InvalidField {
                field: "sequence",
                reason: format!("{value} is not a non-negative integer"),
            }
        }),
    }
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
