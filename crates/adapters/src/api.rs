// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Harvester backend API.

use crate::http::{encode_query, encode_segment, HttpClient, Method, TransportError};
use async_trait::async_trait;
use hc_core::{Clock, Repository, RepositoryId, SystemClock};
use hc_wire::{
    RecordDetail, RecordStatusResponse, RecordSummary, RepositoryForm, RunStateResponse,
    StatusCodeEntry,
};

/// Calls the console makes against the harvester backend.
#[async_trait]
pub trait HarvesterApi: Clone + Send + Sync + 'static {
    async fn list_repositories(&self) -> Result<Vec<Repository>, TransportError>;
    async fn get_repository(&self, id: &RepositoryId) -> Result<Repository, TransportError>;
    async fn create_repository(&self, form: &RepositoryForm) -> Result<Repository, TransportError>;
    async fn update_repository(
        &self,
        id: &RepositoryId,
        form: &RepositoryForm,
    ) -> Result<(), TransportError>;
    async fn delete_repository(&self, id: &RepositoryId) -> Result<(), TransportError>;
    async fn set_enabled(&self, id: &RepositoryId, enabled: bool) -> Result<(), TransportError>;

    async fn start_harvest(&self, id: &RepositoryId) -> Result<(), TransportError>;
    async fn interrupt_harvest(&self, id: &RepositoryId) -> Result<(), TransportError>;
    async fn run_state(&self, id: &RepositoryId) -> Result<RunStateResponse, TransportError>;
    async fn record_status(&self, id: &RepositoryId)
        -> Result<RecordStatusResponse, TransportError>;
    async fn status_codes(&self) -> Result<Vec<StatusCodeEntry>, TransportError>;

    async fn find_records(&self, query: &str) -> Result<Vec<RecordSummary>, TransportError>;
    async fn record(&self, ip_name: &str) -> Result<RecordDetail, TransportError>;
    async fn bulk_reset(&self, id: &RepositoryId) -> Result<(), TransportError>;
    async fn reset_record(&self, ip_name: &str) -> Result<(), TransportError>;
}

/// [`HarvesterApi`] over plain HTTP.
#[derive(Clone)]
pub struct HttpHarvesterApi<C: Clock = SystemClock> {
    client: HttpClient,
    clock: C,
}

impl HttpHarvesterApi<SystemClock> {
    pub fn new(client: HttpClient) -> Self {
        Self::with_clock(client, SystemClock)
    }
}

impl<C: Clock> HttpHarvesterApi<C> {
    pub fn with_clock(client: HttpClient, clock: C) -> Self {
        Self { client, clock }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

fn repo_path(id: &RepositoryId) -> String {
    format!("/repositories/{}", encode_segment(id))
}

#[async_trait]
impl<C: Clock> HarvesterApi for HttpHarvesterApi<C> {
    async fn list_repositories(&self) -> Result<Vec<Repository>, TransportError> {
        self.client.get_json("/repositories").await
    }

    async fn get_repository(&self, id: &RepositoryId) -> Result<Repository, TransportError> {
        self.client.get_json(&repo_path(id)).await
    }

    async fn create_repository(&self, form: &RepositoryForm) -> Result<Repository, TransportError> {
        self.client.send_json(Method::Post, "/repositories", form).await
    }

    async fn update_repository(
        &self,
        id: &RepositoryId,
        form: &RepositoryForm,
    ) -> Result<(), TransportError> {
        let body = serde_json::to_string(form)?;
        self.client.send(Method::Put, &repo_path(id), Some(&body)).await.map(drop)
    }

    async fn delete_repository(&self, id: &RepositoryId) -> Result<(), TransportError> {
        self.client.send(Method::Delete, &repo_path(id), None).await.map(drop)
    }

    async fn set_enabled(&self, id: &RepositoryId, enabled: bool) -> Result<(), TransportError> {
        let action = if enabled { "enable" } else { "disable" };
        let path = format!("{}/{action}", repo_path(id));
        self.client.send(Method::Put, &path, None).await.map(drop)
    }

    async fn start_harvest(&self, id: &RepositoryId) -> Result<(), TransportError> {
        let path = format!("/harvesters/{}/start", encode_segment(id));
        self.client.send(Method::Post, &path, None).await.map(drop)
    }

    async fn interrupt_harvest(&self, id: &RepositoryId) -> Result<(), TransportError> {
        let path = format!("/harvesters/{}/interrupt", encode_segment(id));
        self.client.send(Method::Post, &path, None).await.map(drop)
    }

    async fn run_state(&self, id: &RepositoryId) -> Result<RunStateResponse, TransportError> {
        self.client.get_json(&format!("/harvesters/{}/status", encode_segment(id))).await
    }

    async fn record_status(
        &self,
        id: &RepositoryId,
    ) -> Result<RecordStatusResponse, TransportError> {
        self.client.get_json(&format!("/record-status/{}", encode_segment(id))).await
    }

    async fn status_codes(&self) -> Result<Vec<StatusCodeEntry>, TransportError> {
        self.client.get_json("/record-status/status-codes").await
    }

    async fn find_records(&self, query: &str) -> Result<Vec<RecordSummary>, TransportError> {
        self.client.get_json(&format!("/records/find?q={}", encode_query(query))).await
    }

    async fn record(&self, ip_name: &str) -> Result<RecordDetail, TransportError> {
        // Cache-busting query so intermediaries never serve a stale record.
        let path = format!("/records/status/{}?{}", encode_segment(ip_name), self.clock.epoch_ms());
        self.client.get_json(&path).await
    }

    async fn bulk_reset(&self, id: &RepositoryId) -> Result<(), TransportError> {
        let path = format!("/records/bulk-reset/{}", encode_segment(id));
        self.client.send(Method::Put, &path, None).await.map(drop)
    }

    async fn reset_record(&self, ip_name: &str) -> Result<(), TransportError> {
        let path = format!("/records/reset/{}", encode_segment(ip_name));
        self.client.send(Method::Put, &path, None).await.map(drop)
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{HarvesterApi, TransportError};
    use async_trait::async_trait;
    use hc_core::{Repository, RepositoryId, RunState};
    use hc_wire::{
        RecordDetail, RecordStatusResponse, RecordSummary, RepositoryForm, RunStateResponse,
        StatusCodeEntry,
    };
    use parking_lot::Mutex;
    use std::collections::{BTreeMap, HashMap, HashSet};
    use std::sync::Arc;
    use std::time::Duration;

    /// Recorded backend call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ApiCall {
        ListRepositories,
        GetRepository(RepositoryId),
        CreateRepository(String),
        UpdateRepository(RepositoryId),
        DeleteRepository(RepositoryId),
        SetEnabled(RepositoryId, bool),
        Start(RepositoryId),
        Interrupt(RepositoryId),
        RunState(RepositoryId),
        RecordStatus(RepositoryId),
        StatusCodes,
        FindRecords(String),
        Record(String),
        BulkReset(RepositoryId),
        ResetRecord(String),
    }

    impl ApiCall {
        /// Operation name used to script failures.
        pub fn op(&self) -> &'static str {
            match self {
                ApiCall::ListRepositories => "list_repositories",
                ApiCall::GetRepository(_) => "get_repository",
                ApiCall::CreateRepository(_) => "create_repository",
                ApiCall::UpdateRepository(_) => "update_repository",
                ApiCall::DeleteRepository(_) => "delete_repository",
                ApiCall::SetEnabled(..) => "set_enabled",
                ApiCall::Start(_) => "start_harvest",
                ApiCall::Interrupt(_) => "interrupt_harvest",
                ApiCall::RunState(_) => "run_state",
                ApiCall::RecordStatus(_) => "record_status",
                ApiCall::StatusCodes => "status_codes",
                ApiCall::FindRecords(_) => "find_records",
                ApiCall::Record(_) => "record",
                ApiCall::BulkReset(_) => "bulk_reset",
                ApiCall::ResetRecord(_) => "reset_record",
            }
        }
    }

    #[derive(Default)]
    struct FakeApiState {
        repositories: BTreeMap<RepositoryId, Repository>,
        run_states: HashMap<RepositoryId, RunStateResponse>,
        record_status: HashMap<RepositoryId, RecordStatusResponse>,
        records: BTreeMap<String, RecordDetail>,
        status_codes: Vec<StatusCodeEntry>,
        failing: HashSet<&'static str>,
        hanging: HashSet<&'static str>,
        next_id: u64,
        calls: Vec<ApiCall>,
    }

    /// In-memory backend for tests
    #[derive(Clone, Default)]
    pub struct FakeHarvesterApi {
        inner: Arc<Mutex<FakeApiState>>,
    }

    impl FakeHarvesterApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_repository(&self, repository: Repository) {
            self.inner.lock().repositories.insert(repository.id.clone(), repository);
        }

        pub fn set_run_state(&self, id: &str, run_state: RunState, sequence: Option<u64>) {
            self.inner.lock().run_states.insert(
                RepositoryId::new(id),
                RunStateResponse { run_state, sequence: sequence.map(hc_core::Sequence) },
            );
        }

        pub fn set_record_status(&self, id: &str, counts: &[(&str, u64)], sequence: Option<u64>) {
            self.inner.lock().record_status.insert(
                RepositoryId::new(id),
                RecordStatusResponse {
                    counts: counts.iter().copied().collect(),
                    sequence: sequence.map(hc_core::Sequence),
                },
            );
        }

        pub fn add_record(&self, detail: RecordDetail) {
            self.inner.lock().records.insert(detail.summary.ip_name.clone(), detail);
        }

        pub fn set_status_codes(&self, codes: Vec<StatusCodeEntry>) {
            self.inner.lock().status_codes = codes;
        }

        /// Make every call of `op` fail with HTTP 503.
        pub fn fail(&self, op: &'static str) {
            self.inner.lock().failing.insert(op);
        }

        pub fn recover(&self, op: &'static str) {
            self.inner.lock().failing.remove(op);
        }

        /// Make every call of `op` block until the caller gives up.
        pub fn hang(&self, op: &'static str) {
            self.inner.lock().hanging.insert(op);
        }

        pub fn calls(&self) -> Vec<ApiCall> {
            self.inner.lock().calls.clone()
        }

        pub fn repository(&self, id: &str) -> Option<Repository> {
            self.inner.lock().repositories.get(id).cloned()
        }

        async fn record_call(&self, call: ApiCall) -> Result<(), TransportError> {
            let op = call.op();
            let hang = {
                let mut inner = self.inner.lock();
                inner.calls.push(call);
                if inner.failing.contains(op) {
                    return Err(TransportError::Status {
                        status: 503,
                        body: format!("{op} unavailable"),
                    });
                }
                inner.hanging.contains(op)
            };
            if hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                return Err(TransportError::Timeout(Duration::from_secs(3600)));
            }
            Ok(())
        }

        fn not_found(what: impl std::fmt::Display) -> TransportError {
            TransportError::Status { status: 404, body: format!("{what} not found") }
        }
    }

    #[async_trait]
    impl HarvesterApi for FakeHarvesterApi {
        async fn list_repositories(&self) -> Result<Vec<Repository>, TransportError> {
            self.record_call(ApiCall::ListRepositories).await?;
            Ok(self.inner.lock().repositories.values().cloned().collect())
        }

        async fn get_repository(&self, id: &RepositoryId) -> Result<Repository, TransportError> {
            self.record_call(ApiCall::GetRepository(id.clone())).await?;
            self.inner.lock().repositories.get(id).cloned().ok_or_else(|| Self::not_found(id))
        }

        async fn create_repository(
            &self,
            form: &RepositoryForm,
        ) -> Result<Repository, TransportError> {
            self.record_call(ApiCall::CreateRepository(form.name.clone())).await?;
            let mut inner = self.inner.lock();
            inner.next_id += 1;
            let mut id = inner.next_id;
            while inner.repositories.contains_key(id.to_string().as_str()) {
                id += 1;
            }
            inner.next_id = id;
            let repository = Repository {
                id: RepositoryId::from(id),
                name: form.name.clone(),
                url: form.url.clone(),
                metadata_prefix: form.metadata_prefix.clone(),
                set: form.set.clone(),
                date_stamp: None,
                enabled: false,
                schedule: form.schedule,
            };
            inner.repositories.insert(repository.id.clone(), repository.clone());
            Ok(repository)
        }

        async fn update_repository(
            &self,
            id: &RepositoryId,
            form: &RepositoryForm,
        ) -> Result<(), TransportError> {
            self.record_call(ApiCall::UpdateRepository(id.clone())).await?;
            let mut inner = self.inner.lock();
            let repository = inner.repositories.get_mut(id).ok_or_else(|| Self::not_found(id))?;
            repository.name = form.name.clone();
            repository.url = form.url.clone();
            repository.metadata_prefix = form.metadata_prefix.clone();
            repository.set = form.set.clone();
            repository.schedule = form.schedule;
            Ok(())
        }

        async fn delete_repository(&self, id: &RepositoryId) -> Result<(), TransportError> {
            self.record_call(ApiCall::DeleteRepository(id.clone())).await?;
            self.inner.lock().repositories.remove(id).map(drop).ok_or_else(|| Self::not_found(id))
        }

        async fn set_enabled(&self, id: &RepositoryId, enabled: bool) -> Result<(), TransportError> {
            self.record_call(ApiCall::SetEnabled(id.clone(), enabled)).await?;
            let mut inner = self.inner.lock();
            let repository = inner.repositories.get_mut(id).ok_or_else(|| Self::not_found(id))?;
            repository.enabled = enabled;
            Ok(())
        }

        async fn start_harvest(&self, id: &RepositoryId) -> Result<(), TransportError> {
            self.record_call(ApiCall::Start(id.clone())).await
        }

        async fn interrupt_harvest(&self, id: &RepositoryId) -> Result<(), TransportError> {
            self.record_call(ApiCall::Interrupt(id.clone())).await
        }

        async fn run_state(&self, id: &RepositoryId) -> Result<RunStateResponse, TransportError> {
            self.record_call(ApiCall::RunState(id.clone())).await?;
            Ok(self
                .inner
                .lock()
                .run_states
                .get(id)
                .cloned()
                .unwrap_or(RunStateResponse { run_state: RunState::Waiting, sequence: None }))
        }

        async fn record_status(
            &self,
            id: &RepositoryId,
        ) -> Result<RecordStatusResponse, TransportError> {
            self.record_call(ApiCall::RecordStatus(id.clone())).await?;
            Ok(self.inner.lock().record_status.get(id).cloned().unwrap_or(RecordStatusResponse {
                counts: Default::default(),
                sequence: None,
            }))
        }

        async fn status_codes(&self) -> Result<Vec<StatusCodeEntry>, TransportError> {
            self.record_call(ApiCall::StatusCodes).await?;
            Ok(self.inner.lock().status_codes.clone())
        }

        async fn find_records(&self, query: &str) -> Result<Vec<RecordSummary>, TransportError> {
            self.record_call(ApiCall::FindRecords(query.to_string())).await?;
            Ok(self
                .inner
                .lock()
                .records
                .values()
                .filter(|r| {
                    r.summary.ip_name.contains(query) || r.summary.oai_identifier.contains(query)
                })
                .map(|r| r.summary.clone())
                .collect())
        }

        async fn record(&self, ip_name: &str) -> Result<RecordDetail, TransportError> {
            self.record_call(ApiCall::Record(ip_name.to_string())).await?;
            self.inner.lock().records.get(ip_name).cloned().ok_or_else(|| Self::not_found(ip_name))
        }

        async fn bulk_reset(&self, id: &RepositoryId) -> Result<(), TransportError> {
            self.record_call(ApiCall::BulkReset(id.clone())).await
        }

        async fn reset_record(&self, ip_name: &str) -> Result<(), TransportError> {
            self.record_call(ApiCall::ResetRecord(ip_name.to_string())).await?;
            let mut inner = self.inner.lock();
            let record = inner.records.get_mut(ip_name).ok_or_else(|| Self::not_found(ip_name))?;
            record.summary.state = "pending".to_string();
            record.errors.clear();
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{ApiCall, FakeHarvesterApi};

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
