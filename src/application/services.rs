use crate::application::builders::argument_builder::ArgumentBuilder;
use crate::application::parsers::command_parser::CommandParser;
use crate::domain::entities::{HistoryItem, Request, Response};
use crate::domain::errors::ServiceError;
use crate::domain::value_objects::Headers;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Executes a request through some transfer mechanism.
///
/// Implementations never fail: a transfer that did not complete comes back
/// as a [`Response`] with `error` set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &Request) -> Response;
}

/// Record store for past executions
#[cfg_attr(test, mockall::automock)]
pub trait HistoryStore: Send + Sync {
    fn save(&self, request: &Request, response: &Response, command: &str) -> Result<i64>;
    /// Newest first
    fn list(&self, limit: usize) -> Result<Vec<HistoryItem>>;
    fn get(&self, id: i64) -> Result<Option<HistoryItem>>;
    fn ping(&self) -> Result<()>;
}

/// Application service for executing, parsing and recalling requests.
///
/// Collaborators are injected by the composition root. History is optional;
/// without it executions are simply not recorded.
pub struct HttpRequestService {
    transport: Box<dyn Transport>,
    history: Option<Arc<dyn HistoryStore>>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpRequestService {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            history: None,
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn with_history(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(store);
        self
    }

    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }

    /// Executes `request` and records it in the background.
    pub async fn execute(&self, request: Request) -> Response {
        debug!(method = %request.method, url = %request.url, "executing request");
        let response = self.transport.execute(&request).await;
        if response.is_failure() {
            debug!(error = %response.error, "transfer failed");
        }
        self.record(request, response.clone());
        response
    }

    pub fn parse_command(&self, command: &str) -> Request {
        CommandParser::parse(command)
    }

    pub fn command_line(&self, request: &Request) -> String {
        ArgumentBuilder::command_line(request)
    }

    pub fn history(&self, limit: usize) -> Result<Vec<HistoryItem>, ServiceError> {
        match &self.history {
            Some(store) => Ok(store.list(limit)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn request_by_id(&self, id: i64) -> Result<HistoryItem, ServiceError> {
        let store = self.store()?;
        store.get(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Rebuilds the stored response of a history item.
    pub fn response_by_id(&self, id: i64) -> Result<Response, ServiceError> {
        let item = self.request_by_id(id)?;
        let headers = if item.response_headers.is_empty() {
            Headers::new()
        } else {
            serde_json::from_str(&item.response_headers).unwrap_or_else(|err| {
                warn!(id, error = %err, "failed to decode stored response headers");
                Headers::new()
            })
        };
        Ok(Response {
            status_code: item.status_code,
            headers,
            formatted_body: item.response_body.clone(),
            body: item.response_body,
            response_type: item.response_type,
            ..Response::default()
        })
    }

    pub fn check_history(&self) -> (bool, String) {
        let Some(store) = &self.history else {
            return (false, "History store not initialized".to_string());
        };
        match store.ping() {
            Ok(()) => (true, "History store connection successful".to_string()),
            Err(err) => (false, format!("History store check failed: {err:#}")),
        }
    }

    /// Waits for outstanding history writes and releases the collaborators.
    pub async fn close(self) {
        let handles = self
            .pending
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for handle in handles {
            if let Err(err) = handle.await {
                warn!(error = %err, "history write task failed");
            }
        }
    }

    fn store(&self) -> Result<&Arc<dyn HistoryStore>, ServiceError> {
        self.history
            .as_ref()
            .ok_or(ServiceError::NotInitialized("history store"))
    }

    fn record(&self, request: Request, response: Response) {
        let Some(store) = self.history.clone() else {
            return;
        };
        let command = ArgumentBuilder::command_line(&request);
        let handle = tokio::task::spawn_blocking(move || {
            match store.save(&request, &response, &command) {
                Ok(id) => debug!(id, "saved request to history"),
                Err(err) => warn!(error = %err, "failed to save request to history"),
            }
        });
        match self.pending.lock() {
            Ok(mut pending) => {
                pending.retain(|handle| !handle.is_finished());
                pending.push(handle);
            }
            Err(_) => warn!("history task list poisoned; write will not be awaited"),
        }
    }
}
