// src/services/testing.rs

//! In-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{FetchError, NotifyError};
use crate::models::UserId;
use crate::services::{FetchedPage, Fetcher, Notifier};

#[derive(Default)]
struct Pages {
    responses: Mutex<HashMap<String, Result<FetchedPage, String>>>,
    fetches: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Gate>>>,
}

/// Blocks fetches until released.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

/// Fetcher answering from a table; clones share the table.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    pages: Arc<Pages>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, html: &str) {
        self.serve_redirected(url, url, html);
    }

    pub fn serve_redirected(&self, url: &str, final_url: &str, html: &str) {
        self.pages.responses.lock().unwrap().insert(
            url.to_string(),
            Ok(FetchedPage {
                final_url: final_url.to_string(),
                html: html.to_string(),
            }),
        );
    }

    pub fn fail(&self, url: &str, message: &str) {
        self.pages
            .responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(message.to_string()));
    }

    pub fn fetches(&self) -> Vec<String> {
        self.pages.fetches.lock().unwrap().clone()
    }

    pub fn install_gate(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.pages.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.pages.fetches.lock().unwrap().push(url.to_string());

        let gate = self.pages.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let response = self.pages.responses.lock().unwrap().get(url).cloned();
        match response {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(FetchError::new(url, message)),
            None => Err(FetchError::new(url, "HTTP status 404 Not Found")),
        }
    }
}

/// Notifier that records deliveries and can reject chosen users.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(UserId, String)>>,
    blocked: Mutex<HashSet<UserId>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&self, user_id: UserId) {
        self.blocked.lock().unwrap().insert(user_id);
    }

    pub fn sent(&self) -> Vec<(UserId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, user_id: UserId, text: &str) -> Result<(), NotifyError> {
        if self.blocked.lock().unwrap().contains(&user_id) {
            return Err(NotifyError::new(user_id, "bot was blocked by the user"));
        }
        self.sent.lock().unwrap().push((user_id, text.to_string()));
        Ok(())
    }
}
