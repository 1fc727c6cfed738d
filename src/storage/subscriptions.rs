//! JSON file storage for subscriptions.
//!
//! ## Document Layout
//!
//! ```text
//! {
//!   "123456": [
//!     { "url": "https://shop.example/item", "css": null, "last_status": "UNKNOWN" }
//!   ]
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Serialized access**: one lock per store; each operation holds it for
//!   its entire read-modify-write cycle.
//! - **Atomic replace**: writes go to a sibling `.tmp` file which is then
//!   renamed over the document, so readers never see a partial write.
//! - **Corruption fallback**: a missing or undecodable document reads as an
//!   empty store. A decodable document with the wrong shape is an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{Status, Subscription, Subscriptions, UserId, normalize_selector};

/// Subscription store backed by a single JSON document.
#[derive(Debug)]
pub struct SubscriptionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SubscriptionStore {
    /// Create a store for the document at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of every user's subscriptions.
    pub async fn get_all(&self) -> Result<Subscriptions> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Subscriptions of one user, empty if the user has none.
    pub async fn list_for(&self, user_id: UserId) -> Result<Vec<Subscription>> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        Ok(data.remove(&user_id).unwrap_or_default())
    }

    /// Append a subscription unless the same (url, selector) is already watched.
    ///
    /// Returns whether a new entry was stored.
    pub async fn add(
        &self,
        user_id: UserId,
        url: &str,
        status: Status,
        css: Option<&str>,
    ) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        let entries = data.entry(user_id).or_default();

        if entries.iter().any(|e| e.same_target(url, css)) {
            log::debug!("User {} already watches {} ({:?})", user_id, url, css);
            return Ok(false);
        }

        entries.push(Subscription::new(url, css, status));
        self.write(&data).await?;
        log::info!(
            "User {} now watches {} ({})",
            user_id,
            url,
            normalize_selector(css).as_deref().unwrap_or("no selector")
        );
        Ok(true)
    }

    /// Remove every entry for `url` regardless of selector.
    ///
    /// Drops the user entirely when nothing remains. Persists only on change.
    pub async fn remove(&self, user_id: UserId, url: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;

        let Some(entries) = data.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|e| e.url != url);
        let changed = entries.len() != before;

        if changed {
            if entries.is_empty() {
                data.remove(&user_id);
            }
            self.write(&data).await?;
            log::info!("User {} stopped watching {}", user_id, url);
        }
        Ok(changed)
    }

    /// Overwrite the status of the first entry matching `url`.
    ///
    /// The document is rewritten even when nothing matched.
    pub async fn update_status(&self, user_id: UserId, url: &str, status: Status) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;

        match data
            .get_mut(&user_id)
            .and_then(|entries| entries.iter_mut().find(|e| e.url == url))
        {
            Some(entry) => entry.last_status = status,
            None => log::warn!("No subscription for user {} and {}", user_id, url),
        }

        self.write(&data).await
    }

    /// Overwrite the status of the entry watching `url` with exactly `css`.
    ///
    /// Unlike [`update_status`](Self::update_status), selector variants of
    /// one url keep separate statuses. Persists only when an entry matched.
    pub async fn update_entry_status(
        &self,
        user_id: UserId,
        url: &str,
        css: Option<&str>,
        status: Status,
    ) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;

        let Some(entry) = data
            .get_mut(&user_id)
            .and_then(|entries| entries.iter_mut().find(|e| e.same_target(url, css)))
        else {
            log::warn!(
                "No subscription for user {} and {} ({:?})",
                user_id,
                url,
                css
            );
            return Ok(false);
        };
        entry.last_status = status;

        self.write(&data).await?;
        Ok(true)
    }

    /// Temporary sibling used for atomic replacement.
    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    /// Read and decode the document. Caller must hold the lock.
    async fn read(&self) -> Result<Subscriptions> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Subscriptions::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let value: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                log::warn!(
                    "Subscriptions document {} is corrupt ({}); treating as empty",
                    self.path.display(),
                    e
                );
                return Ok(Subscriptions::new());
            }
        };

        decode_document(value)
    }

    /// Encode and atomically replace the document. Caller must hold the lock.
    async fn write(&self, data: &Subscriptions) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let encoded: BTreeMap<String, &Vec<Subscription>> = data
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(user_id, entries)| (user_id.to_string(), entries))
            .collect();
        let bytes = serde_json::to_vec_pretty(&encoded)?;

        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Validate the decoded JSON against the subscriptions schema.
fn decode_document(value: serde_json::Value) -> Result<Subscriptions> {
    let serde_json::Value::Object(map) = value else {
        return Err(AppError::schema(
            "subscriptions document must be a JSON object",
        ));
    };

    let mut data = Subscriptions::new();
    for (key, entries) in map {
        let user_id: UserId = key
            .trim()
            .parse()
            .map_err(|_| AppError::schema(format!("user key '{key}' is not an integer id")))?;
        let entries: Vec<Subscription> = serde_json::from_value(entries)
            .map_err(|e| AppError::schema(format!("entries for user {key}: {e}")))?;
        if entries.is_empty() {
            continue;
        }
        let entries = entries
            .into_iter()
            .map(|e| Subscription::new(e.url, e.css.as_deref(), e.last_status))
            .collect();
        data.insert(user_id, entries);
    }
    Ok(data)
}
