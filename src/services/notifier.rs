// src/services/notifier.rs

//! Outbound user notifications.

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::models::UserId;

/// Delivers a text message to a chat user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: UserId, text: &str) -> Result<(), NotifyError>;
}

/// Writes notifications to standard output. Used by the console transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, user_id: UserId, text: &str) -> Result<(), NotifyError> {
        log::info!("Notifying user {}", user_id);
        println!("[to {}] {}", user_id, text);
        Ok(())
    }
}
