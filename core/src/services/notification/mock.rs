//! Mailer that records instead of sending

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::traits::{ConfirmationEmail, ConfirmationMailer};

pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<ConfirmationEmail>>>,
    should_fail: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn failing() -> Self {
        let mailer = Self::new();
        mailer.should_fail.store(true, Ordering::SeqCst);
        mailer
    }

    /// Every mail accepted so far
    pub async fn sent(&self) -> Vec<ConfirmationEmail> {
        self.sent.lock().await.clone()
    }

    /// Waits until `count` mails were accepted, yielding to spawned tasks
    ///
    /// Gives up after a bounded number of scheduler turns.
    pub async fn wait_for(&self, count: usize) -> Vec<ConfirmationEmail> {
        for _ in 0..200 {
            let sent = self.sent().await;
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        self.sent().await
    }
}

impl Default for RecordingMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfirmationMailer for RecordingMailer {
    async fn send_confirmation(&self, mail: &ConfirmationEmail) -> Result<String, String> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("mail relay unavailable".to_string());
        }
        self.sent.lock().await.push(mail.clone());
        Ok(format!("mock-mail-{}", uuid::Uuid::new_v4()))
    }
}
