

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, error};

use crate::core::error::{Result, SmartfillError};


/// Resolves once the matching subsystem can take requests.
#[async_trait]
pub trait Readiness: Send + Sync {
    async fn wait_ready(&self);
}


/// The built-in lexical matcher needs no warm-up.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysReady;

#[async_trait]
impl Readiness for AlwaysReady {
    async fn wait_ready(&self) {}
}


/// Readiness signalled from elsewhere, e.g. after a custom scorer finishes loading.
#[derive(Debug)]
pub struct ReadyFlag {
    tx: watch::Sender<bool>,
}

impl ReadyFlag {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }


    pub fn mark_ready(&self) {
        self.tx.send_replace(true);
        debug!("Matcher marked ready");
    }


    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for ReadyFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Readiness for ReadyFlag {
    async fn wait_ready(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}


pub async fn wait_until_ready(readiness: &dyn Readiness, deadline: Duration) -> Result<()> {
    match tokio::time::timeout(deadline, readiness.wait_ready()).await {
        Ok(()) => Ok(()),
        Err(_) => {
            error!("Matcher not ready after {:?}", deadline);
            Err(SmartfillError::InitializationTimeout(deadline))
        }
    }
}
