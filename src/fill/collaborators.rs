

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;

use crate::core::error::Result;


/// Locates question elements in the host document. Handles are opaque to the engine.
#[async_trait]
pub trait FormInspector: Send + Sync {
    type Handle: Send + Sync;


    /// Question handles in document order.
    async fn list_question_nodes(&self) -> Vec<Self::Handle>;


    fn question_label(&self, handle: &Self::Handle) -> String;
}


/// Writes a value into whatever widget the question renders as.
#[async_trait]
pub trait FieldFiller<H: Send + Sync>: Send + Sync {
    async fn apply_answer(&self, handle: &H, value: &str) -> Result<()>;
}


/// Review-mode output: suggestions are shown next to the question, not applied.
#[async_trait]
pub trait ReviewAnnotator<H: Send + Sync>: Send + Sync {
    async fn annotate(&self, handle: &H, suggested: &str) -> Result<()>;


    async fn clear_annotations(&self) -> Result<()>;
}


/// Polls until at least one question exists or the budget runs out; returns what was found.
pub async fn wait_for_questions<I>(inspector: &I, budget: Duration, poll: Duration) -> Vec<I::Handle>
where
    I: FormInspector + ?Sized,
{
    let deadline = Instant::now() + budget;
    loop {
        let nodes = inspector.list_question_nodes().await;
        if !nodes.is_empty() {
            return nodes;
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            debug!("No question nodes after {:?}", budget);
            return nodes;
        }
        tokio::time::sleep(poll.min(remaining)).await;
    }
}
