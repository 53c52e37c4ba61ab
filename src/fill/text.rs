

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use super::collaborators::{FieldFiller, FormInspector, ReviewAnnotator};
use crate::core::error::{Result, SmartfillError};


/// In-memory form built from plain labels. Handles are label positions.
#[derive(Debug)]
pub struct TextForm {
    labels: Vec<String>,
    visible_at: Instant,
    failing: HashSet<usize>,
    applied: Mutex<Vec<(usize, String)>>,
    annotations: Mutex<BTreeMap<usize, String>>,
}

impl TextForm {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            visible_at: Instant::now(),
            failing: HashSet::new(),
            applied: Mutex::new(Vec::new()),
            annotations: Mutex::new(BTreeMap::new()),
        }
    }


    /// One label per non-empty line.
    pub fn from_lines(text: &str) -> Self {
        Self::new(text.lines().map(str::trim).filter(|line| !line.is_empty()))
    }


    /// Questions only show up after `delay`, like a page still rendering.
    pub fn appearing_after(mut self, delay: Duration) -> Self {
        self.visible_at = Instant::now() + delay;
        self
    }


    /// Applying an answer to this position fails.
    pub fn failing_at(mut self, position: usize) -> Self {
        self.failing.insert(position);
        self
    }


    pub fn labels(&self) -> &[String] {
        &self.labels
    }


    pub fn applied(&self) -> Vec<(usize, String)> {
        self.applied.lock().clone()
    }


    pub fn applied_value(&self, position: usize) -> Option<String> {
        self.applied
            .lock()
            .iter()
            .rev()
            .find(|(p, _)| *p == position)
            .map(|(_, v)| v.clone())
    }


    pub fn annotations(&self) -> BTreeMap<usize, String> {
        self.annotations.lock().clone()
    }
}

#[async_trait]
impl FormInspector for TextForm {
    type Handle = usize;

    async fn list_question_nodes(&self) -> Vec<usize> {
        if Instant::now() < self.visible_at {
            return Vec::new();
        }
        (0..self.labels.len()).collect()
    }

    fn question_label(&self, handle: &usize) -> String {
        self.labels
            .get(*handle)
            .map(|label| label.trim().to_string())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FieldFiller<usize> for TextForm {
    async fn apply_answer(&self, handle: &usize, value: &str) -> Result<()> {
        if self.failing.contains(handle) {
            return Err(SmartfillError::Collaborator(format!(
                "no writable widget for question {}",
                handle
            )));
        }
        self.applied.lock().push((*handle, value.to_string()));
        Ok(())
    }
}

#[async_trait]
impl ReviewAnnotator<usize> for TextForm {
    async fn annotate(&self, handle: &usize, suggested: &str) -> Result<()> {
        self.annotations.lock().insert(*handle, suggested.to_string());
        Ok(())
    }

    async fn clear_annotations(&self) -> Result<()> {
        self.annotations.lock().clear();
        Ok(())
    }
}
