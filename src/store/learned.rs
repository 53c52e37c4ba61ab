

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::base::{get_typed, set_typed, KeyValueStore, LEARNED_KEY};
use crate::core::error::{Result, SmartfillError};
use crate::resolver::LearnedPair;


/// Read side of the learned-pairs pool.
#[async_trait]
pub trait LearnedPairs: Send + Sync {
    async fn pairs(&self) -> Result<Vec<LearnedPair>>;
}


/// Write side: records confirmed pairs. Duplicates are allowed and never collapsed.
#[async_trait]
pub trait LearningSink: Send + Sync {
    async fn append(&self, question: &str, answer: &str, timestamp: i64) -> Result<()>;
}


/// Keeps only entries with string question and answer; anything else is dropped silently.
pub fn parse_import(json: &str) -> Result<Vec<LearnedPair>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(SmartfillError::Validation(
            "learned pairs import must be a JSON array".to_string(),
        ));
    };

    let total = items.len();
    let pairs: Vec<LearnedPair> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<LearnedPair>(item).ok())
        .collect();

    if pairs.len() < total {
        debug!("Import dropped {} malformed entries", total - pairs.len());
    }
    Ok(pairs)
}


/// Append-only merge: imported pairs go after the existing ones.
pub fn merge(existing: Vec<LearnedPair>, imported: Vec<LearnedPair>) -> Vec<LearnedPair> {
    let mut merged = existing;
    merged.extend(imported);
    merged
}


#[derive(Clone)]
pub struct LearnedPool {
    store: Arc<dyn KeyValueStore>,
}

impl LearnedPool {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }


    pub async fn load(&self) -> Result<Vec<LearnedPair>> {
        Ok(get_typed::<Vec<LearnedPair>>(self.store.as_ref(), LEARNED_KEY)
            .await?
            .unwrap_or_default())
    }


    async fn save(&self, pairs: &[LearnedPair]) -> Result<()> {
        set_typed(self.store.as_ref(), LEARNED_KEY, pairs).await
    }


    pub async fn len(&self) -> Result<usize> {
        Ok(self.load().await?.len())
    }


    pub async fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.load().await?)?)
    }


    /// Returns the number of pairs added.
    pub async fn import_json(&self, json: &str) -> Result<usize> {
        let imported = parse_import(json)?;
        let added = imported.len();
        let merged = merge(self.load().await?, imported);
        self.save(&merged).await?;
        info!("Imported {} learned pairs ({} total)", added, merged.len());
        Ok(added)
    }


    /// Case-insensitive substring filter over question and answer, in pool order.
    /// Each hit carries its index in the pool so it can be passed to [`Self::remove_at`].
    pub async fn search(&self, query: &str) -> Result<Vec<(usize, LearnedPair)>> {
        let query = query.to_lowercase();
        Ok(self
            .load()
            .await?
            .into_iter()
            .enumerate()
            .filter(|(_, pair)| {
                query.is_empty()
                    || pair.question.to_lowercase().contains(&query)
                    || pair.answer.to_lowercase().contains(&query)
            })
            .collect())
    }


    pub async fn remove_at(&self, index: usize) -> Result<LearnedPair> {
        let mut pairs = self.load().await?;
        if index >= pairs.len() {
            return Err(SmartfillError::Validation(format!(
                "no learned pair at index {} (pool has {})",
                index,
                pairs.len()
            )));
        }
        let removed = pairs.remove(index);
        self.save(&pairs).await?;
        Ok(removed)
    }


    pub async fn clear(&self) -> Result<()> {
        self.save(&[]).await?;
        warn!("Learned pairs cleared");
        Ok(())
    }
}

#[async_trait]
impl LearnedPairs for LearnedPool {
    async fn pairs(&self) -> Result<Vec<LearnedPair>> {
        self.load().await
    }
}

#[async_trait]
impl LearningSink for LearnedPool {
    async fn append(&self, question: &str, answer: &str, timestamp: i64) -> Result<()> {
        let mut pairs = self.load().await?;
        pairs.push(LearnedPair::new(question, answer, timestamp));
        self.save(&pairs).await?;
        debug!("Learned pair appended ({} total)", pairs.len());
        Ok(())
    }
}
