

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use super::base::{get_typed, set_typed, KeyValueStore, PROFILES_KEY, SETTINGS_KEY};
use crate::core::error::{Result, SmartfillError};
use crate::core::settings::Settings;
use crate::resolver::Profile;


/// Named profiles plus the persisted default settings.
#[derive(Clone)]
pub struct ProfileBook {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileBook {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }


    async fn load_all(&self) -> Result<BTreeMap<String, Profile>> {
        Ok(get_typed(self.store.as_ref(), PROFILES_KEY)
            .await?
            .unwrap_or_default())
    }


    pub async fn names(&self) -> Result<Vec<String>> {
        Ok(self.load_all().await?.into_keys().collect())
    }


    pub async fn get(&self, name: &str) -> Result<Option<Profile>> {
        Ok(self.load_all().await?.remove(name))
    }


    /// Inserts or replaces the profile stored under `name`.
    pub async fn save(&self, name: &str, profile: Profile) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SmartfillError::Validation("profile name must not be empty".to_string()));
        }

        let mut all = self.load_all().await?;
        let field_count = profile.len();
        all.insert(name.to_string(), profile);
        set_typed(self.store.as_ref(), PROFILES_KEY, &all).await?;
        info!("Saved profile '{}' with {} fields", name, field_count);
        Ok(())
    }


    /// Returns whether a profile was removed.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        let mut all = self.load_all().await?;
        if all.remove(name).is_none() {
            return Ok(false);
        }
        set_typed(self.store.as_ref(), PROFILES_KEY, &all).await?;
        info!("Deleted profile '{}'", name);
        Ok(true)
    }


    pub async fn load_settings(&self) -> Result<Settings> {
        Ok(self.stored_settings().await?.unwrap_or_default())
    }


    /// `None` until settings have been saved once.
    pub async fn stored_settings(&self) -> Result<Option<Settings>> {
        get_typed(self.store.as_ref(), SETTINGS_KEY).await
    }


    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        set_typed(self.store.as_ref(), SETTINGS_KEY, settings).await
    }
}
