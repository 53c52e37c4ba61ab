

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::error::Result;


pub const PROFILES_KEY: &str = "profiles";
pub const LEARNED_KEY: &str = "learned";
pub const SETTINGS_KEY: &str = "settings";


/// Externally owned get/set storage. Each call is atomic on its own; there is no
/// transaction spanning a get and the following set.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;


    async fn set(&self, key: &str, value: Value) -> Result<()>;
}


pub async fn get_typed<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}


pub async fn set_typed<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    store.set(key, serde_json::to_value(value)?).await
}
