use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString, IntoStaticStr};


/// Ordered field-key → answer mapping. Keys are kept exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    fields: Vec<(String, String)>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }


    /// Replaces the value in place when the key already exists, so order is stable.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }


    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }


    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(index).1)
    }


    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }


    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }


    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }


    pub fn len(&self) -> usize {
        self.fields.len()
    }


    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Profile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut profile = Profile::new();
        for (k, v) in iter {
            profile.insert(k, v);
        }
        profile
    }
}

impl Serialize for Profile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct ProfileVisitor;

impl<'de> Visitor<'de> for ProfileVisitor {
    type Value = Profile;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object of string field values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Profile, A::Error> {
        let mut profile = Profile::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            profile.insert(key, value);
        }
        Ok(profile)
    }
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ProfileVisitor)
    }
}


/// A confirmed question → answer association. Accepts the legacy `q`/`a`/`ts` keys on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedPair {
    #[serde(alias = "q")]
    pub question: String,
    #[serde(alias = "a")]
    pub answer: String,
    #[serde(default, alias = "ts")]
    pub timestamp: i64,
}

impl LearnedPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, timestamp: i64) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp,
        }
    }
}


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    LearnedMemory,
    Profile,
    SubstringFallback,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The learned question or profile key the answer came from.
    pub key_or_question: String,
    pub value: String,
    pub score: f64,
    pub source: MatchSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_preserves_order() {
        let profile: Profile =
            serde_json::from_str(r#"{"zip": "1", "name": "Jane", "email": "j@d.com"}"#).unwrap();
        assert_eq!(profile.keys().collect::<Vec<_>>(), vec!["zip", "name", "email"]);
        assert_eq!(
            serde_json::to_string(&profile).unwrap(),
            r#"{"zip":"1","name":"Jane","email":"j@d.com"}"#
        );
    }

    #[test]
    fn test_profile_insert_replaces_in_place() {
        let mut profile = Profile::new().with("name", "Jane").with("email", "a@b.c");
        profile.insert("name", "John");
        assert_eq!(profile.get("name"), Some("John"));
        assert_eq!(profile.keys().next(), Some("name"));
        assert_eq!(profile.len(), 2);
    }

    #[test]
    fn test_profile_remove() {
        let mut profile = Profile::new().with("name", "Jane");
        assert_eq!(profile.remove("name").as_deref(), Some("Jane"));
        assert!(profile.is_empty());
        assert!(profile.remove("name").is_none());
    }

    #[test]
    fn test_profile_rejects_non_string_values() {
        assert!(serde_json::from_str::<Profile>(r#"{"age": 30}"#).is_err());
    }

    #[test]
    fn test_learned_pair_legacy_keys() {
        let pair: LearnedPair =
            serde_json::from_str(r#"{"q": "Email", "a": "x@y.com", "ts": 1700000000000}"#).unwrap();
        assert_eq!(pair, LearnedPair::new("Email", "x@y.com", 1_700_000_000_000));

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["question"], "Email");
    }

    #[test]
    fn test_learned_pair_missing_timestamp() {
        let pair: LearnedPair = serde_json::from_str(r#"{"question": "q", "answer": "a"}"#).unwrap();
        assert_eq!(pair.timestamp, 0);
    }

    #[test]
    fn test_match_source_names() {
        assert_eq!(MatchSource::SubstringFallback.to_string(), "substring_fallback");
    }
}
