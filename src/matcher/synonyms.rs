

use std::collections::{BTreeSet, HashMap};


pub type TokenSet = BTreeSet<String>;


#[derive(Debug, Clone, Default)]
pub struct SynonymExpander {
    table: HashMap<String, Vec<String>>,
}

impl SynonymExpander {
    /// Later entries for an existing key extend its variant list.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table: HashMap<String, Vec<String>> = HashMap::new();
        for (key, variants) in entries {
            table
                .entry(key.into())
                .or_default()
                .extend(variants.into_iter().map(Into::into));
        }
        Self { table }
    }


    /// One level deep and additive: variants are never expanded themselves.
    pub fn expand<I, S>(&self, tokens: I) -> TokenSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = TokenSet::new();
        for token in tokens {
            let token = token.as_ref();
            if let Some(variants) = self.table.get(token) {
                out.extend(variants.iter().cloned());
            }
            out.insert(token.to_string());
        }
        out
    }


    pub fn variants(&self, key: &str) -> Option<&[String]> {
        self.table.get(key).map(Vec::as_slice)
    }


    pub fn len(&self) -> usize {
        self.table.len()
    }


    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
