//! Seed loading and boundary validation.

use crate::error::{Result, StoreError};
use crate::state::{AppState, COLLECTION_NAMES};
use crate::store::{Store, StoreConfig};
use serde_json::{Map, Value};
use tracing::debug;

/// Raw seed: collection name to that collection's JSON value.
pub type Seed = Map<String, Value>;

/// A backing source able to produce part of a page's seed.
pub trait SeedSource: Send + Sync {
    fn fetch(&self, page: &str) -> Result<Seed>;
}

impl<F> SeedSource for F
where
    F: Fn(&str) -> Result<Seed> + Send + Sync,
{
    fn fetch(&self, page: &str) -> Result<Seed> {
        self(page)
    }
}

/// A fixed seed, regardless of page.
#[derive(Clone, Debug, Default)]
pub struct StaticSeed(pub Seed);

impl StaticSeed {
    /// Parse a JSON object document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        match serde_json::from_str(json)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(StoreError::InvalidSeed {
                collection: "<root>".to_string(),
                reason: format!("expected an object, got {}", json_kind(&other)),
            }),
        }
    }
}

impl SeedSource for StaticSeed {
    fn fetch(&self, _page: &str) -> Result<Seed> {
        Ok(self.0.clone())
    }
}

/// Builds the initial [`AppState`] for one page load.
///
/// Sources are fetched in the order they were added; a later source wins for
/// a collection both supply. Loading consumes the bootstrap, so a page is
/// seeded at most once.
pub struct Bootstrap {
    page: String,
    sources: Vec<Box<dyn SeedSource>>,
}

impl Bootstrap {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            sources: Vec::new(),
        }
    }

    pub fn source(mut self, source: impl SeedSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Fetch, merge and validate the seed.
    pub fn load(self) -> Result<AppState> {
        let mut merged = Seed::new();
        for source in &self.sources {
            merged.extend(source.fetch(&self.page)?);
        }

        let collections = merged.len();
        let state = state_from_seed(merged)?;
        debug!(page = %self.page, collections, "Seed loaded");
        Ok(state)
    }

    /// Load the seed and construct the store from it.
    pub fn into_store(self, config: StoreConfig) -> Result<Store> {
        Ok(Store::new(self.load()?, config))
    }
}

/// Validate a raw seed and build the snapshot from it.
///
/// Rejects unknown collection names, values of the wrong shape, and
/// duplicate identifiers. Collections the seed omits start empty.
pub fn state_from_seed(seed: Seed) -> Result<AppState> {
    for (name, value) in &seed {
        if !COLLECTION_NAMES.contains(&name.as_str()) {
            return Err(StoreError::UnknownCollection(name.clone()));
        }

        let mut single = Map::new();
        single.insert(name.clone(), value.clone());
        serde_json::from_value::<AppState>(Value::Object(single)).map_err(|e| {
            StoreError::InvalidSeed {
                collection: name.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    let state: AppState = serde_json::from_value(Value::Object(seed))?;
    state.validate()?;
    Ok(state)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Assets, Providers, Theme};
    use serde_json::json;

    fn seed(value: Value) -> Seed {
        match value {
            Value::Object(map) => map,
            _ => panic!("seed must be an object"),
        }
    }

    #[test]
    fn test_missing_collections_start_empty() {
        let state = state_from_seed(seed(json!({
            "assets": [{"id": "a1", "name": "Drill", "monthlyPrice": 50, "status": "Available"}]
        })))
        .unwrap();

        assert_eq!(state.get::<Assets>().len(), 1);
        assert!(state.get::<Providers>().is_empty());
        assert_eq!(&**state.get::<Theme>(), "");
    }

    #[test]
    fn test_unknown_collection_rejected() {
        let err = state_from_seed(seed(json!({ "invoices": [] }))).unwrap_err();
        assert!(matches!(err, StoreError::UnknownCollection(name) if name == "invoices"));
    }

    #[test]
    fn test_wrong_shape_names_collection() {
        let err = state_from_seed(seed(json!({
            "assets": [],
            "providers": {"id": "p1"}
        })))
        .unwrap_err();

        match err {
            StoreError::InvalidSeed { collection, .. } => assert_eq!(collection, "providers"),
            other => panic!("Expected InvalidSeed, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = state_from_seed(seed(json!({
            "providers": [{"id": "p1", "name": "A"}, {"id": "p1", "name": "B"}]
        })))
        .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { collection: "providers", .. }));
    }

    #[test]
    fn test_later_source_wins() {
        let state = Bootstrap::new("/admin/assets")
            .source(StaticSeed(seed(json!({ "theme": "a {}" }))))
            .source(|_page: &str| Ok::<_, StoreError>(seed(json!({ "theme": "b {}" }))))
            .load()
            .unwrap();

        assert_eq!(&**state.get::<Theme>(), "b {}");
    }

    #[test]
    fn test_source_error_propagates() {
        let result = Bootstrap::new("/admin")
            .source(|page: &str| Err::<Seed, _>(StoreError::Source(format!("{page} unavailable"))))
            .load();

        assert!(matches!(result, Err(StoreError::Source(msg)) if msg == "/admin unavailable"));
    }

    #[test]
    fn test_static_seed_requires_object() {
        let err = StaticSeed::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, StoreError::InvalidSeed { .. }));
    }
}
