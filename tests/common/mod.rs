use serde_json::Value;
use std::sync::Arc;
use tailor::{DataMap, InMemoryResourceProvider};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Builds an in-memory template set from (name, content) pairs.
pub fn store(resources: &[(&str, &str)]) -> Arc<InMemoryResourceProvider> {
    let provider = InMemoryResourceProvider::new();
    for (name, content) in resources {
        provider
            .add(*name, content.as_bytes().to_vec())
            .expect("populate in-memory store");
    }
    Arc::new(provider)
}

/// Converts a `json!` object literal into a primary data map.
pub fn data(value: Value) -> DataMap {
    value
        .as_object()
        .expect("test data must be a JSON object")
        .clone()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
