//! Model registry keyed by name.
//!
//! Names are matched case-insensitively and through a small alias table, so
//! `"Monte_Carlo"` and `"montecarlo"` resolve to the same model.

use std::collections::BTreeMap;
use std::sync::Arc;

use lottery_core::PredictionModel;

use crate::{FrequencyModel, MarkovModel, MonteCarloModel, TrendModel};

const ALIASES: &[(&str, &str)] = &[
    ("monte_carlo", "montecarlo"),
    ("mc", "montecarlo"),
    ("freq", "frequency"),
];

/// Registry of prediction models shared across runs.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<dyn PredictionModel>>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in model.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FrequencyModel));
        registry.register(Arc::new(TrendModel::default()));
        registry.register(Arc::new(MarkovModel));
        registry.register(Arc::new(MonteCarloModel::default()));
        registry
    }

    /// Registers a model under its own name, replacing any previous one.
    pub fn register(&mut self, model: Arc<dyn PredictionModel>) {
        let name = model.name().to_lowercase();
        self.models.insert(name, model);
    }

    /// Resolves a name or alias to its canonical id.
    #[must_use]
    pub fn canonical_name(name: &str) -> String {
        let key = name.trim().to_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map_or(key, |(_, target)| (*target).to_string())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn PredictionModel>> {
        self.models.get(&Self::canonical_name(name)).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(&Self::canonical_name(name))
    }

    /// Returns registered model names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_register_all_models() {
        let registry = ModelRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec!["frequency", "markov", "montecarlo", "trend"]
        );
    }

    #[test]
    fn aliases_and_case_resolve() {
        let registry = ModelRegistry::with_defaults();
        assert_eq!(registry.get("Monte_Carlo").unwrap().name(), "montecarlo");
        assert!(registry.contains(" FREQ "));
        assert!(registry.get("lstm").is_none());
    }

    #[test]
    fn empty_registry() {
        let registry = ModelRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
