//! Admin-tunable feature importance weights.
//!
//! Readers take an immutable snapshot; the single writer builds a complete
//! replacement map and swaps the shared pointer, so a concurrent scoring
//! call sees either the old map or the new one, never a mix. The write lock
//! is held only for the pointer swap, never during scoring.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

const MAX_WEIGHT: f64 = 10.0;

/// A single weight entry with its admin-facing description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub weight: f64,
    pub description: Option<String>,
}

/// Immutable point-in-time view of the configured weights. Features without
/// an entry implicitly weigh 1.0.
#[derive(Debug, Clone)]
pub struct WeightSnapshot {
    entries: Arc<BTreeMap<String, FeatureWeight>>,
}

impl WeightSnapshot {
    pub fn weight_for(&self, feature: &str) -> f64 {
        self.entries
            .get(feature)
            .map(|entry| entry.weight)
            .unwrap_or(1.0)
    }

    pub fn entries(&self) -> &BTreeMap<String, FeatureWeight> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rejected admin input; the store is left unchanged.
#[derive(Debug, thiserror::Error)]
#[error("weight must be a finite value in (0, {MAX_WEIGHT}], got {weight}")]
pub struct InvalidWeightError {
    pub weight: f64,
}

/// Shared store with single-writer, many-reader discipline.
#[derive(Debug)]
pub struct WeightStore {
    current: RwLock<Arc<BTreeMap<String, FeatureWeight>>>,
}

impl WeightStore {
    /// Start from an explicit weight table.
    pub fn new(entries: BTreeMap<String, FeatureWeight>) -> Self {
        Self {
            current: RwLock::new(Arc::new(entries)),
        }
    }

    /// Start from the seeded default table.
    pub fn with_defaults() -> Self {
        Self::new(default_weights())
    }

    /// Cheap read of the current weights; the snapshot stays valid across
    /// later updates.
    pub fn snapshot(&self) -> WeightSnapshot {
        let guard = self.current.read().expect("weight store lock poisoned");
        WeightSnapshot {
            entries: Arc::clone(&guard),
        }
    }

    /// Replace or add a single weight. Unknown feature names are accepted
    /// as new overrides since the feature set may evolve between releases.
    pub fn update(
        &self,
        feature_name: &str,
        weight: f64,
        description: Option<String>,
    ) -> Result<(), InvalidWeightError> {
        if !weight.is_finite() || weight <= 0.0 || weight > MAX_WEIGHT {
            return Err(InvalidWeightError { weight });
        }

        let mut guard = self.current.write().expect("weight store lock poisoned");
        let mut next = (**guard).clone();
        next.insert(
            feature_name.to_string(),
            FeatureWeight {
                weight,
                description,
            },
        );
        *guard = Arc::new(next);
        Ok(())
    }
}

impl Default for WeightStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Seeded weight table used until an admin tunes it.
pub fn default_weights() -> BTreeMap<String, FeatureWeight> {
    let seeded = [
        ("credit_history", 2.5, "Credit history is the most important factor"),
        ("total_income", 2.0, "Total household income"),
        ("emi_income_ratio", 1.8, "EMI to income ratio"),
        ("loan_amount", 1.5, "Loan amount requested"),
        ("education", 1.2, "Education level"),
        ("property_area", 1.1, "Property location"),
        ("self_employed", 1.0, "Employment type"),
        ("married", 0.9, "Marital status"),
        ("dependents", 0.8, "Number of dependents"),
        ("gender", 0.5, "Gender (lowest weight for fairness)"),
    ];

    seeded
        .into_iter()
        .map(|(name, weight, description)| {
            (
                name.to_string(),
                FeatureWeight {
                    weight,
                    description: Some(description.to_string()),
                },
            )
        })
        .collect()
}
