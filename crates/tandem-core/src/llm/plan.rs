//! Failover plan construction.

use std::sync::Arc;

use crate::llm::box_adapter::BoxProviderAdapter;

/// Static descriptor of one configured provider backend.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Human-facing label: failover ordering, logging, and fragment
    /// attribution all use this.
    pub label: String,
    /// Model identifier passed to the provider's API.
    pub wire_model_id: String,
    pub adapter: Arc<BoxProviderAdapter>,
}

impl ProviderSpec {
    pub fn new(
        label: impl Into<String>,
        wire_model_id: impl Into<String>,
        adapter: Arc<BoxProviderAdapter>,
    ) -> Self {
        Self {
            label: label.into(),
            wire_model_id: wire_model_id.into(),
            adapter,
        }
    }
}

/// Ordered provider attempt sequence.
///
/// Built once per orchestrator: the preferred provider first, every other
/// configured provider after it in stable configuration order, no label
/// repeated.
#[derive(Clone, Debug)]
pub struct FailoverPlan {
    entries: Vec<ProviderSpec>,
}

impl FailoverPlan {
    /// Build the plan from configured specs.
    ///
    /// The entry whose label equals `preferred` moves to the front; the
    /// rest keep their configured order. Duplicate labels keep the first
    /// occurrence. An unknown preferred label leaves the order untouched.
    pub fn build(preferred: &str, specs: Vec<ProviderSpec>) -> Self {
        let mut entries: Vec<ProviderSpec> = Vec::with_capacity(specs.len());
        for spec in specs {
            if entries.iter().any(|existing| existing.label == spec.label) {
                continue;
            }
            entries.push(spec);
        }
        if let Some(idx) = entries.iter().position(|spec| spec.label == preferred) {
            let front = entries.remove(idx);
            entries.insert(0, front);
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[ProviderSpec] {
        &self.entries
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|spec| spec.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
