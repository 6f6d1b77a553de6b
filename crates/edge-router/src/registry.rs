//! Static catalog of inference backends.

use crate::types::ProviderDescriptor;
use edge_core::{DispatchError, ProviderId, Result, Tier};
use std::collections::HashSet;

/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    rows: Vec<ProviderDescriptor>,
    fallback: ProviderDescriptor,
}

impl ProviderRegistry {
    /// Build from catalog rows. `fallback` must name an on-premise row, and every
    /// `local_equivalent` must point at a cataloged on-premise row.
    pub fn new(rows: Vec<ProviderDescriptor>, fallback: ProviderId) -> Result<Self> {
        let mut seen = HashSet::new();
        for row in &rows {
            if !seen.insert(row.id) {
                return Err(DispatchError::Config(format!("duplicate catalog row for {}", row.id)));
            }
            if row.base_cost_eur < 0.0 || row.cost_per_1k_tokens_eur < 0.0 {
                return Err(DispatchError::Config(format!("negative cost for {}", row.id)));
            }
        }

        let find = |id: ProviderId| rows.iter().find(|r| r.id == id);

        for row in &rows {
            if let Some(eq) = row.local_equivalent {
                let target = find(eq).ok_or_else(|| DispatchError::UnknownProvider { id: eq.to_string() })?;
                if !target.is_local() {
                    return Err(DispatchError::Config(format!(
                        "local equivalent {} of {} is not on-premise",
                        eq, row.id
                    )));
                }
            }
        }

        let fallback = find(fallback)
            .cloned()
            .ok_or_else(|| DispatchError::UnknownProvider { id: fallback.to_string() })?;
        if !fallback.is_local() {
            return Err(DispatchError::Config(format!("fallback {} is not on-premise", fallback.id)));
        }

        Ok(Self { rows, fallback })
    }

    pub(crate) fn from_parts(rows: Vec<ProviderDescriptor>, fallback: ProviderDescriptor) -> Self {
        Self { rows, fallback }
    }

    pub fn lookup(&self, id: ProviderId) -> Result<&ProviderDescriptor> {
        self.rows
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DispatchError::UnknownProvider { id: id.to_string() })
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    /// The guaranteed-available local row used for degraded results.
    pub fn fallback(&self) -> &ProviderDescriptor {
        &self.fallback
    }

    /// Rows advertised to `tier`, in catalog order.
    pub fn available_to(&self, tier: Tier) -> Vec<&ProviderDescriptor> {
        self.rows.iter().filter(|r| r.listed_from <= tier).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
