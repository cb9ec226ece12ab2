use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::{BatchStatus, TravelBatch};

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Number of batches.
    pub total_batches: usize,
    /// Number of batches in each status. Every status is present.
    pub by_status: BTreeMap<BatchStatus, usize>,
    /// Sum of all batch budgets, saturating at `u64::MAX`.
    pub total_budget: u64,
    /// Distinct travelers on batches that are not completed.
    pub active_travelers: usize,
}

impl DashboardStats {
    /// Computes the statistics for a set of batches.
    #[must_use]
    pub fn collect(batches: &[TravelBatch]) -> Self {
        let mut by_status: BTreeMap<_, _> = BatchStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for batch in batches {
            *by_status.entry(batch.status).or_insert(0) += 1;
        }

        let active_travelers = batches
            .iter()
            .filter(|b| b.status != BatchStatus::Completed)
            .flat_map(|b| b.travelers.iter())
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            total_batches: batches.len(),
            by_status,
            total_budget: batches
                .iter()
                .fold(0, |total: u64, b| total.saturating_add(b.budget)),
            active_travelers,
        }
    }

    /// Number of batches in `status`.
    #[must_use]
    pub fn count(&self, status: BatchStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or_default()
    }
}
