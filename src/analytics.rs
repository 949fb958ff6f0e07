//! Summary statistics and table ordering for stored prediction history

use crate::db::HistoryEntry;
use crate::types::{RiskFilter, RiskLevel, SortColumn, SortDirection};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResultsSummary {
    pub total: usize,
    pub high_risk: usize,
    pub low_risk: usize,
    /// Mean of probability * 100, zero when there are no entries
    pub average_confidence: f64,
}

impl ResultsSummary {
    /// Share of high-risk entries in [0, 1]
    pub fn high_ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.high_risk as f32 / self.total as f32
        }
    }
}

/// Indices into `entries` that pass `filter`, in display order
pub fn filter_and_sort(
    entries: &[HistoryEntry],
    filter: RiskFilter,
    column: SortColumn,
    direction: SortDirection,
) -> Vec<usize> {
    let mut indices: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| filter.matches(e.risk_level))
        .map(|(i, _)| i)
        .collect();

    indices.sort_by(|&a, &b| {
        let (ea, eb) = (&entries[a], &entries[b]);
        let ord = match column {
            SortColumn::Date => ea.created_at.cmp(&eb.created_at).then(ea.id.cmp(&eb.id)),
            SortColumn::Risk => risk_rank(ea.risk_level)
                .cmp(&risk_rank(eb.risk_level))
                .then_with(|| cmp_probability(ea, eb)),
            SortColumn::Probability => cmp_probability(ea, eb),
        };
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    indices
}

fn risk_rank(level: RiskLevel) -> u8 {
    match level {
        RiskLevel::Low => 0,
        RiskLevel::High => 1,
    }
}

fn cmp_probability(a: &HistoryEntry, b: &HistoryEntry) -> Ordering {
    a.probability.total_cmp(&b.probability)
}
