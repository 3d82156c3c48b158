//! Status page view models: headline counts and the pod phase chart.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::protocol::StatusSnapshot;

// ============================================================================
// Constants
// ============================================================================

/// Colour for phases without a dedicated one.
pub const DEFAULT_PHASE_COLOR: &str = "#9E9E9E";

/// Chart colour per pod phase.
const PHASE_COLORS: &[(&str, &str)] = &[
    ("Running", "#4CAF50"),
    ("Pending", "#FFC107"),
    ("Failed", "#F44336"),
    ("Succeeded", "#2196F3"),
    ("Unknown", DEFAULT_PHASE_COLOR),
];

// ============================================================================
// StatusViewModel
// ============================================================================

/// Headline counts plus the raw phase mapping for the chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusViewModel {
    /// Number of pods.
    pub pod_count: u64,
    /// Number of deployments.
    pub deployment_count: u64,
    /// Number of services.
    pub service_count: u64,
    /// Pod phase label to count, unmodified from the snapshot.
    pub pod_statuses: BTreeMap<String, u64>,
}

impl StatusViewModel {
    /// Builds the chart series for the phase mapping.
    #[must_use]
    pub fn chart(&self) -> StatusChart {
        StatusChart::from_counts(&self.pod_statuses)
    }
}

/// Maps a status snapshot to the status page view model.
#[must_use]
pub fn to_status_view(snapshot: &StatusSnapshot) -> StatusViewModel {
    StatusViewModel {
        pod_count: snapshot.pod_count,
        deployment_count: snapshot.deployment_count,
        service_count: snapshot.service_count,
        pod_statuses: snapshot.pod_statuses.clone(),
    }
}

// ============================================================================
// StatusChart
// ============================================================================

/// One slice of the pod phase chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSlice {
    /// Phase label.
    pub label: String,
    /// Pods in this phase.
    pub value: u64,
    /// Fill colour as `#RRGGBB`.
    pub color: &'static str,
    /// Share of all pods, rounded to a whole percent.
    pub percentage: u64,
}

/// Series handed to the chart-drawing collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusChart {
    /// Slices in label order.
    pub slices: Vec<ChartSlice>,
}

impl StatusChart {
    /// Builds a chart from a label to count mapping.
    #[must_use]
    pub fn from_counts(counts: &BTreeMap<String, u64>) -> Self {
        // Widened so neither the sum nor the rounding can overflow.
        let total: u128 = counts.values().map(|&v| u128::from(v)).sum();

        let slices = counts
            .iter()
            .map(|(label, &value)| ChartSlice {
                label: label.clone(),
                value,
                color: phase_color(label),
                percentage: percentage(value, total),
            })
            .collect();

        Self { slices }
    }

    /// Sum of all slice values, saturating at `u64::MAX`.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.slices
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.value))
    }

    /// Returns `true` if there is nothing to draw.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Returns the chart colour for a pod phase.
#[must_use]
pub fn phase_color(label: &str) -> &'static str {
    PHASE_COLORS
        .iter()
        .find(|(phase, _)| *phase == label)
        .map_or(DEFAULT_PHASE_COLOR, |(_, color)| color)
}

/// Rounded percentage, half away from zero; 0 when `total` is 0.
fn percentage(value: u64, total: u128) -> u64 {
    if total == 0 {
        return 0;
    }
    let rounded = (u128::from(value) * 200 + total) / (total * 2);
    u64::try_from(rounded).unwrap_or(100)
}

// ============================================================================
// Tests
// ============================================================================
