//! Random request generation and outcome bucketing for load runs.

use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use vtol_core::{FeasibilityError, FeasibilityOutcome, FeasibilityRequest, GeoBounds, GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutcomeClass {
    Feasible,
    BatteryShort,
    NoPath,
    InvalidInput,
    Rejected,
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeClass::Feasible => "feasible",
            OutcomeClass::BatteryShort => "battery_short",
            OutcomeClass::NoPath => "no_path",
            OutcomeClass::InvalidInput => "invalid_input",
            OutcomeClass::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

pub fn classify(result: &Result<FeasibilityOutcome, FeasibilityError>) -> OutcomeClass {
    match result {
        Ok(FeasibilityOutcome::Route(route)) if route.feasible => OutcomeClass::Feasible,
        Ok(FeasibilityOutcome::Route(_)) => OutcomeClass::BatteryShort,
        Ok(FeasibilityOutcome::NoPath(_)) => OutcomeClass::NoPath,
        Err(FeasibilityError::Input(_)) => OutcomeClass::InvalidInput,
        Err(_) => OutcomeClass::Rejected,
    }
}

/// Uniform request over `bounds` widened by `spread` of its size on each side.
///
/// A positive spread lets some endpoints fall outside the grid.
pub fn random_request<R: Rng>(
    rng: &mut R,
    bounds: GeoBounds,
    spread: f64,
) -> FeasibilityRequest {
    let spread = if spread.is_finite() { spread.max(0.0) } else { 0.0 };
    let lat_pad = (bounds.max_lat - bounds.min_lat) * spread;
    let lon_pad = (bounds.max_lon - bounds.min_lon) * spread;
    let lat_range = (bounds.min_lat - lat_pad)..=(bounds.max_lat + lat_pad);
    let lon_range = (bounds.min_lon - lon_pad)..=(bounds.max_lon + lon_pad);

    let point = |rng: &mut R| {
        GeoPoint::new(
            rng.random_range(lat_range.clone()),
            rng.random_range(lon_range.clone()),
        )
    };
    let source = point(rng);
    let destination = point(rng);
    FeasibilityRequest {
        source,
        destination,
        battery: rng.random_range(0.0..=100.0),
    }
}

/// Per-class counters, ordered for stable output.
#[derive(Debug, Default)]
pub struct Tally {
    counts: BTreeMap<OutcomeClass, usize>,
}

impl Tally {
    pub fn record(&mut self, class: OutcomeClass) {
        *self.counts.entry(class).or_insert(0) += 1;
    }

    pub fn get(&self, class: OutcomeClass) -> usize {
        self.counts.get(&class).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OutcomeClass, usize)> + '_ {
        self.counts.iter().map(|(class, count)| (*class, *count))
    }
}
