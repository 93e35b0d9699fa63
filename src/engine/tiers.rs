//! Tier price arithmetic: scaling, floors and ordering.
//!
//! All bounds are whole currency units. After every scaling pass the tiers go
//! through the same two steps:
//!
//! 1. raise each bound to its absolute floor
//! 2. push bounds upward (never downward) in the order
//!    good.min -> good.max -> better.min -> better.max -> best.min -> best.max
//!    until each exceeds the previous by at least `TIER_GAP`
//!
//! so no multiplier combination can produce overlapping or inverted tiers.

use crate::domain::{PriceRange, TierRange};

/// Minimum distance between adjacent bounds, within and across tiers.
pub const TIER_GAP: i64 = 500;

/// Prices for the reference home before any multiplier.
pub const BASE_TIERS: TierRange = TierRange {
    good: PriceRange::new(5000, 7500),
    better: PriceRange::new(7500, 11000),
    best: PriceRange::new(11000, 16000),
};

/// Absolute floors after the home-factor pass.
pub const HOME_FLOORS: TierRange = TierRange {
    good: PriceRange::new(4000, 5000),
    better: PriceRange::new(6000, 8000),
    best: PriceRange::new(9000, 12000),
};

/// Absolute floors after the regional pass. Only the good tier has one; the
/// upper tiers are held up by the ordering step.
pub const REGIONAL_FLOORS: TierRange = TierRange {
    good: PriceRange::new(3000, 4000),
    better: PriceRange::new(0, 0),
    best: PriceRange::new(0, 0),
};

/// Round half up, matching `Math.round` for the positive values priced here.
pub fn round_price(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn scale_tiers(tiers: &TierRange, multiplier: f64) -> TierRange {
    let scale = |r: PriceRange| {
        PriceRange::new(
            round_price(r.min as f64 * multiplier),
            round_price(r.max as f64 * multiplier),
        )
    };
    TierRange {
        good: scale(tiers.good),
        better: scale(tiers.better),
        best: scale(tiers.best),
    }
}

pub fn apply_floors(tiers: &TierRange, floors: &TierRange) -> TierRange {
    let floor = |r: PriceRange, f: PriceRange| PriceRange::new(r.min.max(f.min), r.max.max(f.max));
    TierRange {
        good: floor(tiers.good, floors.good),
        better: floor(tiers.better, floors.better),
        best: floor(tiers.best, floors.best),
    }
}

pub fn enforce_ordering(tiers: &TierRange, gap: i64) -> TierRange {
    let mut t = *tiers;
    t.good.max = t.good.max.max(t.good.min + gap);
    t.better.min = t.better.min.max(t.good.max + gap);
    t.better.max = t.better.max.max(t.better.min + gap);
    t.best.min = t.best.min.max(t.better.max + gap);
    t.best.max = t.best.max.max(t.best.min + gap);
    t
}

/// Base tiers scaled by the combined home multiplier, floored and ordered.
pub fn price_home_tiers(home_multiplier: f64) -> TierRange {
    let scaled = scale_tiers(&BASE_TIERS, home_multiplier);
    enforce_ordering(&apply_floors(&scaled, &HOME_FLOORS), TIER_GAP)
}

/// Home-priced tiers scaled by the regional multiplier, floored and re-ordered.
pub fn apply_regional(tiers: &TierRange, regional_multiplier: f64) -> TierRange {
    let scaled = scale_tiers(tiers, regional_multiplier);
    enforce_ordering(&apply_floors(&scaled, &REGIONAL_FLOORS), TIER_GAP)
}
