//! ZIP-prefix regional banding.
//!
//! Installation cost is bucketed by the first three digits of the ZIP code into
//! one of three bands. This is a deliberately coarse approximation: it never
//! pretends to be a rate table, and anything not listed explicitly is treated as
//! an average-cost region.

use tracing::debug;

use crate::domain::{RegionalBand, RegionalMultiplier};

/// Minimum ZIP length (after trimming) required before the prefix is inspected.
pub const MIN_ZIP_LEN: usize = 5;

/// An inclusive range of three-digit ZIP prefixes sharing a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixInterval {
    pub lo: u16,
    pub hi: u16,
    pub band: RegionalBand,
}

const fn interval(lo: u16, hi: u16, band: RegionalBand) -> PrefixInterval {
    PrefixInterval { lo, hi, band }
}

/// Built-in prefix table, sorted by `lo` and non-overlapping.
pub const DEFAULT_INTERVALS: &[PrefixInterval] = &[
    // Boston metro
    interval(21, 24, RegionalBand::High),
    // New York City, Long Island
    interval(100, 119, RegionalBand::High),
    // Washington DC
    interval(200, 205, RegionalBand::High),
    // West Virginia
    interval(246, 268, RegionalBand::Low),
    // Alabama
    interval(350, 369, RegionalBand::Low),
    // Mississippi
    interval(386, 397, RegionalBand::Low),
    // South Dakota, North Dakota
    interval(570, 588, RegionalBand::Low),
    // Louisiana, Arkansas, Oklahoma
    interval(700, 749, RegionalBand::Low),
    // California
    interval(900, 961, RegionalBand::High),
    // Hawaii
    interval(967, 968, RegionalBand::High),
    // Seattle
    interval(980, 981, RegionalBand::High),
    // Alaska
    interval(995, 999, RegionalBand::High),
];

/// Maps a ZIP code to its regional band and multiplier.
///
/// Never fails: short or malformed ZIP codes resolve to the average band.
#[derive(Debug, Clone)]
pub struct RegionalBandResolver {
    intervals: &'static [PrefixInterval],
}

impl Default for RegionalBandResolver {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_INTERVALS,
        }
    }
}

impl RegionalBandResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intervals(&self) -> &'static [PrefixInterval] {
        self.intervals
    }

    pub fn resolve(&self, zip_code: &str) -> RegionalMultiplier {
        let band = match zip_prefix(zip_code) {
            Some(prefix) => self.band_for_prefix(prefix),
            None => RegionalBand::Average,
        };
        debug!(zip = zip_code, band = band.as_str(), "resolved regional band");
        band.into()
    }

    pub fn band_for_prefix(&self, prefix: u16) -> RegionalBand {
        self.intervals
            .iter()
            .find(|iv| prefix >= iv.lo && prefix <= iv.hi)
            .map(|iv| iv.band)
            .unwrap_or(RegionalBand::Average)
    }
}

/// Resolve with the built-in table.
pub fn resolve(zip_code: &str) -> RegionalMultiplier {
    RegionalBandResolver::default().resolve(zip_code)
}

/// Numeric value of the first three characters, if the ZIP is long enough and
/// those characters are ASCII digits.
pub fn zip_prefix(zip_code: &str) -> Option<u16> {
    let zip = zip_code.trim();
    if zip.chars().count() < MIN_ZIP_LEN {
        return None;
    }
    let head = zip.get(..3)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}
