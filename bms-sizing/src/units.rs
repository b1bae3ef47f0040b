use std::fmt;

use uom::si::{
    electric_charge::ampere_hour,
    electric_current::ampere,
    f64::{ElectricCharge, ElectricCurrent},
};

/// Current normalized to capacity, in units of 1/h.
///
/// `1 C` drains the full capacity in one hour.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct CRate(f64);

impl CRate {
    /// Wraps a rate given in multiples of capacity per hour.
    #[must_use]
    pub fn new(per_hour: f64) -> Self {
        Self(per_hour)
    }

    /// Returns the rate that `current` represents for a battery of `capacity`.
    ///
    /// A zero capacity yields a zero rate instead of dividing by zero.
    #[must_use]
    pub fn from_current(current: ElectricCurrent, capacity: ElectricCharge) -> Self {
        let capacity_ah = capacity.get::<ampere_hour>();
        if capacity_ah <= 0.0 {
            return Self(0.0);
        }
        Self(current.get::<ampere>() / capacity_ah)
    }

    /// Returns the rate in multiples of capacity per hour.
    #[must_use]
    pub fn per_hour(self) -> f64 {
        self.0
    }

    /// Returns the current this rate draws from a battery of `capacity`.
    #[must_use]
    pub fn current_for(self, capacity: ElectricCharge) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(self.0 * capacity.get::<ampere_hour>())
    }
}

impl fmt::Display for CRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} C", self.0)
    }
}

/// Rounds `value` to `decimals` places for presentation.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Smallest integer count covering `ratio`, ignoring float noise below 1e-9.
///
/// A ratio such as `28.8 V / 3.6 V` must give 8 cells, not 9.
/// Returns `None` if `ratio` is not finite or the count does not fit in a `u32`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn ceil_count(ratio: f64) -> Option<u32> {
    const TOLERANCE: f64 = 1e-9;
    if !ratio.is_finite() {
        return None;
    }
    let count = (ratio - TOLERANCE).ceil().max(0.0);
    (count <= f64::from(u32::MAX)).then_some(count as u32)
}
