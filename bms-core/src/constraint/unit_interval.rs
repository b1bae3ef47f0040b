mod left_open;
mod right_open;

use std::cmp::Ordering;

use uom::si::{f64::Ratio, ratio::ratio};

use crate::constraint::{ConstraintError, ConstraintResult};

pub use left_open::UnitIntervalLeftOpen;
pub use right_open::UnitIntervalRightOpen;

/// Types with well-defined zero and one, comparable against both.
///
/// Implemented for `f64` and `uom::si::f64::Ratio`.
pub trait UnitBounds: PartialOrd + Sized {
    fn zero() -> Self;
    fn one() -> Self;
}

impl UnitBounds for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }
}

impl UnitBounds for Ratio {
    fn zero() -> Self {
        Ratio::new::<ratio>(0.0)
    }

    fn one() -> Self {
        Ratio::new::<ratio>(1.0)
    }
}

/// Orders `value` against zero and against one.
///
/// Fails with [`ConstraintError::NotANumber`] when either comparison is undefined.
fn compare_to_bounds<T: UnitBounds>(value: &T) -> ConstraintResult<(Ordering, Ordering)> {
    let lower = value
        .partial_cmp(&T::zero())
        .ok_or(ConstraintError::NotANumber)?;
    let upper = value
        .partial_cmp(&T::one())
        .ok_or(ConstraintError::NotANumber)?;
    Ok((lower, upper))
}
