use std::{cmp::Ordering, marker::PhantomData};

use crate::constraint::{Constrained, Constraint, ConstraintError};

use super::{UnitBounds, compare_to_bounds};

/// Marker for fractions in `[0, 1)`.
///
/// Energy reserves use this interval, since reserving the whole capacity would
/// leave nothing to discharge.
///
/// ```
/// use bms_core::constraint::UnitIntervalRightOpen;
///
/// let reserve = UnitIntervalRightOpen::new(0.25).unwrap();
/// assert_eq!(reserve.into_inner(), 0.25);
///
/// assert_eq!(UnitIntervalRightOpen::zero::<f64>().into_inner(), 0.0);
/// assert!(UnitIntervalRightOpen::new(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitIntervalRightOpen;

impl UnitIntervalRightOpen {
    /// Wraps `value` if it lies in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// [`ConstraintError::BelowMinimum`] below zero, [`ConstraintError::AboveMaximum`]
    /// at or above one, and [`ConstraintError::NotANumber`] for NaN.
    pub fn new<T: UnitBounds>(
        value: T,
    ) -> Result<Constrained<T, UnitIntervalRightOpen>, ConstraintError> {
        Constrained::new(value)
    }

    /// A fraction of zero, the inclusive lower bound.
    #[must_use]
    pub fn zero<T: UnitBounds>() -> Constrained<T, UnitIntervalRightOpen> {
        Constrained {
            value: T::zero(),
            _marker: PhantomData,
        }
    }
}

impl<T: UnitBounds> Constraint<T> for UnitIntervalRightOpen {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match compare_to_bounds(value)? {
            (Ordering::Less, _) => Err(ConstraintError::BelowMinimum),
            (_, Ordering::Less) => Ok(()),
            _ => Err(ConstraintError::AboveMaximum),
        }
    }
}
