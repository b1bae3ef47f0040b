use std::{cmp::Ordering, marker::PhantomData};

use crate::constraint::{Constrained, Constraint, ConstraintError};

use super::{UnitBounds, compare_to_bounds};

/// Marker type enforcing that a value lies in the left-open unit interval: `0 < x ≤ 1`.
///
/// # Examples
///
/// ```
/// use bms_core::constraint::UnitIntervalLeftOpen;
///
/// let eol = UnitIntervalLeftOpen::new(0.8).unwrap();
/// assert_eq!(eol.into_inner(), 0.8);
///
/// assert!(UnitIntervalLeftOpen::new(1.0).is_ok());
/// assert!(UnitIntervalLeftOpen::new(0.0).is_err());
/// assert!(UnitIntervalLeftOpen::new(1.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitIntervalLeftOpen;

impl UnitIntervalLeftOpen {
    /// Constructs `Constrained<T, UnitIntervalLeftOpen>` if 0 < value ≤ 1.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than or equal to zero.
    /// - [`ConstraintError::AboveMaximum`] if greater than one.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: UnitBounds>(
        value: T,
    ) -> Result<Constrained<T, UnitIntervalLeftOpen>, ConstraintError> {
        Constrained::<T, UnitIntervalLeftOpen>::new(value)
    }

    /// Returns the upper bound (one) as a constrained value.
    #[must_use]
    pub fn one<T: UnitBounds>() -> Constrained<T, UnitIntervalLeftOpen> {
        Constrained::<T, UnitIntervalLeftOpen> {
            value: T::one(),
            _marker: PhantomData,
        }
    }
}

impl<T: UnitBounds> Constraint<T> for UnitIntervalLeftOpen {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match compare_to_bounds(value)? {
            (Ordering::Greater, Ordering::Greater) => Err(ConstraintError::AboveMaximum),
            (Ordering::Greater, _) => Ok(()),
            _ => Err(ConstraintError::BelowMinimum),
        }
    }
}
