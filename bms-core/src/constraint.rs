//! Numeric invariants checked once, at construction.
//!
//! [`Constrained<T, C>`] pairs a value with a zero-sized marker `C`. The value
//! can only be built through [`Constraint::check`], so holders of the wrapper
//! never need to re-validate it.
//!
//! Markers shipped here:
//!
//! - [`NonNegative`]: `x ≥ 0`, e.g. percentages and eclipse durations
//! - [`StrictlyPositive`]: `x > 0`, e.g. voltages, capacities and currents
//! - [`UnitIntervalRightOpen`]: `0 ≤ x < 1`, e.g. reserve fractions
//! - [`UnitIntervalLeftOpen`]: `0 < x ≤ 1`, e.g. end-of-life capacity factors
//!
//! All of them accept plain floats as well as `uom` quantities.

mod non_negative;
mod strictly_positive;
mod unit_interval;

use std::marker::PhantomData;

use thiserror::Error;

pub use non_negative::NonNegative;
pub use strictly_positive::StrictlyPositive;
pub use unit_interval::{UnitBounds, UnitIntervalLeftOpen, UnitIntervalRightOpen};

/// Validation rule for values of type `T`.
pub trait Constraint<T> {
    /// Accepts or rejects `value`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConstraintError`] describing why `value` is rejected.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// Why a value failed its constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is below the minimum allowed")]
    BelowMinimum,
    #[error("value is above the maximum allowed")]
    AboveMaximum,
}

pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// A value known to satisfy the constraint `C`.
///
/// ```
/// use bms_core::constraint::{Constrained, StrictlyPositive};
///
/// let voltage = Constrained::<f64, StrictlyPositive>::new(28.0).unwrap();
/// assert_eq!(voltage.get(), 28.0);
/// assert!(Constrained::<f64, StrictlyPositive>::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Checks `value` against `C` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns the error reported by `C`.
    pub fn new(value: T) -> ConstraintResult<Self> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Unwraps the checked value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Copy, C: Constraint<T>> Constrained<T, C> {
    #[must_use]
    pub fn get(&self) -> T {
        self.value
    }
}
