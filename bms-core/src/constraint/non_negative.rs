use std::{cmp::Ordering, marker::PhantomData};

use num_traits::Zero;

use crate::constraint::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is zero or greater.
///
/// Works with primitive floats and with `uom` quantities such as
/// `uom::si::f64::Energy` or `uom::si::f64::Ratio`.
///
/// # Examples
///
/// ```
/// use bms_core::constraint::NonNegative;
/// use uom::si::{f64::Ratio, ratio::ratio};
///
/// let loss = NonNegative::new(Ratio::new::<ratio>(0.02)).unwrap();
/// assert_eq!(loss.into_inner().get::<ratio>(), 0.02);
///
/// assert!(NonNegative::new(0.0).is_ok());
/// assert!(NonNegative::new(-1.0).is_err());
/// assert!(NonNegative::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Constructs `Constrained<T, NonNegative>` if `value >= 0`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::Negative`] if less than zero.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: PartialOrd + Zero>(value: T) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::<T, NonNegative>::new(value)
    }

    /// Returns zero as a constrained value.
    #[must_use]
    pub fn zero<T: PartialOrd + Zero>() -> Constrained<T, NonNegative> {
        Constrained::<T, NonNegative> {
            value: T::zero(),
            _marker: PhantomData,
        }
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater | Ordering::Equal) => Ok(()),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{electric_charge::ampere_hour, f64::ElectricCharge};

    #[test]
    #[allow(clippy::float_cmp)]
    fn floats() {
        assert_eq!(NonNegative::new(2.5).unwrap().into_inner(), 2.5);
        assert!(NonNegative::new(0.0).is_ok());
        assert!(matches!(
            NonNegative::new(-0.5),
            Err(ConstraintError::Negative)
        ));
        assert!(matches!(
            NonNegative::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        ));
    }

    #[test]
    fn uom_charge() {
        let charge = ElectricCharge::new::<ampere_hour>(5.0);
        assert!(NonNegative::new(charge).is_ok());

        let zero = NonNegative::zero::<ElectricCharge>();
        assert_eq!(zero.into_inner(), ElectricCharge::new::<ampere_hour>(0.0));

        let negative = ElectricCharge::new::<ampere_hour>(-1.0);
        assert!(NonNegative::new(negative).is_err());
    }
}
