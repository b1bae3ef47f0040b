//! Shared building blocks for the BMS requirement tools.
//!
//! At the moment this is the [`constraint`] module, which validates scalar
//! inputs once at construction so that the sizing formulas never have to
//! re-check them.

pub mod constraint;
