//! Battery management system requirement sizing.
//!
//! The crate turns four mission inputs (orbital period, eclipse duration,
//! average payload power and nominal battery voltage) into BMS requirement
//! values, optionally runs them through the advanced sizing chain, and renders
//! the result as Markdown and JSON.
//!
//! ```
//! use bms_sizing::{CaseRegistry, MissionInputs, calculate};
//!
//! let inputs = MissionInputs::new(90.0, 35.0, 200.0, 28.0)?;
//! let case = CaseRegistry::builtin().get("short_lived_high_power")?;
//! let snippet = calculate(&inputs, case)?;
//!
//! assert!(snippet.rendered_md().contains("### Derived requirements"));
//! # Ok::<(), bms_sizing::BmsError>(())
//! ```

pub mod advanced;
pub mod base;
pub mod case;
mod error;
pub mod mission;
pub mod render;
mod snippet;
mod units;

pub use advanced::{
    AdvancedConfig, AdvancedSizingResult, AuxiliaryParameters, BaseCapacity, compute_advanced,
    size_advanced,
};
pub use base::{calculate, calculate_all};
pub use case::{CaseRegistry, MissionCaseConfig, SocWindow};
pub use error::{BmsError, ConfigIssue, InputIssue};
pub use mission::MissionInputs;
pub use render::{Rendered, render};
pub use snippet::BmsRequirementSnippet;
pub use units::CRate;
