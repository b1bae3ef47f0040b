use bms_core::constraint::ConstraintError;
use thiserror::Error;

use crate::advanced::RequirementViolation;

/// Errors raised by the sizing and rendering operations.
///
/// Every error is raised synchronously where it is detected. Nothing in this
/// crate retries or recovers locally.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum BmsError {
    /// A mission input is non-positive, non-finite, or out of range.
    #[error("invalid mission input `{field}`: {issue}")]
    InvalidInput {
        field: &'static str,
        issue: InputIssue,
    },

    /// A mission case or advanced sizing parameter is missing or invalid.
    #[error("invalid sizing parameter `{field}`: {issue}")]
    Configuration {
        field: &'static str,
        issue: ConfigIssue,
    },

    /// A computed limit exceeds a hard physical bound.
    #[error(transparent)]
    RequirementViolation(#[from] RequirementViolation),

    /// No mission case with the requested name is registered.
    #[error("unknown mission case `{0}`")]
    UnknownCase(String),

    /// A snippet could not be serialized.
    #[error("failed to render snippet: {0}")]
    Render(String),
}

impl BmsError {
    pub(crate) fn invalid_input(field: &'static str, issue: impl Into<InputIssue>) -> Self {
        Self::InvalidInput {
            field,
            issue: issue.into(),
        }
    }

    pub(crate) fn configuration(field: &'static str, issue: impl Into<ConfigIssue>) -> Self {
        Self::Configuration {
            field,
            issue: issue.into(),
        }
    }
}

/// Why a mission input was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum InputIssue {
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error("value must be finite")]
    NotFinite,

    #[error("eclipse duration ({eclipse_min} min) exceeds the orbital period ({period_min} min)")]
    EclipseExceedsPeriod { eclipse_min: f64, period_min: f64 },
}

/// Why a sizing parameter was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigIssue {
    #[error("value is missing")]
    Missing,

    #[error("value must be finite")]
    NotFinite,

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error("unknown redundancy policy `{0}` (expected `none` or `N+1`)")]
    UnknownRedundancyPolicy(String),

    /// The value leads to a cell layout with more cells than can be counted.
    #[error("the resulting cell layout is too large to count")]
    LayoutTooLarge,

    /// The value is valid on its own but conflicts with another parameter.
    #[error("{0}")]
    Inconsistent(&'static str),
}
