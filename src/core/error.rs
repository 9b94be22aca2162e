use crate::core::stakeholder::StakeholderName;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Which family a fatal error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was rejected before any round was processed.
    Validation,
    /// A price or pool solve produced a zero, negative or unrepresentable value.
    Arithmetic,
}

/// Fatal errors. Any of these aborts the whole calculation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Duplicate founder name: {name}")]
    DuplicateFounder { name: String },

    #[error("Initial equity (Founders + ESOP) must sum to 100%, got {total}%")]
    EquitySum { total: Decimal },

    #[error("Name collision: '{name}' is already used by {owner}")]
    NameCollision { name: String, owner: String },

    #[error("Invalid input: {field} {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("{what} in round '{round}' must be positive, got {value}")]
    InvalidPrice {
        what: &'static str,
        round: String,
        value: Decimal,
    },

    #[error("{what} in round '{round}' divides by zero")]
    DivisionByZero { what: &'static str, round: String },

    #[error("{what} in round '{round}' overflows")]
    Overflow { what: &'static str, round: String },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::DuplicateFounder { .. }
            | EngineError::EquitySum { .. }
            | EngineError::NameCollision { .. }
            | EngineError::InvalidInput { .. } => ErrorKind::Validation,
            EngineError::InvalidPrice { .. }
            | EngineError::DivisionByZero { .. }
            | EngineError::Overflow { .. } => ErrorKind::Arithmetic,
        }
    }

    pub(crate) fn overflow(what: &'static str, round: &str) -> Self {
        EngineError::Overflow {
            what,
            round: round.to_string(),
        }
    }

    pub(crate) fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal consistency problems. The offending step is skipped and the
/// calculation carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineWarning {
    /// A founder tried to sell more shares than they hold.
    InsufficientShares {
        founder: StakeholderName,
        round: String,
        requested: Decimal,
        available: Decimal,
    },
    /// A secondary sale names a seller who is not on the cap table.
    UnknownSeller { founder: String, round: String },
}

impl EngineWarning {
    /// Shares missing for an insufficient-shares warning.
    pub fn shortfall(&self) -> Option<Decimal> {
        match self {
            EngineWarning::InsufficientShares {
                requested,
                available,
                ..
            } => Some(*requested - *available),
            EngineWarning::UnknownSeller { .. } => None,
        }
    }
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineWarning::InsufficientShares {
                founder,
                round,
                requested,
                available,
            } => write!(
                f,
                "{} does not have enough shares to sell {} shares in the {} round. They only have {} shares ({} short).",
                founder,
                requested.round_dp(2),
                round,
                available.round_dp(2),
                (*requested - *available).round_dp(2),
            ),
            EngineWarning::UnknownSeller { founder, round } => write!(
                f,
                "{} is not on the cap table; their secondary sale in the {} round was skipped.",
                founder, round
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_kinds() {
        let dup = EngineError::DuplicateFounder { name: "Alice".into() };
        assert_eq!(dup.kind(), ErrorKind::Validation);

        let collision = EngineError::NameCollision {
            name: "ESOP".into(),
            owner: "the option pool".into(),
        };
        assert_eq!(collision.kind(), ErrorKind::Validation);
        assert_eq!(overflow_kind(), ErrorKind::Arithmetic);

        let price = EngineError::InvalidPrice {
            what: "round share price",
            round: "Seed".into(),
            value: dec!(-1),
        };
        assert_eq!(price.kind(), ErrorKind::Arithmetic);
    }

    fn overflow_kind() -> ErrorKind {
        EngineError::overflow("post-money valuation", "Seed").kind()
    }

    #[test]
    fn test_error_messages() {
        let sum = EngineError::EquitySum { total: dec!(110) };
        assert!(sum.to_string().contains("must sum to 100%"));

        let dup = EngineError::DuplicateFounder { name: "Alice".into() };
        assert_eq!(dup.to_string(), "Duplicate founder name: Alice");
    }

    #[test]
    fn test_insufficient_shares_warning_names_everything() {
        let warning = EngineWarning::InsufficientShares {
            founder: StakeholderName::new("Alice"),
            round: "Series A".into(),
            requested: dec!(1500),
            available: dec!(1000),
        };
        let message = warning.to_string();
        assert!(message.contains("Alice"));
        assert!(message.contains("Series A"));
        assert!(message.contains("500"));
        assert_eq!(warning.shortfall(), Some(dec!(500)));
    }
}
