use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a stakeholder on the cap table.
///
/// Names are the ledger's keys: a founder, the option pool, each SAFE holder
/// and each round's priced-round investor group all appear under their own
/// name. Two entries with the same name are the same stakeholder.
///
/// # Examples
///
/// ```
/// use cap_table_engine::core::stakeholder::StakeholderName;
///
/// let alice = StakeholderName::new("Alice");
/// let investors = StakeholderName::investor_group("Series A", " Investors");
/// assert_eq!(investors.as_str(), "Series A Investors");
/// assert_ne!(alice, investors);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StakeholderName(String);

impl StakeholderName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name of the entity that buys a round's priced shares,
    /// e.g. `"Seed"` + `" Investors"`.
    pub fn investor_group(round_name: &str, suffix: &str) -> Self {
        Self(format!("{round_name}{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StakeholderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StakeholderName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StakeholderName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What kind of holder a ledger entry is.
///
/// Serialized as `"Founder"`, `"ESOP"` and `"Investor"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakeholderCategory {
    Founder,
    #[serde(rename = "ESOP")]
    Esop,
    Investor,
}

impl StakeholderCategory {
    pub const ALL: [StakeholderCategory; 3] = [
        StakeholderCategory::Founder,
        StakeholderCategory::Esop,
        StakeholderCategory::Investor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StakeholderCategory::Founder => "Founder",
            StakeholderCategory::Esop => "ESOP",
            StakeholderCategory::Investor => "Investor",
        }
    }
}

impl fmt::Display for StakeholderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_equality() {
        let a = StakeholderName::new("Alice");
        let b = StakeholderName::new("Alice");
        let c = StakeholderName::new("Bob");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_investor_group_name() {
        let name = StakeholderName::investor_group("Seed", " Investors");
        assert_eq!(format!("{}", name), "Seed Investors");
    }

    #[test]
    fn test_category_serializes_as_host_labels() {
        let json = serde_json::to_string(&StakeholderCategory::Esop).unwrap();
        assert_eq!(json, "\"ESOP\"");
        let parsed: StakeholderCategory = serde_json::from_str("\"Investor\"").unwrap();
        assert_eq!(parsed, StakeholderCategory::Investor);
    }
}
