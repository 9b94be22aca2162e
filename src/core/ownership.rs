use crate::core::ledger::Holding;
use crate::core::stakeholder::{StakeholderCategory, StakeholderName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a cap table snapshot.
///
/// `percentage` is derived from `shares` and the total share count the
/// snapshot was taken at; it is never stored independently in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderOwnership {
    pub name: StakeholderName,
    #[serde(rename = "type")]
    pub category: StakeholderCategory,
    pub shares: Decimal,
    pub percentage: Decimal,
}

/// Turn ledger holdings into ownership records.
///
/// Records are ordered by shares descending. The sort is stable, so holders
/// with equal share counts keep the order in which they entered the ledger,
/// which makes snapshots of identical inputs identical.
///
/// Returns an empty list when `total_shares` is not positive.
pub fn ownership_snapshot(holdings: &[Holding], total_shares: Decimal) -> Vec<StakeholderOwnership> {
    if total_shares <= Decimal::ZERO {
        return Vec::new();
    }

    let mut snapshot: Vec<StakeholderOwnership> = holdings
        .iter()
        .map(|h| StakeholderOwnership {
            name: h.name.clone(),
            category: h.category,
            shares: h.shares,
            percentage: h.shares / total_shares * Decimal::ONE_HUNDRED,
        })
        .collect();

    snapshot.sort_by(|a, b| b.shares.cmp(&a.shares));
    snapshot
}

/// Sum of the percentages in a snapshot. Should be 100 up to rounding.
pub fn total_percentage(snapshot: &[StakeholderOwnership]) -> Decimal {
    snapshot.iter().map(|o| o.percentage).sum()
}

/// Look up a stakeholder's row in a snapshot by name.
pub fn find<'a>(snapshot: &'a [StakeholderOwnership], name: &str) -> Option<&'a StakeholderOwnership> {
    snapshot.iter().find(|o| o.name.as_str() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(name: &str, shares: Decimal) -> Holding {
        Holding {
            name: StakeholderName::new(name),
            category: StakeholderCategory::Founder,
            shares,
        }
    }

    #[test]
    fn test_snapshot_percentages() {
        let holdings = vec![holding("A", dec!(600)), holding("B", dec!(400))];
        let snapshot = ownership_snapshot(&holdings, dec!(1000));
        assert_eq!(snapshot[0].percentage, dec!(60));
        assert_eq!(snapshot[1].percentage, dec!(40));
        assert_eq!(total_percentage(&snapshot), dec!(100));
    }

    #[test]
    fn test_snapshot_sorted_descending() {
        let holdings = vec![
            holding("small", dec!(10)),
            holding("large", dec!(70)),
            holding("mid", dec!(20)),
        ];
        let snapshot = ownership_snapshot(&holdings, dec!(100));
        let names: Vec<&str> = snapshot.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["large", "mid", "small"]);
    }

    #[test]
    fn test_snapshot_ties_keep_insertion_order() {
        let holdings = vec![
            holding("first", dec!(50)),
            holding("second", dec!(50)),
            holding("third", dec!(50)),
        ];
        let snapshot = ownership_snapshot(&holdings, dec!(150));
        let names: Vec<&str> = snapshot.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_snapshot_zero_total_is_empty() {
        let holdings = vec![holding("A", Decimal::ZERO)];
        assert!(ownership_snapshot(&holdings, Decimal::ZERO).is_empty());
    }

    #[test]
    fn test_find_by_name() {
        let holdings = vec![holding("A", dec!(1)), holding("B", dec!(3))];
        let snapshot = ownership_snapshot(&holdings, dec!(4));
        assert_eq!(find(&snapshot, "A").unwrap().percentage, dec!(25));
        assert!(find(&snapshot, "C").is_none());
    }
}
