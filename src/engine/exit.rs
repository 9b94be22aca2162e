use crate::core::ownership::StakeholderOwnership;
use crate::engine::response::StakeholderPayout;
use rust_decimal::Decimal;

/// Split `exit_valuation` pro rata over a final ownership snapshot.
///
/// Each stakeholder receives `percentage / 100 × exit_valuation`; there are no
/// liquidation preferences, participation rights or seniority. Payouts keep
/// the snapshot's order.
///
/// # Examples
///
/// ```
/// use cap_table_engine::core::ledger::StakeholderLedger;
/// use cap_table_engine::core::stakeholder::StakeholderCategory;
/// use cap_table_engine::engine::exit::exit_payouts;
/// use rust_decimal_macros::dec;
///
/// let mut ledger = StakeholderLedger::new();
/// ledger.upsert("Alice", dec!(750), StakeholderCategory::Founder).unwrap();
/// ledger.upsert("ESOP", dec!(250), StakeholderCategory::Esop).unwrap();
///
/// let payouts = exit_payouts(&ledger.snapshot(dec!(1000)), dec!(40_000_000));
/// assert_eq!(payouts[0].amount, dec!(30_000_000));
/// assert_eq!(payouts[1].amount, dec!(10_000_000));
/// ```
pub fn exit_payouts(ownership: &[StakeholderOwnership], exit_valuation: Decimal) -> Vec<StakeholderPayout> {
    ownership
        .iter()
        .map(|o| StakeholderPayout {
            name: o.name.clone(),
            category: o.category,
            percentage: o.percentage,
            amount: o.percentage / Decimal::ONE_HUNDRED * exit_valuation,
        })
        .collect()
}

/// Total paid out; equals the exit valuation up to rounding.
pub fn total_payout(payouts: &[StakeholderPayout]) -> Decimal {
    payouts.iter().map(|p| p.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::StakeholderLedger;
    use crate::core::stakeholder::StakeholderCategory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_pro_rata_split() {
        let mut ledger = StakeholderLedger::new();
        ledger.upsert("Alice", dec!(6_000_000), StakeholderCategory::Founder).unwrap();
        ledger.upsert("Bob", dec!(3_000_000), StakeholderCategory::Founder).unwrap();
        ledger.upsert("ESOP", dec!(1_000_000), StakeholderCategory::Esop).unwrap();

        let payouts = exit_payouts(&ledger.snapshot(ledger.total_shares()), dec!(100_000_000));
        assert_eq!(payouts[0].amount, dec!(60_000_000));
        assert_eq!(payouts[1].amount, dec!(30_000_000));
        assert_eq!(payouts[2].amount, dec!(10_000_000));
        assert_eq!(total_payout(&payouts), dec!(100_000_000));
    }

    #[test]
    fn test_zero_exit_pays_nothing() {
        let mut ledger = StakeholderLedger::new();
        ledger.upsert("Alice", dec!(1), StakeholderCategory::Founder).unwrap();
        let payouts = exit_payouts(&ledger.snapshot(dec!(1)), Decimal::ZERO);
        assert_eq!(payouts[0].amount, Decimal::ZERO);
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(exit_payouts(&[], dec!(1_000)).is_empty());
    }
}
