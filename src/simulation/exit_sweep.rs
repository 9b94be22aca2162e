//! Exit payouts across a range of exit valuations.
//!
//! The final ownership is computed once; every valuation reuses it, so a
//! sweep costs one payout split per valuation and no round reprocessing.

use crate::core::error::EngineError;
use crate::core::ownership::StakeholderOwnership;
use crate::engine::exit::{exit_payouts, total_payout};
use crate::engine::response::{CalculationResponse, StakeholderPayout};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payouts at one exit valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitPoint {
    pub exit_valuation: Decimal,
    pub payouts: Vec<StakeholderPayout>,
}

impl ExitPoint {
    pub fn payout_of(&self, name: &str) -> Option<Decimal> {
        self.payouts
            .iter()
            .find(|p| p.name.as_str() == name)
            .map(|p| p.amount)
    }

    pub fn total(&self) -> Decimal {
        total_payout(&self.payouts)
    }
}

/// One [`ExitPoint`] per requested valuation, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitSweep {
    pub points: Vec<ExitPoint>,
}

impl ExitSweep {
    /// Split each valuation over `ownership`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] for the first negative valuation.
    ///
    /// # Examples
    ///
    /// ```
    /// use cap_table_engine::core::ledger::StakeholderLedger;
    /// use cap_table_engine::core::stakeholder::StakeholderCategory;
    /// use cap_table_engine::simulation::exit_sweep::ExitSweep;
    /// use rust_decimal_macros::dec;
    ///
    /// let mut ledger = StakeholderLedger::new();
    /// ledger.upsert("Alice", dec!(80), StakeholderCategory::Founder).unwrap();
    /// ledger.upsert("ESOP", dec!(20), StakeholderCategory::Esop).unwrap();
    ///
    /// let sweep = ExitSweep::over(&ledger.snapshot(dec!(100)), &[dec!(1_000), dec!(5_000)]).unwrap();
    /// assert_eq!(sweep.points[1].payout_of("Alice"), Some(dec!(4_000)));
    /// ```
    pub fn over(ownership: &[StakeholderOwnership], valuations: &[Decimal]) -> Result<Self, EngineError> {
        let points = valuations
            .iter()
            .map(|&valuation| {
                if valuation < Decimal::ZERO {
                    return Err(EngineError::invalid_input(
                        "exitValuation",
                        format!("must not be negative, got {valuation}"),
                    ));
                }
                Ok(ExitPoint {
                    exit_valuation: valuation,
                    payouts: exit_payouts(ownership, valuation),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ExitSweep { points })
    }

    /// Sweep the final ownership of a calculation. A failed calculation
    /// is reported as `InvalidInput` carrying its message.
    pub fn from_response(response: &CalculationResponse, valuations: &[Decimal]) -> Result<Self, EngineError> {
        if let Some(error) = &response.error {
            return Err(EngineError::invalid_input("scenario", error.clone()));
        }
        Self::over(&response.summary.final_ownership, valuations)
    }

    /// Amount `name` receives at each point; zero where they hold nothing.
    pub fn series_for(&self, name: &str) -> Vec<Decimal> {
        self.points
            .iter()
            .map(|p| p.payout_of(name).unwrap_or(Decimal::ZERO))
            .collect()
    }
}

impl std::fmt::Display for ExitSweep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Exit Sweep ===")?;
        for point in &self.points {
            writeln!(f, "--- Exit at {} ---", point.exit_valuation)?;
            for payout in &point.payouts {
                writeln!(
                    f,
                    "  {:<24} {:>8}% {:>20}",
                    payout.name.as_str(),
                    payout.percentage.round_dp(2),
                    payout.amount.round_dp(2)
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::ledger::StakeholderLedger;
    use crate::core::stakeholder::StakeholderCategory;
    use rust_decimal_macros::dec;

    fn ownership() -> Vec<StakeholderOwnership> {
        let mut ledger = StakeholderLedger::new();
        ledger.upsert("Alice", dec!(600), StakeholderCategory::Founder).unwrap();
        ledger.upsert("Bob", dec!(300), StakeholderCategory::Founder).unwrap();
        ledger.upsert("ESOP", dec!(100), StakeholderCategory::Esop).unwrap();
        ledger.snapshot(dec!(1000))
    }

    #[test]
    fn test_sweep_scales_linearly() {
        let sweep = ExitSweep::over(&ownership(), &[dec!(10_000_000), dec!(50_000_000), dec!(100_000_000)]).unwrap();
        assert_eq!(sweep.points.len(), 3);
        assert_eq!(
            sweep.series_for("Alice"),
            vec![dec!(6_000_000), dec!(30_000_000), dec!(60_000_000)]
        );
        for point in &sweep.points {
            assert_eq!(point.total(), point.exit_valuation);
        }
    }

    #[test]
    fn test_unknown_name_reads_as_zero() {
        let sweep = ExitSweep::over(&ownership(), &[dec!(1_000)]).unwrap();
        assert_eq!(sweep.series_for("Mallory"), vec![Decimal::ZERO]);
    }

    #[test]
    fn test_negative_valuation_rejected() {
        let err = ExitSweep::over(&ownership(), &[dec!(1_000), dec!(-1)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("exitValuation"));
    }

    #[test]
    fn test_failed_response_is_rejected() {
        let response = CalculationResponse::failure("Duplicate founder name: Alice");
        let err = ExitSweep::from_response(&response, &[dec!(1_000)]).unwrap_err();
        assert!(err.to_string().contains("Duplicate founder name"));
    }

    #[test]
    fn test_empty_valuation_list() {
        let sweep = ExitSweep::over(&ownership(), &[]).unwrap();
        assert!(sweep.points.is_empty());
    }
}
