use crate::core::ownership::StakeholderOwnership;
use crate::core::stakeholder::{StakeholderCategory, StakeholderName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every intermediate value of one SAFE conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeAuditDetail {
    pub safe_name: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_cap: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_from_cap: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_from_discount: Option<Decimal>,
    pub final_conversion_price: Decimal,
    pub shares_from_safe: Decimal,
}

/// When in a round the option pool was resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopUpTiming {
    PreMoney,
    PostMoney,
}

/// Audit record of an option pool top-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsopTopUpDetail {
    pub timing: TopUpTiming,
    pub target_percent: Decimal,
    /// Total shares the target is measured against, after the top-up.
    pub basis_shares: Decimal,
    pub esop_shares_before: Decimal,
    /// Zero when the pool already met the target.
    pub shares_issued: Decimal,
    pub esop_shares_after: Decimal,
}

impl EsopTopUpDetail {
    /// Pool size as a percentage of `basis_shares`.
    pub fn achieved_percent(&self) -> Decimal {
        if self.basis_shares.is_zero() {
            return Decimal::ZERO;
        }
        self.esop_shares_after / self.basis_shares * Decimal::ONE_HUNDRED
    }
}

/// A founder secondary sale that went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondarySaleDetail {
    pub founder_name: String,
    pub buyer: StakeholderName,
    pub amount: Decimal,
    pub shares_transferred: Decimal,
}

/// Audit record of one processed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundBreakdown {
    pub round_name: String,
    pub pre_money_valuation: Decimal,
    pub capital_raised: Decimal,
    pub post_money_valuation: Decimal,
    /// Share count the round is priced on, after any pre-money top-up.
    pub pre_money_shares: Decimal,
    pub priced_round_share_price: Decimal,
    /// Shares issued to the priced-round investors.
    pub priced_round_shares: Decimal,
    pub total_shares_after: Decimal,
    pub ownership_before: Vec<StakeholderOwnership>,
    pub ownership_after: Vec<StakeholderOwnership>,
    /// `(1 − previous total / new total) × 100`.
    pub dilution_percent: Decimal,
    pub safe_audit_details: Vec<SafeAuditDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esop_top_up: Option<EsopTopUpDetail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_sales: Vec<SecondarySaleDetail>,
}

impl RoundBreakdown {
    pub fn ownership_after_of(&self, name: &str) -> Option<&StakeholderOwnership> {
        crate::core::ownership::find(&self.ownership_after, name)
    }

    pub fn ownership_before_of(&self, name: &str) -> Option<&StakeholderOwnership> {
        crate::core::ownership::find(&self.ownership_before, name)
    }
}

/// Cash a stakeholder receives at the exit valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderPayout {
    pub name: StakeholderName,
    #[serde(rename = "type")]
    pub category: StakeholderCategory,
    pub percentage: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    /// Post-money valuation of the last round; zero without rounds.
    pub final_post_money_valuation: Decimal,
    pub final_ownership: Vec<StakeholderOwnership>,
    pub exit_payouts: Vec<StakeholderPayout>,
}

impl ScenarioSummary {
    pub fn payout_of(&self, name: &str) -> Option<&StakeholderPayout> {
        self.exit_payouts.iter().find(|p| p.name.as_str() == name)
    }

    pub fn ownership_of(&self, name: &str) -> Option<&StakeholderOwnership> {
        crate::core::ownership::find(&self.final_ownership, name)
    }
}

/// What the engine hands back to the host.
///
/// Check `error` first: when it is set, `summary` is the empty default and
/// `breakdown` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub summary: ScenarioSummary,
    pub breakdown: Vec<RoundBreakdown>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl CalculationResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn warnings(&self) -> &[String] {
        self.warnings.as_deref().unwrap_or(&[])
    }
}

fn write_ownership(f: &mut fmt::Formatter<'_>, rows: &[StakeholderOwnership]) -> fmt::Result {
    for row in rows {
        writeln!(
            f,
            "  {:<24} {:<9} {:>18} {:>8}%",
            row.name.as_str(),
            row.category.as_str(),
            row.shares.round_dp(2),
            row.percentage.round_dp(2)
        )?;
    }
    Ok(())
}

impl fmt::Display for RoundBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.round_name)?;
        writeln!(f, "Pre-money:       {}", self.pre_money_valuation)?;
        writeln!(f, "Capital raised:  {}", self.capital_raised)?;
        writeln!(f, "Post-money:      {}", self.post_money_valuation)?;
        writeln!(f, "Pre-money shares: {}", self.pre_money_shares.round_dp(2))?;
        writeln!(f, "Share price:     {}", self.priced_round_share_price.round_dp(6))?;
        writeln!(f, "Dilution:        {}%", self.dilution_percent.round_dp(2))?;

        if let Some(top_up) = &self.esop_top_up {
            writeln!(
                f,
                "ESOP top-up ({:?}): {} shares issued, pool at {}%",
                top_up.timing,
                top_up.shares_issued.round_dp(2),
                top_up.achieved_percent().round_dp(2)
            )?;
        }

        for safe in &self.safe_audit_details {
            writeln!(
                f,
                "SAFE {}: {} at {} -> {} shares",
                safe.safe_name,
                safe.amount,
                safe.final_conversion_price.round_dp(6),
                safe.shares_from_safe.round_dp(2)
            )?;
        }

        for sale in &self.secondary_sales {
            writeln!(
                f,
                "Secondary: {} sold {} shares to {} for {}",
                sale.founder_name,
                sale.shares_transferred.round_dp(2),
                sale.buyer,
                sale.amount
            )?;
        }

        writeln!(f, "\n--- Ownership after ---")?;
        write_ownership(f, &self.ownership_after)
    }
}

impl fmt::Display for CalculationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return writeln!(f, "Error: {}", error);
        }

        for round in &self.breakdown {
            writeln!(f, "{}", round)?;
        }

        writeln!(f, "=== Final Cap Table ===")?;
        writeln!(
            f,
            "Final post-money valuation: {}",
            self.summary.final_post_money_valuation
        )?;
        write_ownership(f, &self.summary.final_ownership)?;

        writeln!(f, "\n=== Exit Payouts ===")?;
        for payout in &self.summary.exit_payouts {
            writeln!(
                f,
                "  {:<24} {:>8}% {:>20}",
                payout.name.as_str(),
                payout.percentage.round_dp(2),
                payout.amount.round_dp(2)
            )?;
        }

        if !self.warnings().is_empty() {
            writeln!(f, "\n=== Warnings ===")?;
            for warning in self.warnings() {
                writeln!(f, "  {}", warning)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_response_shape() {
        let response = CalculationResponse::failure("boom");
        assert!(!response.is_ok());
        assert!(response.breakdown.is_empty());
        assert_eq!(response.summary, ScenarioSummary::default());

        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "boom");
        assert!(json.get("warnings").is_none());
        assert_eq!(json["summary"]["finalOwnership"], serde_json::json!([]));
    }

    #[test]
    fn test_amounts_serialize_as_json_numbers() {
        let payout = StakeholderPayout {
            name: StakeholderName::new("Alice"),
            category: StakeholderCategory::Founder,
            percentage: Decimal::new(755, 1),
            amount: Decimal::new(37_750_000, 0),
        };
        let json = serde_json::to_value(&payout).unwrap();
        assert_eq!(json["percentage"].as_f64(), Some(75.5));
        assert_eq!(json["amount"].as_f64(), Some(37_750_000.0));

        let back: StakeholderPayout = serde_json::from_value(json).unwrap();
        assert_eq!(back, payout);
    }

    #[test]
    fn test_failure_display() {
        let response = CalculationResponse::failure("Duplicate founder name: Alice");
        assert_eq!(response.to_string(), "Error: Duplicate founder name: Alice\n");
    }
}
