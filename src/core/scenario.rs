use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything the engine needs to compute one cap table.
///
/// A scenario is an immutable value: the engine only ever borrows it, so the
/// same scenario can be recalculated any number of times with identical
/// results.
///
/// # Examples
///
/// ```
/// use cap_table_engine::core::scenario::{Founder, Round, Safe, ScenarioInput};
/// use rust_decimal_macros::dec;
///
/// let scenario = ScenarioInput::new(dec!(10_000_000), dec!(10))
///     .with_founder(Founder::with_equity("Alice", dec!(60)))
///     .with_founder(Founder::with_equity("Bob", dec!(30)))
///     .with_round(
///         Round::priced("Seed", dec!(8_000_000), dec!(2_000_000))
///             .with_safe(Safe::new("Angel", dec!(250_000)).with_valuation_cap(dec!(5_000_000))),
///     )
///     .with_exit_valuation(dec!(100_000_000));
///
/// assert_eq!(scenario.founder_equity_total(), dec!(90));
/// assert_eq!(scenario.rounds.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    pub founders: Vec<Founder>,
    /// Shares outstanding at t0, split between founders and the pool.
    pub initial_shares: Decimal,
    /// Option pool size at t0, in percent of `initial_shares`.
    pub initial_esop_pool_percent: Decimal,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub exit_valuation: Decimal,
}

impl ScenarioInput {
    pub fn new(initial_shares: Decimal, initial_esop_pool_percent: Decimal) -> Self {
        Self {
            founders: Vec::new(),
            initial_shares,
            initial_esop_pool_percent,
            rounds: Vec::new(),
            exit_valuation: Decimal::ZERO,
        }
    }

    pub fn with_founder(mut self, founder: Founder) -> Self {
        self.founders.push(founder);
        self
    }

    pub fn with_round(mut self, round: Round) -> Self {
        self.rounds.push(round);
        self
    }

    pub fn with_exit_valuation(mut self, exit_valuation: Decimal) -> Self {
        self.exit_valuation = exit_valuation;
        self
    }

    /// Sum of the founders' stated equity percentages (missing counts as 0).
    pub fn founder_equity_total(&self) -> Decimal {
        self.founders
            .iter()
            .map(|f| f.equity_percent.unwrap_or(Decimal::ZERO))
            .sum()
    }

    /// Total new money across every round, priced capital and SAFEs.
    pub fn total_capital_raised(&self) -> Decimal {
        self.rounds.iter().map(|r| r.total_investment()).sum()
    }
}

/// A founder's stake at t0.
///
/// A founder is described either by an equity percentage of
/// `initial_shares` or by an absolute share count. When both are given, a
/// positive `shares` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Founder {
    /// Opaque key owned by the host application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity_percent: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<Decimal>,
}

impl Founder {
    pub fn with_equity(name: impl Into<String>, equity_percent: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            equity_percent: Some(equity_percent),
            shares: None,
        }
    }

    pub fn with_shares(name: impl Into<String>, shares: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            equity_percent: None,
            shares: Some(shares),
        }
    }

    /// Shares this founder starts with out of `initial_shares`.
    pub fn initial_shares(&self, initial_shares: Decimal) -> Decimal {
        match self.shares {
            Some(shares) if shares > Decimal::ZERO => shares,
            _ => {
                self.equity_percent.unwrap_or(Decimal::ZERO) / Decimal::ONE_HUNDRED
                    * initial_shares
            }
        }
    }
}

/// One financing round.
///
/// Sub-steps run in a fixed order: pre-money pool top-up, pricing, SAFE
/// conversion, priced-round issuance, founder secondaries, post-money pool
/// top-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub pre_money_valuation: Decimal,
    pub capital_raised: Decimal,
    #[serde(default)]
    pub safes: Vec<Safe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esop_top_up: Option<EsopTopUp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub founder_secondary: Vec<SecondarySale>,
}

impl Round {
    /// A plain priced round with no SAFEs, top-up or secondaries.
    pub fn priced(name: impl Into<String>, pre_money_valuation: Decimal, capital_raised: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            pre_money_valuation,
            capital_raised,
            safes: Vec::new(),
            esop_top_up: None,
            founder_secondary: Vec::new(),
        }
    }

    pub fn with_safe(mut self, safe: Safe) -> Self {
        self.safes.push(safe);
        self
    }

    pub fn with_esop_top_up(mut self, percentage: Decimal, is_pre_money: bool) -> Self {
        self.esop_top_up = Some(EsopTopUp {
            percentage,
            is_pre_money,
        });
        self
    }

    pub fn with_secondary(mut self, founder_name: impl Into<String>, amount: Decimal) -> Self {
        self.founder_secondary.push(SecondarySale {
            id: None,
            founder_name: founder_name.into(),
            amount,
        });
        self
    }

    /// Sum of all SAFE principal converting in this round.
    pub fn total_safe_investment(&self) -> Decimal {
        self.safes.iter().map(|s| s.amount).sum()
    }

    /// Priced capital plus converting SAFE principal.
    pub fn total_investment(&self) -> Decimal {
        self.capital_raised + self.total_safe_investment()
    }
}

/// A convertible instrument that converts at the round it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Safe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_cap: Option<Decimal>,
    /// Discount to the round price, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
}

impl Safe {
    /// A SAFE with neither cap nor discount.
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            amount,
            valuation_cap: None,
            discount: None,
        }
    }

    pub fn with_valuation_cap(mut self, cap: Decimal) -> Self {
        self.valuation_cap = Some(cap);
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = Some(discount);
        self
    }
}

/// Option pool resize requested as part of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsopTopUp {
    /// Target pool size in percent.
    pub percentage: Decimal,
    /// `true`: sized before the new money and priced into the pre-money.
    /// `false`: sized against the total after the round's issuances.
    pub is_pre_money: bool,
}

/// A founder selling existing shares to the round's priced-round investors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondarySale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub founder_name: String,
    /// Cash paid by the buyer; converted to shares at the round price.
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_founder_percent_seeding() {
        let founder = Founder::with_equity("Alice", dec!(60));
        assert_eq!(founder.initial_shares(dec!(10_000_000)), dec!(6_000_000));
    }

    #[test]
    fn test_founder_absolute_shares_take_precedence() {
        let founder = Founder {
            id: None,
            name: "Alice".into(),
            equity_percent: Some(dec!(50)),
            shares: Some(dec!(1_234)),
        };
        assert_eq!(founder.initial_shares(dec!(10_000)), dec!(1_234));
    }

    #[test]
    fn test_founder_zero_shares_falls_back_to_percent() {
        let founder = Founder {
            id: None,
            name: "Alice".into(),
            equity_percent: Some(dec!(50)),
            shares: Some(Decimal::ZERO),
        };
        assert_eq!(founder.initial_shares(dec!(10_000)), dec!(5_000));
    }

    #[test]
    fn test_round_totals() {
        let round = Round::priced("Seed", dec!(5_000_000), dec!(1_000_000))
            .with_safe(Safe::new("A", dec!(100_000)))
            .with_safe(Safe::new("B", dec!(50_000)).with_discount(dec!(20)));
        assert_eq!(round.total_safe_investment(), dec!(150_000));
        assert_eq!(round.total_investment(), dec!(1_150_000));
    }

    #[test]
    fn test_scenario_deserializes_host_json() {
        let json = r#"{
            "founders": [
                { "id": "1", "name": "Alice", "equityPercent": 60 },
                { "id": "2", "name": "Bob", "equityPercent": "30" }
            ],
            "initialShares": 10000000,
            "initialEsopPoolPercent": 10,
            "rounds": [{
                "id": "r1",
                "name": "Series A",
                "preMoneyValuation": "10000000",
                "capitalRaised": "2000000",
                "safes": [{ "name": "Angel", "amount": "500000", "valuationCap": "5000000" }],
                "esopTopUp": { "percentage": "15", "isPreMoney": true },
                "founderSecondary": [{ "founderName": "Alice", "amount": "100000" }]
            }],
            "exitValuation": "100000000"
        }"#;

        let scenario: ScenarioInput = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.founders.len(), 2);
        assert_eq!(scenario.founder_equity_total(), dec!(90));
        let round = &scenario.rounds[0];
        assert_eq!(round.safes[0].valuation_cap, Some(dec!(5_000_000)));
        assert_eq!(round.safes[0].discount, None);
        assert!(round.esop_top_up.unwrap().is_pre_money);
        assert_eq!(round.founder_secondary[0].founder_name, "Alice");
    }

    #[test]
    fn test_round_optional_lists_default_to_empty() {
        let json = r#"{ "name": "Seed", "preMoneyValuation": "1", "capitalRaised": "0" }"#;
        let round: Round = serde_json::from_str(json).unwrap();
        assert!(round.safes.is_empty());
        assert!(round.founder_secondary.is_empty());
        assert!(round.esop_top_up.is_none());
    }
}
