use crate::core::error::{EngineError, EngineWarning};
use crate::core::ledger::StakeholderLedger;
use crate::core::scenario::ScenarioInput;
use crate::core::stakeholder::StakeholderCategory;
use crate::engine::config::EngineConfig;
use crate::engine::exit::exit_payouts;
use crate::engine::response::{CalculationResponse, RoundBreakdown, ScenarioSummary};
use crate::engine::round::RoundProcessor;
use crate::engine::validator::validate;
use log::{debug, error, info};
use rust_decimal::Decimal;

/// Successful result of a calculation, before conversion to the host shape.
#[derive(Debug, Clone)]
pub struct CapTableOutcome {
    pub summary: ScenarioSummary,
    pub breakdown: Vec<RoundBreakdown>,
    pub warnings: Vec<EngineWarning>,
}

impl CapTableOutcome {
    pub fn into_response(self) -> CalculationResponse {
        let warnings = if self.warnings.is_empty() {
            None
        } else {
            Some(self.warnings.iter().map(ToString::to_string).collect())
        };
        CalculationResponse {
            summary: self.summary,
            breakdown: self.breakdown,
            error: None,
            warnings,
        }
    }
}

/// The cap table engine.
///
/// Runs the validator once, every round in input order against a fresh
/// ledger, then the exit payout split. The engine keeps no state between
/// calls: it can be shared freely and the same input always yields the same
/// response.
///
/// # Examples
///
/// ```
/// use cap_table_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let scenario = ScenarioInput::new(dec!(10_000_000), dec!(0))
///     .with_founder(Founder::with_equity("Alice", dec!(100)))
///     .with_round(Round::priced("Series A", dec!(10_000_000), dec!(2_000_000)))
///     .with_exit_valuation(dec!(120_000_000));
///
/// let response = CapTableEngine::calculate(&scenario);
/// assert!(response.error.is_none());
/// assert_eq!(response.summary.final_post_money_valuation, dec!(12_000_000));
/// assert_eq!(response.summary.payout_of("Alice").unwrap().amount.round(), dec!(100_000_000));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CapTableEngine {
    config: EngineConfig,
}

impl CapTableEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Calculate with the default configuration.
    pub fn calculate(input: &ScenarioInput) -> CalculationResponse {
        Self::default().run(input)
    }

    /// Calculate with the default configuration, returning a typed result.
    pub fn try_calculate(input: &ScenarioInput) -> Result<CapTableOutcome, EngineError> {
        Self::default().try_run(input)
    }

    /// Calculate and fold any fatal error into the response.
    ///
    /// On error the response carries only the message: the summary is the
    /// empty default and the breakdown is empty.
    pub fn run(&self, input: &ScenarioInput) -> CalculationResponse {
        match self.try_run(input) {
            Ok(outcome) => outcome.into_response(),
            Err(err) => {
                error!("calculation failed: {}", err);
                CalculationResponse::failure(err.to_string())
            }
        }
    }

    pub fn try_run(&self, input: &ScenarioInput) -> Result<CapTableOutcome, EngineError> {
        validate(input, &self.config)?;

        let mut ledger = self.seed_ledger(input)?;
        let processor = RoundProcessor::new(&self.config);
        let mut breakdown = Vec::with_capacity(input.rounds.len());
        let mut warnings = Vec::new();

        for round in &input.rounds {
            let outcome = processor.process(&mut ledger, round)?;
            breakdown.push(outcome.breakdown);
            warnings.extend(outcome.warnings);
        }

        let final_ownership = ledger.snapshot(ledger.total_shares());
        let exit_payouts = exit_payouts(&final_ownership, input.exit_valuation);
        let final_post_money_valuation = breakdown
            .last()
            .map(|b| b.post_money_valuation)
            .unwrap_or(Decimal::ZERO);

        info!(
            "calculated {} rounds, {} stakeholders, {} warnings",
            breakdown.len(),
            final_ownership.len(),
            warnings.len()
        );

        Ok(CapTableOutcome {
            summary: ScenarioSummary {
                final_post_money_valuation,
                final_ownership,
                exit_payouts,
            },
            breakdown,
            warnings,
        })
    }

    /// The t0 ledger: founders in input order, then the option pool.
    ///
    /// Fails when explicit founder share counts add up past what `Decimal`
    /// can hold.
    pub fn seed_ledger(&self, input: &ScenarioInput) -> Result<StakeholderLedger, EngineError> {
        let overflow = |_| EngineError::overflow("initial shares", "t0");
        let mut ledger = StakeholderLedger::new();
        for founder in &input.founders {
            ledger
                .upsert(
                    founder.name.as_str(),
                    founder.initial_shares(input.initial_shares),
                    StakeholderCategory::Founder,
                )
                .map_err(overflow)?;
        }

        if input.initial_esop_pool_percent > Decimal::ZERO {
            let pool = input.initial_esop_pool_percent / Decimal::ONE_HUNDRED * input.initial_shares;
            ledger
                .upsert(self.config.esop_name.as_str(), pool, StakeholderCategory::Esop)
                .map_err(overflow)?;
        }

        debug!(
            "seeded {} holders with {} shares",
            ledger.len(),
            ledger.total_shares()
        );
        Ok(ledger)
    }
}
