//! Random scenario generation for benchmarks and the CLI.
//!
//! Every generated scenario passes validation: founders and the pool sum to
//! exactly 100%, valuations grow round over round, caps are positive and
//! discounts stay under 100%. A fixed seed always yields the same scenario.

use crate::core::scenario::{Founder, Round, Safe, ScenarioInput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

const ROUND_NAMES: [&str; 6] = ["Pre-Seed", "Seed", "Series A", "Series B", "Series C", "Series D"];

/// Knobs for [`generate_scenario`].
#[derive(Debug, Clone)]
pub struct ScenarioGenConfig {
    pub founder_count: usize,
    pub round_count: usize,
    pub initial_shares: Decimal,
    /// Upper bound (whole percent) for the initial option pool.
    pub max_esop_percent: u32,
    /// Maximum SAFEs converting in a single round.
    pub max_safes_per_round: usize,
    /// Chance that a round carries an ESOP top-up.
    pub top_up_probability: f64,
    /// Chance that a round carries a founder secondary sale.
    pub secondary_probability: f64,
    pub seed: u64,
}

impl Default for ScenarioGenConfig {
    fn default() -> Self {
        Self {
            founder_count: 2,
            round_count: 3,
            initial_shares: Decimal::from(10_000_000),
            max_esop_percent: 20,
            max_safes_per_round: 2,
            top_up_probability: 0.5,
            secondary_probability: 0.3,
            seed: 42,
        }
    }
}

/// Generate a valid scenario from `config`.
pub fn generate_scenario(config: &ScenarioGenConfig) -> ScenarioInput {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let esop_percent = Decimal::from(rng.gen_range(0..=config.max_esop_percent.min(50)));
    let mut scenario = ScenarioInput::new(config.initial_shares, esop_percent);

    let founder_count = config.founder_count.max(1);
    for (i, pct) in split_percent(&mut rng, Decimal::ONE_HUNDRED - esop_percent, founder_count)
        .into_iter()
        .enumerate()
    {
        scenario = scenario.with_founder(Founder::with_equity(format!("Founder {}", i + 1), pct));
    }

    let mut pre_money = Decimal::from(rng.gen_range(2_000..=10_000) * 1_000_i64);
    for index in 0..config.round_count {
        let round = generate_round(&mut rng, config, index, pre_money, founder_count);
        let post_money = round.pre_money_valuation + round.capital_raised;
        scenario = scenario.with_round(round);
        pre_money = post_money * Decimal::from(rng.gen_range(2..=4_i64));
    }

    let multiple = Decimal::from(rng.gen_range(1..=10_i64));
    scenario.with_exit_valuation(pre_money * multiple)
}

/// `total` split into `parts` positive two-decimal shares that add up exactly.
fn split_percent(rng: &mut StdRng, total: Decimal, parts: usize) -> Vec<Decimal> {
    let weights: Vec<Decimal> = (0..parts).map(|_| Decimal::from(rng.gen_range(1..=10_i64))).collect();
    let weight_sum: Decimal = weights.iter().sum();

    let mut result: Vec<Decimal> = weights
        .iter()
        .map(|w| (total * w / weight_sum).round_dp(2))
        .collect();

    let assigned: Decimal = result[..parts - 1].iter().sum();
    result[parts - 1] = total - assigned;
    result
}

fn generate_round(
    rng: &mut StdRng,
    config: &ScenarioGenConfig,
    index: usize,
    pre_money: Decimal,
    founder_count: usize,
) -> Round {
    let name = ROUND_NAMES
        .get(index)
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("Round {}", index + 1));

    let raise_percent = Decimal::from(rng.gen_range(10..=30_i64));
    let capital = (pre_money * raise_percent / Decimal::ONE_HUNDRED).round_dp(0);
    let mut round = Round::priced(name, pre_money, capital);

    let safe_count = rng.gen_range(0..=config.max_safes_per_round);
    for s in 0..safe_count {
        let amount = Decimal::from(rng.gen_range(50..=1_000) * 1_000_i64);
        let mut safe = Safe::new(format!("{} SAFE {}", round.name, s + 1), amount);
        match rng.gen_range(0..4) {
            0 => {}
            1 => {
                safe = safe.with_valuation_cap(cap_below(rng, pre_money));
            }
            2 => {
                safe = safe.with_discount(Decimal::from(rng.gen_range(10..=25_i64)));
            }
            _ => {
                safe = safe
                    .with_valuation_cap(cap_below(rng, pre_money))
                    .with_discount(Decimal::from(rng.gen_range(10..=25_i64)));
            }
        }
        round = round.with_safe(safe);
    }

    if rng.gen_bool(config.top_up_probability.clamp(0.0, 1.0)) {
        let pct = Decimal::from(rng.gen_range(5..=15_i64));
        round = round.with_esop_top_up(pct, rng.gen_bool(0.5));
    }

    if rng.gen_bool(config.secondary_probability.clamp(0.0, 1.0)) {
        let seller = rng.gen_range(1..=founder_count);
        let amount = (pre_money * Decimal::from(rng.gen_range(1..=3_i64)) / Decimal::ONE_HUNDRED).round_dp(0);
        round = round.with_secondary(format!("Founder {}", seller), amount);
    }

    round
}

/// A valuation cap between 50% and 100% of the pre-money valuation.
fn cap_below(rng: &mut StdRng, pre_money: Decimal) -> Decimal {
    let pct = Decimal::from(rng.gen_range(50..=100_i64));
    (pre_money * pct / Decimal::ONE_HUNDRED).round_dp(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calculator::CapTableEngine;
    use rust_decimal_macros::dec;

    #[test]
    fn test_generated_scenario_is_valid() {
        for seed in 0..20 {
            let config = ScenarioGenConfig {
                founder_count: 3,
                round_count: 4,
                seed,
                ..Default::default()
            };
            let scenario = generate_scenario(&config);
            assert_eq!(scenario.founders.len(), 3);
            assert_eq!(scenario.rounds.len(), 4);
            assert_eq!(
                scenario.founder_equity_total() + scenario.initial_esop_pool_percent,
                dec!(100)
            );
            let outcome = CapTableEngine::try_calculate(&scenario);
            assert!(outcome.is_ok(), "seed {seed}: {:?}", outcome.err());
        }
    }

    #[test]
    fn test_same_seed_same_scenario() {
        let config = ScenarioGenConfig::default();
        assert_eq!(generate_scenario(&config), generate_scenario(&config));
    }

    #[test]
    fn test_valuations_grow() {
        let scenario = generate_scenario(&ScenarioGenConfig {
            round_count: 5,
            ..Default::default()
        });
        for pair in scenario.rounds.windows(2) {
            assert!(pair[1].pre_money_valuation > pair[0].pre_money_valuation);
        }
    }

    #[test]
    fn test_round_names_run_past_table() {
        let scenario = generate_scenario(&ScenarioGenConfig {
            round_count: 8,
            ..Default::default()
        });
        assert_eq!(scenario.rounds[0].name, "Pre-Seed");
        assert_eq!(scenario.rounds[7].name, "Round 8");
    }

    #[test]
    fn test_split_percent_is_exact() {
        let mut rng = StdRng::seed_from_u64(7);
        let parts = split_percent(&mut rng, dec!(87), 6);
        assert_eq!(parts.iter().sum::<Decimal>(), dec!(87));
        assert!(parts.iter().all(|p| *p > Decimal::ZERO));
    }
}
