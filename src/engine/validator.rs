//! Input checks that run once, before any ledger exists.

use crate::core::error::EngineError;
use crate::core::scenario::{Round, ScenarioInput};
use crate::core::stakeholder::StakeholderName;
use crate::engine::config::EngineConfig;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Reject a scenario that cannot be calculated.
///
/// Checks, in order: unique founder names, names that would share a ledger
/// entry with another holder, founders + pool summing to 100% within
/// `config.equity_sum_tolerance`, then the value ranges of every field. The
/// first failure is returned.
pub fn validate(input: &ScenarioInput, config: &EngineConfig) -> Result<(), EngineError> {
    let mut seen = HashSet::new();
    for founder in &input.founders {
        if !seen.insert(founder.name.as_str()) {
            return Err(EngineError::DuplicateFounder {
                name: founder.name.clone(),
            });
        }
    }
    validate_names(input, config, &seen)?;

    let total = input.founder_equity_total() + input.initial_esop_pool_percent;
    if (total - Decimal::ONE_HUNDRED).abs() > config.equity_sum_tolerance {
        return Err(EngineError::EquitySum { total });
    }

    validate_ranges(input)
}

/// The ledger is keyed by name, so a founder named like the pool or like a
/// round's investor group, or a SAFE named like a founder or the pool, would
/// silently merge two holders into one entry.
fn validate_names(
    input: &ScenarioInput,
    config: &EngineConfig,
    founders: &HashSet<&str>,
) -> Result<(), EngineError> {
    let collision = |name: &str, owner: String| EngineError::NameCollision {
        name: name.to_string(),
        owner,
    };

    if founders.contains(config.esop_name.as_str()) {
        return Err(collision(&config.esop_name, "the option pool".to_string()));
    }

    for round in &input.rounds {
        let investors = StakeholderName::investor_group(&round.name, &config.priced_round_investor_suffix);
        if founders.contains(investors.as_str()) {
            return Err(collision(
                investors.as_str(),
                format!("the investors of round '{}'", round.name),
            ));
        }

        for safe in &round.safes {
            if founders.contains(safe.name.as_str()) {
                return Err(collision(&safe.name, "a founder".to_string()));
            }
            if safe.name == config.esop_name {
                return Err(collision(&safe.name, "the option pool".to_string()));
            }
        }
    }
    Ok(())
}

fn validate_ranges(input: &ScenarioInput) -> Result<(), EngineError> {
    if input.initial_shares <= Decimal::ZERO {
        return Err(EngineError::invalid_input("initialShares", "must be positive"));
    }
    check_percent("initialEsopPoolPercent", input.initial_esop_pool_percent)?;
    check_non_negative("exitValuation", input.exit_valuation)?;

    for founder in &input.founders {
        if let Some(pct) = founder.equity_percent {
            check_percent(&format!("founder '{}' equityPercent", founder.name), pct)?;
        }
        if let Some(shares) = founder.shares {
            check_non_negative(&format!("founder '{}' shares", founder.name), shares)?;
        }
    }

    input.rounds.iter().try_for_each(validate_round)
}

fn validate_round(round: &Round) -> Result<(), EngineError> {
    check_non_negative(&format!("round '{}' capitalRaised", round.name), round.capital_raised)?;

    for safe in &round.safes {
        let field = format!("round '{}' SAFE '{}'", round.name, safe.name);
        check_non_negative(&format!("{field} amount"), safe.amount)?;
        if let Some(cap) = safe.valuation_cap {
            if cap <= Decimal::ZERO {
                return Err(EngineError::invalid_input(
                    format!("{field} valuationCap"),
                    format!("must be positive, got {cap}"),
                ));
            }
        }
        if let Some(discount) = safe.discount {
            check_percent(&format!("{field} discount"), discount)?;
        }
    }

    if let Some(top_up) = round.esop_top_up {
        check_percent(&format!("round '{}' esopTopUp percentage", round.name), top_up.percentage)?;
    }

    for sale in &round.founder_secondary {
        check_non_negative(
            &format!("round '{}' secondary sale by '{}' amount", round.name, sale.founder_name),
            sale.amount,
        )?;
    }
    Ok(())
}

fn check_percent(field: &str, value: Decimal) -> Result<(), EngineError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(EngineError::invalid_input(
            field,
            format!("must be between 0 and 100, got {value}"),
        ));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: Decimal) -> Result<(), EngineError> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::scenario::{Founder, Safe};
    use rust_decimal_macros::dec;

    fn basic() -> ScenarioInput {
        ScenarioInput::new(dec!(10_000_000), dec!(10))
            .with_founder(Founder::with_equity("Alice", dec!(60)))
            .with_founder(Founder::with_equity("Bob", dec!(30)))
            .with_exit_valuation(dec!(100_000_000))
    }

    #[test]
    fn test_valid_scenario_passes() {
        assert!(validate(&basic(), &EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_duplicate_founder() {
        let scenario = ScenarioInput::new(dec!(1000), dec!(10))
            .with_founder(Founder::with_equity("Alice", dec!(50)))
            .with_founder(Founder::with_equity("Alice", dec!(40)));
        let err = validate(&scenario, &EngineConfig::default()).unwrap_err();
        assert_eq!(err, EngineError::DuplicateFounder { name: "Alice".into() });
    }

    #[test]
    fn test_duplicate_checked_before_sum() {
        // Sums to 110 as well; the duplicate is reported first.
        let scenario = ScenarioInput::new(dec!(1000), Decimal::ZERO)
            .with_founder(Founder::with_equity("Alice", dec!(70)))
            .with_founder(Founder::with_equity("Alice", dec!(40)));
        let err = validate(&scenario, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateFounder { .. }));
    }

    #[test]
    fn test_equity_sum_over_100() {
        let scenario = ScenarioInput::new(dec!(1000), Decimal::ZERO)
            .with_founder(Founder::with_equity("Alice", dec!(70)))
            .with_founder(Founder::with_equity("Bob", dec!(40)));
        let err = validate(&scenario, &EngineConfig::default()).unwrap_err();
        assert_eq!(err, EngineError::EquitySum { total: dec!(110) });
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_equity_sum_within_tolerance() {
        let scenario = ScenarioInput::new(dec!(1000), dec!(10))
            .with_founder(Founder::with_equity("Alice", dec!(89.995)));
        assert!(validate(&scenario, &EngineConfig::default()).is_ok());

        let scenario = ScenarioInput::new(dec!(1000), dec!(10))
            .with_founder(Founder::with_equity("Alice", dec!(89.98)));
        assert!(validate(&scenario, &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_custom_tolerance() {
        let scenario = ScenarioInput::new(dec!(1000), dec!(10))
            .with_founder(Founder::with_equity("Alice", dec!(89.8)));
        let config = EngineConfig {
            equity_sum_tolerance: dec!(0.5),
            ..Default::default()
        };
        assert!(validate(&scenario, &config).is_ok());
    }

    #[test]
    fn test_non_positive_initial_shares() {
        let mut scenario = basic();
        scenario.initial_shares = Decimal::ZERO;
        let err = validate(&scenario, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref field, .. } if field == "initialShares"));
    }

    #[test]
    fn test_negative_founder_shares() {
        let scenario = ScenarioInput::new(dec!(1000), Decimal::ZERO).with_founder(Founder {
            id: None,
            name: "Alice".into(),
            equity_percent: Some(dec!(100)),
            shares: Some(dec!(-1000)),
        });
        let err = validate(&scenario, &EngineConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_discount_out_of_range() {
        let scenario = basic().with_round(
            crate::core::scenario::Round::priced("Seed", dec!(1_000_000), dec!(100))
                .with_safe(Safe::new("S", dec!(10)).with_discount(dec!(120))),
        );
        let err = validate(&scenario, &EngineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("discount"));
    }

    #[test]
    fn test_zero_valuation_cap_rejected() {
        let scenario = basic().with_round(
            crate::core::scenario::Round::priced("Seed", dec!(1_000_000), dec!(100))
                .with_safe(Safe::new("S", dec!(10)).with_valuation_cap(Decimal::ZERO)),
        );
        let err = validate(&scenario, &EngineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("valuationCap"));
    }

    #[test]
    fn test_founder_named_like_pool_rejected() {
        let scenario = ScenarioInput::new(dec!(1000), dec!(10))
            .with_founder(Founder::with_equity("Alice", dec!(60)))
            .with_founder(Founder::with_equity("ESOP", dec!(30)));
        let err = validate(&scenario, &EngineConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EngineError::NameCollision {
                name: "ESOP".into(),
                owner: "the option pool".into(),
            }
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_founder_named_like_custom_pool_rejected() {
        let config = EngineConfig {
            esop_name: "Option Pool".to_string(),
            ..Default::default()
        };
        let scenario = ScenarioInput::new(dec!(1000), dec!(10))
            .with_founder(Founder::with_equity("Option Pool", dec!(90)));
        assert!(validate(&scenario, &config).is_err());
        // "ESOP" is an ordinary name once the pool is called something else.
        let scenario = ScenarioInput::new(dec!(1000), dec!(10))
            .with_founder(Founder::with_equity("ESOP", dec!(90)));
        assert!(validate(&scenario, &config).is_ok());
    }

    #[test]
    fn test_founder_named_like_round_investors_rejected() {
        let scenario = ScenarioInput::new(dec!(1000), dec!(10))
            .with_founder(Founder::with_equity("Alice", dec!(60)))
            .with_founder(Founder::with_equity("Seed Investors", dec!(30)))
            .with_round(crate::core::scenario::Round::priced("Seed", dec!(1_000_000), dec!(100)));
        let err = validate(&scenario, &EngineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("'Seed Investors'"));
        assert!(err.to_string().contains("round 'Seed'"));
    }

    #[test]
    fn test_safe_named_like_founder_rejected() {
        let scenario = basic().with_round(
            crate::core::scenario::Round::priced("Seed", dec!(1_000_000), dec!(100))
                .with_safe(Safe::new("Bob", dec!(10))),
        );
        let err = validate(&scenario, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::NameCollision { ref name, .. } if name == "Bob"));
    }

    #[test]
    fn test_safe_named_like_pool_rejected() {
        let scenario = basic().with_round(
            crate::core::scenario::Round::priced("Seed", dec!(1_000_000), dec!(100))
                .with_safe(Safe::new("ESOP", dec!(10))),
        );
        assert!(matches!(
            validate(&scenario, &EngineConfig::default()),
            Err(EngineError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_non_positive_pre_money_is_not_a_validation_error() {
        let scenario = basic().with_round(crate::core::scenario::Round::priced(
            "Seed",
            Decimal::ZERO,
            dec!(100),
        ));
        assert!(validate(&scenario, &EngineConfig::default()).is_ok());
    }
}
