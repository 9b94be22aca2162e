use crate::core::error::{EngineError, EngineWarning};
use crate::core::ledger::{StakeholderLedger, TransferError};
use crate::core::scenario::Round;
use crate::core::stakeholder::{StakeholderCategory, StakeholderName};
use crate::engine::config::EngineConfig;
use crate::engine::pricing::{
    checked_add, checked_div, convert_safe, pool_top_up, post_money_pool_top_up, round_share_price,
    shares_for_amount,
};
use crate::engine::response::{
    EsopTopUpDetail, RoundBreakdown, SafeAuditDetail, SecondarySaleDetail, TopUpTiming,
};
use log::{debug, warn};
use rust_decimal::Decimal;

/// A processed round plus the non-fatal problems met along the way.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub breakdown: RoundBreakdown,
    pub warnings: Vec<EngineWarning>,
}

/// Applies one financing round to the ledger.
pub struct RoundProcessor<'a> {
    config: &'a EngineConfig,
}

impl<'a> RoundProcessor<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Apply `round` to `ledger`.
    ///
    /// # Algorithm
    ///
    /// 1. Snapshot the ledger and remember the total share count.
    /// 2. Pre-money pool top-up, if requested. The resulting total is the
    ///    pre-money share count the round is priced on.
    /// 3. Price: `pre_money_valuation / pre_money_shares`.
    /// 4. Convert SAFEs in listed order, each against the same pre-money count.
    /// 5. Issue `capital_raised / price` shares to `"<round> Investors"`.
    /// 6. Founder secondaries: move `amount / price` shares from the founder
    ///    to the round's investors; a sale the founder cannot cover is skipped
    ///    with a warning.
    /// 7. Post-money pool top-up, if requested: the pool receives
    ///    `total / (1 − p) × p` less what it already holds.
    /// 8. Snapshot again and compute post-money valuation and dilution.
    ///
    /// Every issuance and every sum of amounts is checked, so values too
    /// large for `Decimal` fail the round with [`EngineError::Overflow`].
    /// On error the ledger may be partially updated; the caller discards it.
    pub fn process(
        &self,
        ledger: &mut StakeholderLedger,
        round: &Round,
    ) -> Result<RoundOutcome, EngineError> {
        let name = round.name.as_str();
        let previous_total = ledger.total_shares();
        let ownership_before = ledger.snapshot(previous_total);

        let mut esop_top_up = None;
        if let Some(top_up) = round.esop_top_up.filter(|t| t.is_pre_money) {
            esop_top_up =
                Some(self.top_up_pool(ledger, top_up.percentage, TopUpTiming::PreMoney, name)?);
        }

        let pre_money_shares = ledger.total_shares();
        let price = round_share_price(round.pre_money_valuation, pre_money_shares, name)?;
        debug!(
            "{}: {} pre-money shares priced at {}",
            name, pre_money_shares, price
        );

        let mut total_safe_investment = Decimal::ZERO;
        let mut safe_audit_details = Vec::with_capacity(round.safes.len());
        for safe in &round.safes {
            let conversion = convert_safe(safe, price, pre_money_shares, name)?;
            debug!(
                "{}: SAFE {} converts {} at {} into {} shares",
                name, safe.name, safe.amount, conversion.final_conversion_price, conversion.shares_issued
            );

            ledger
                .upsert(
                    safe.name.as_str(),
                    conversion.shares_issued,
                    StakeholderCategory::Investor,
                )
                .map_err(|_| EngineError::overflow("SAFE conversion shares", name))?;
            total_safe_investment =
                checked_add(total_safe_investment, safe.amount, "SAFE investment", name)?;

            safe_audit_details.push(SafeAuditDetail {
                safe_name: safe.name.clone(),
                amount: safe.amount,
                valuation_cap: safe.valuation_cap,
                discount: safe.discount,
                price_from_cap: conversion.price_from_cap,
                price_from_discount: conversion.price_from_discount,
                final_conversion_price: conversion.final_conversion_price,
                shares_from_safe: conversion.shares_issued,
            });
        }

        let buyer = StakeholderName::investor_group(name, &self.config.priced_round_investor_suffix);
        let priced_round_shares =
            shares_for_amount(round.capital_raised, price, "priced round shares", name)?;
        ledger
            .upsert(buyer.clone(), priced_round_shares, StakeholderCategory::Investor)
            .map_err(|_| EngineError::overflow("priced round shares", name))?;

        let mut warnings = Vec::new();
        let mut secondary_sales = Vec::new();
        for sale in &round.founder_secondary {
            let shares = shares_for_amount(sale.amount, price, "secondary sale shares", name)?;
            match ledger.transfer(
                &sale.founder_name,
                buyer.as_str(),
                shares,
                StakeholderCategory::Investor,
            ) {
                Ok(()) => secondary_sales.push(SecondarySaleDetail {
                    founder_name: sale.founder_name.clone(),
                    buyer: buyer.clone(),
                    amount: sale.amount,
                    shares_transferred: shares,
                }),
                Err(err) => {
                    let warning = skipped_sale_warning(err, name)?;
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        if let Some(top_up) = round.esop_top_up.filter(|t| !t.is_pre_money) {
            esop_top_up =
                Some(self.top_up_pool(ledger, top_up.percentage, TopUpTiming::PostMoney, name)?);
        }

        let total_shares_after = ledger.total_shares();
        let ownership_after = ledger.snapshot(total_shares_after);
        let post_money_valuation = checked_add(
            round.pre_money_valuation,
            round.capital_raised,
            "post-money valuation",
            name,
        )
        .and_then(|raised| checked_add(raised, total_safe_investment, "post-money valuation", name))?;
        let dilution_percent = (Decimal::ONE
            - checked_div(previous_total, total_shares_after, "dilution", name)?)
            * Decimal::ONE_HUNDRED;

        debug!(
            "{}: post-money {}, {} shares outstanding, dilution {}%",
            name,
            post_money_valuation,
            total_shares_after,
            dilution_percent.round_dp(4)
        );

        Ok(RoundOutcome {
            breakdown: RoundBreakdown {
                round_name: round.name.clone(),
                pre_money_valuation: round.pre_money_valuation,
                capital_raised: round.capital_raised,
                post_money_valuation,
                pre_money_shares,
                priced_round_share_price: price,
                priced_round_shares,
                total_shares_after,
                ownership_before,
                ownership_after,
                dilution_percent,
                safe_audit_details,
                esop_top_up,
                secondary_sales,
            },
            warnings,
        })
    }

    fn top_up_pool(
        &self,
        ledger: &mut StakeholderLedger,
        percentage: Decimal,
        timing: TopUpTiming,
        round: &str,
    ) -> Result<EsopTopUpDetail, EngineError> {
        let esop = self.config.esop_name.as_str();
        let esop_shares_before = ledger.get(esop).unwrap_or(Decimal::ZERO);
        let solve: fn(Decimal, Decimal, Decimal, &str) -> Result<Decimal, EngineError> = match timing {
            TopUpTiming::PreMoney => pool_top_up,
            TopUpTiming::PostMoney => post_money_pool_top_up,
        };
        let shares_issued = solve(ledger.total_shares(), esop_shares_before, percentage, round)?;

        if shares_issued > Decimal::ZERO {
            ledger
                .upsert(esop, shares_issued, StakeholderCategory::Esop)
                .map_err(|_| EngineError::overflow("option pool top-up", round))?;
        }
        debug!(
            "{}: {:?} pool top-up to {}% issued {} shares",
            round, timing, percentage, shares_issued
        );

        Ok(EsopTopUpDetail {
            timing,
            target_percent: percentage,
            basis_shares: ledger.total_shares(),
            esop_shares_before,
            shares_issued,
            esop_shares_after: esop_shares_before + shares_issued,
        })
    }
}

/// The warning for a sale that could not go through. An overflow is not a
/// skippable sale and stays fatal.
fn skipped_sale_warning(err: TransferError, round: &str) -> Result<EngineWarning, EngineError> {
    let warning = match err {
        TransferError::InsufficientShares {
            seller,
            requested,
            available,
        } => EngineWarning::InsufficientShares {
            founder: seller,
            round: round.to_string(),
            requested,
            available,
        },
        TransferError::UnknownSeller { seller } => EngineWarning::UnknownSeller {
            founder: seller.to_string(),
            round: round.to_string(),
        },
        TransferError::Overflow(_) => {
            return Err(EngineError::overflow("secondary sale shares", round))
        }
    };
    Ok(warning)
}
