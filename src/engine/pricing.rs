//! Share pricing, SAFE conversion and option pool sizing.
//!
//! Every division goes through [`checked_div`] and every sum of amounts
//! through [`checked_add`], so a zero divisor or an
//! overflow becomes an [`EngineError`] instead of a panic, and every price is
//! checked to be strictly positive before anything is issued at it.

use crate::core::error::EngineError;
use crate::core::scenario::Safe;
use rust_decimal::Decimal;

/// Outcome of converting one SAFE at a priced round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeConversion {
    /// `valuation_cap / pre_money_shares`, when the SAFE has a cap.
    pub price_from_cap: Option<Decimal>,
    /// `round_price × (1 − discount / 100)`, when the SAFE has a discount.
    pub price_from_discount: Option<Decimal>,
    /// Lowest of the cap price, the discount price and the round price.
    pub final_conversion_price: Decimal,
    pub shares_issued: Decimal,
}

/// `numerator / denominator`, failing on a zero denominator or overflow.
pub fn checked_div(
    numerator: Decimal,
    denominator: Decimal,
    what: &'static str,
    round: &str,
) -> Result<Decimal, EngineError> {
    if denominator.is_zero() {
        return Err(EngineError::DivisionByZero {
            what,
            round: round.to_string(),
        });
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| EngineError::Overflow {
            what,
            round: round.to_string(),
        })
}

fn checked_mul(a: Decimal, b: Decimal, what: &'static str, round: &str) -> Result<Decimal, EngineError> {
    a.checked_mul(b).ok_or_else(|| EngineError::Overflow {
        what,
        round: round.to_string(),
    })
}

fn ensure_positive(value: Decimal, what: &'static str, round: &str) -> Result<Decimal, EngineError> {
    if value <= Decimal::ZERO {
        return Err(EngineError::InvalidPrice {
            what,
            round: round.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Price per share of a priced round: `pre_money_valuation / pre_money_shares`.
pub fn round_share_price(
    pre_money_valuation: Decimal,
    pre_money_shares: Decimal,
    round: &str,
) -> Result<Decimal, EngineError> {
    let price = checked_div(pre_money_valuation, pre_money_shares, "round share price", round)?;
    ensure_positive(price, "round share price", round)
}

/// Shares bought by `amount` of cash at `price`.
pub fn shares_for_amount(
    amount: Decimal,
    price: Decimal,
    what: &'static str,
    round: &str,
) -> Result<Decimal, EngineError> {
    checked_div(amount, price, what, round)
}

/// Convert a SAFE at a round priced at `round_price` per share.
///
/// Each SAFE is priced independently off `pre_money_shares`; the order in
/// which a round's SAFEs convert never changes their price. A term the SAFE
/// does not have takes no part in the minimum, so a SAFE with neither cap
/// nor discount converts at the round price.
///
/// # Examples
///
/// ```
/// use cap_table_engine::core::scenario::Safe;
/// use cap_table_engine::engine::pricing::convert_safe;
/// use rust_decimal_macros::dec;
///
/// // Round at $1.00/share on 10M pre-money shares; a $5M cap prices at $0.50.
/// let safe = Safe::new("Angel", dec!(100_000))
///     .with_valuation_cap(dec!(5_000_000))
///     .with_discount(dec!(20));
/// let conversion = convert_safe(&safe, dec!(1), dec!(10_000_000), "Seed").unwrap();
///
/// assert_eq!(conversion.price_from_discount, Some(dec!(0.8)));
/// assert_eq!(conversion.final_conversion_price, dec!(0.5));
/// assert_eq!(conversion.shares_issued, dec!(200_000));
/// ```
pub fn convert_safe(
    safe: &Safe,
    round_price: Decimal,
    pre_money_shares: Decimal,
    round: &str,
) -> Result<SafeConversion, EngineError> {
    let price_from_cap = safe
        .valuation_cap
        .map(|cap| checked_div(cap, pre_money_shares, "SAFE cap price", round))
        .transpose()?;

    let price_from_discount = safe
        .discount
        .map(|discount| {
            let factor = Decimal::ONE - discount / Decimal::ONE_HUNDRED;
            checked_mul(round_price, factor, "SAFE discount price", round)
        })
        .transpose()?;

    let final_conversion_price = [price_from_cap, price_from_discount]
        .into_iter()
        .flatten()
        .fold(round_price, Decimal::min);
    let final_conversion_price =
        ensure_positive(final_conversion_price, "SAFE conversion price", round)?;

    let shares_issued =
        shares_for_amount(safe.amount, final_conversion_price, "SAFE conversion shares", round)?;

    Ok(SafeConversion {
        price_from_cap,
        price_from_discount,
        final_conversion_price,
        shares_issued,
    })
}

/// Shares to issue to the pool so that it makes up `percentage` of the
/// resulting total.
///
/// Issuing `x` shares changes the denominator too, so the target is solved
/// in closed form from `(pool + x) / (total + x) = p / 100`:
/// the pool must end at `(total − pool) × p / (100 − p)`. Returns zero when
/// the pool is already at or above the target; a pool is never shrunk.
///
/// # Examples
///
/// ```
/// use cap_table_engine::engine::pricing::pool_top_up;
/// use rust_decimal_macros::dec;
///
/// // 9M held by others, 1M in the pool; 25% needs the pool at 3M.
/// let issued = pool_top_up(dec!(10_000_000), dec!(1_000_000), dec!(25), "Seed").unwrap();
/// assert_eq!(issued, dec!(2_000_000));
/// ```
pub fn pool_top_up(
    total_shares: Decimal,
    current_pool: Decimal,
    percentage: Decimal,
    round: &str,
) -> Result<Decimal, EngineError> {
    let other_shares = total_shares - current_pool;
    let scaled = checked_mul(other_shares, percentage, "option pool top-up", round)?;
    let target = checked_div(
        scaled,
        Decimal::ONE_HUNDRED - percentage,
        "option pool top-up",
        round,
    )?;

    let delta = target - current_pool;
    Ok(delta.max(Decimal::ZERO))
}

/// Shares to issue to the pool after a round's issuances.
///
/// The target grosses the current total up by the pool's share:
/// `target = total / (1 − p / 100) × p / 100`, and the pool receives
/// `target − pool`. The shares already in the pool count toward `total` as
/// well, so with an existing pool the result lands above `percentage`.
/// Returns zero when the pool already holds the target.
///
/// # Examples
///
/// ```
/// use cap_table_engine::engine::pricing::post_money_pool_top_up;
/// use rust_decimal_macros::dec;
///
/// // 12M outstanding, 1M in the pool, 15%: target 2,117,647.06.
/// let issued = post_money_pool_top_up(dec!(12_000_000), dec!(1_000_000), dec!(15), "Series A").unwrap();
/// assert_eq!(issued.round_dp(2), dec!(1_117_647.06));
/// ```
pub fn post_money_pool_top_up(
    total_shares: Decimal,
    current_pool: Decimal,
    percentage: Decimal,
    round: &str,
) -> Result<Decimal, EngineError> {
    let fraction = percentage / Decimal::ONE_HUNDRED;
    let grossed_up = checked_div(
        total_shares,
        Decimal::ONE - fraction,
        "option pool top-up",
        round,
    )?;
    let target = checked_mul(grossed_up, fraction, "option pool top-up", round)?;

    let delta = target - current_pool;
    Ok(delta.max(Decimal::ZERO))
}

/// `a + b`, failing on overflow.
pub fn checked_add(a: Decimal, b: Decimal, what: &'static str, round: &str) -> Result<Decimal, EngineError> {
    a.checked_add(b).ok_or_else(|| EngineError::Overflow {
        what,
        round: round.to_string(),
    })
}
