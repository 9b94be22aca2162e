use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tunables for a [`CapTableEngine`](crate::engine::calculator::CapTableEngine).
///
/// The defaults reproduce the host application's behaviour; override single
/// fields with struct update syntax:
///
/// ```
/// use cap_table_engine::engine::config::EngineConfig;
/// use rust_decimal_macros::dec;
///
/// let config = EngineConfig {
///     equity_sum_tolerance: dec!(0.5),
///     ..Default::default()
/// };
/// assert_eq!(config.esop_name, "ESOP");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Allowed absolute deviation, in percentage points, of founders + pool from 100%.
    pub equity_sum_tolerance: Decimal,
    /// Ledger name of the option pool.
    pub esop_name: String,
    /// Appended to a round's name to name its priced-round investors.
    pub priced_round_investor_suffix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            equity_sum_tolerance: dec!(0.01),
            esop_name: "ESOP".to_string(),
            priced_round_investor_suffix: " Investors".to_string(),
        }
    }
}
