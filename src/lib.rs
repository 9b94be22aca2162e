//! # cap-table-engine
//!
//! Deterministic cap table and exit waterfall engine for startups.
//!
//! Given founders, an initial option pool and an ordered list of financing
//! rounds, the engine tracks every stakeholder's share count through priced
//! rounds, SAFE conversions, ESOP top-ups and founder secondary sales, then
//! splits an exit valuation pro rata over the final cap table.
//!
//! ## Architecture
//!
//! - **core**: Foundational types: stakeholders, scenario input, ledger, errors
//! - **engine**: Validation, round processing, SAFE pricing, exit payouts
//! - **analysis**: Ownership history and category breakdowns
//! - **simulation**: Exit valuation sweeps and random scenario generation

pub mod analysis;
pub mod core;
pub mod engine;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::error::{EngineError, EngineWarning, ErrorKind};
    pub use crate::core::ledger::StakeholderLedger;
    pub use crate::core::ownership::StakeholderOwnership;
    pub use crate::core::scenario::{EsopTopUp, Founder, Round, Safe, ScenarioInput, SecondarySale};
    pub use crate::core::stakeholder::{StakeholderCategory, StakeholderName};
    pub use crate::engine::config::EngineConfig;
    pub use crate::engine::response::{
        CalculationResponse, RoundBreakdown, ScenarioSummary, StakeholderPayout,
    };
    pub use crate::engine::{CapTableEngine, CapTableOutcome};
}
