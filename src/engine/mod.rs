//! The calculation engine: validation, round processing, SAFE pricing,
//! option pool sizing, exit payouts and the orchestrating [`CapTableEngine`].

pub mod calculator;
pub mod config;
pub mod exit;
pub mod pricing;
pub mod response;
pub mod round;
pub mod validator;

pub use calculator::{CapTableEngine, CapTableOutcome};
