//! Foundational types: stakeholders, the share ledger, ownership snapshots,
//! scenario input and the error taxonomy.

pub mod error;
pub mod ledger;
pub mod ownership;
pub mod scenario;
pub mod stakeholder;
