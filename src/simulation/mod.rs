pub mod exit_sweep;
pub mod scenario_gen;
