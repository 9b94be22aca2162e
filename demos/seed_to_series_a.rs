//! Two founders and an option pool through a seed and a Series A.
//!
//! Shows the per-round breakdown, the ownership history and what each
//! stakeholder takes home at a few exit valuations.

use cap_table_engine::analysis::ownership_history::{category_totals, OwnershipHistory};
use cap_table_engine::prelude::*;
use cap_table_engine::simulation::exit_sweep::ExitSweep;
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  cap-table-engine: Seed to Series A Example  ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let scenario = ScenarioInput::new(dec!(10_000_000), dec!(10))
        .with_founder(Founder::with_equity("Alice", dec!(55)))
        .with_founder(Founder::with_equity("Bob", dec!(35)))
        .with_round(
            Round::priced("Seed", dec!(8_000_000), dec!(2_000_000))
                .with_safe(Safe::new("Angel SAFE", dec!(400_000)).with_valuation_cap(dec!(5_000_000))),
        )
        .with_round(
            Round::priced("Series A", dec!(30_000_000), dec!(10_000_000))
                .with_esop_top_up(dec!(15), true)
                .with_secondary("Alice", dec!(500_000)),
        )
        .with_exit_valuation(dec!(150_000_000));

    let response = CapTableEngine::calculate(&scenario);
    print!("{}", response);

    if !response.is_ok() {
        return;
    }

    println!();
    print!("{}", OwnershipHistory::from_response(&response));

    println!("\n━━━ Ownership by Category ━━━\n");
    for total in category_totals(&response.summary.final_ownership) {
        println!("  {:<9} {:>8}%", total.category.as_str(), total.percentage.round_dp(2));
    }

    println!();
    match ExitSweep::from_response(&response, &[dec!(50_000_000), dec!(150_000_000), dec!(500_000_000)]) {
        Ok(sweep) => print!("{}", sweep),
        Err(e) => eprintln!("Error: {}", e),
    }
}
