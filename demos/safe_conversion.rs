//! How a SAFE's cap and discount set its conversion price.
//!
//! The same 500k SAFE converts in the same round four times: with a cap and
//! a discount, with each alone, and with neither.

use cap_table_engine::prelude::*;
use rust_decimal_macros::dec;

fn main() {
    println!("╔═══════════════════════════════════════════════╗");
    println!("║  cap-table-engine: SAFE Conversion Example    ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    let variants = [
        ("Cap + discount", Some(dec!(6_000_000)), Some(dec!(20))),
        ("Cap only", Some(dec!(6_000_000)), None),
        ("Discount only", None, Some(dec!(20))),
        ("Uncapped, no discount", None, None),
    ];

    for (label, cap, discount) in variants {
        let mut safe = Safe::new("SAFE", dec!(500_000));
        if let Some(cap) = cap {
            safe = safe.with_valuation_cap(cap);
        }
        if let Some(discount) = discount {
            safe = safe.with_discount(discount);
        }

        let scenario = ScenarioInput::new(dec!(10_000_000), dec!(10))
            .with_founder(Founder::with_equity("Founder", dec!(90)))
            .with_round(Round::priced("Seed", dec!(10_000_000), dec!(2_000_000)).with_safe(safe));

        let response = CapTableEngine::calculate(&scenario);
        if let Some(error) = &response.error {
            eprintln!("{}: {}", label, error);
            continue;
        }

        let round = &response.breakdown[0];
        let audit = &round.safe_audit_details[0];
        println!("━━━ {} ━━━\n", label);
        println!("Round price:        {}", round.priced_round_share_price);
        match audit.price_from_cap {
            Some(price) => println!("Price from cap:     {}", price),
            None => println!("Price from cap:     -"),
        }
        match audit.price_from_discount {
            Some(price) => println!("Price from discount: {}", price),
            None => println!("Price from discount: -"),
        }
        println!("Conversion price:   {}", audit.final_conversion_price);
        println!("Shares issued:      {}", audit.shares_from_safe.round_dp(2));
        if let Some(holder) = round.ownership_after_of("SAFE") {
            println!("SAFE ownership:     {}%", holder.percentage.round_dp(2));
        }
        println!();
    }
}
