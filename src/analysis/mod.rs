pub mod ownership_history;

pub use ownership_history::{category_totals, CategoryTotal, OwnershipHistory, OwnershipSeries};
