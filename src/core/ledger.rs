use crate::core::ownership::{ownership_snapshot, StakeholderOwnership};
use crate::core::stakeholder::{StakeholderCategory, StakeholderName};
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

/// A single ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holding {
    pub name: StakeholderName,
    pub category: StakeholderCategory,
    pub shares: Decimal,
}

/// A share count left the range `Decimal` can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("share count overflows")]
pub struct ShareOverflow;

/// Why a share transfer between two holders was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("{seller} is not on the cap table")]
    UnknownSeller { seller: StakeholderName },
    #[error("{seller} holds {available} shares, cannot transfer {requested}")]
    InsufficientShares {
        seller: StakeholderName,
        requested: Decimal,
        available: Decimal,
    },
    #[error(transparent)]
    Overflow(#[from] ShareOverflow),
}

/// Tracks how many shares each stakeholder holds.
///
/// The ledger is a string-keyed registry: entries are created on first use
/// (founders at t0, the option pool, every SAFE holder, every round's
/// investor group) and remember the order in which they were created, so
/// snapshots break share-count ties deterministically.
///
/// A ledger lives for exactly one calculation. It only ever grows or moves
/// shares between holders; it never retires shares. The running total is
/// kept alongside the entries, and every addition to it is checked.
///
/// # Examples
///
/// ```
/// use cap_table_engine::core::ledger::StakeholderLedger;
/// use cap_table_engine::core::stakeholder::StakeholderCategory;
/// use rust_decimal_macros::dec;
///
/// let mut ledger = StakeholderLedger::new();
/// ledger.upsert("Alice", dec!(7_000_000), StakeholderCategory::Founder)?;
/// ledger.upsert("ESOP", dec!(3_000_000), StakeholderCategory::Esop)?;
///
/// let snapshot = ledger.snapshot(ledger.total_shares());
/// assert_eq!(snapshot[0].name.as_str(), "Alice");
/// assert_eq!(snapshot[0].percentage, dec!(70));
/// # Ok::<(), cap_table_engine::core::ledger::ShareOverflow>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StakeholderLedger {
    holdings: Vec<Holding>,
    /// name -> position in `holdings`
    index: HashMap<StakeholderName, usize>,
    total: Decimal,
}

impl StakeholderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` shares to `name`, creating the entry with `category` if
    /// it does not exist yet. An existing entry keeps its category.
    ///
    /// Nothing is mutated when the entry or the total would overflow.
    pub fn upsert(
        &mut self,
        name: impl Into<StakeholderName>,
        delta: Decimal,
        category: StakeholderCategory,
    ) -> Result<(), ShareOverflow> {
        let total = self.total.checked_add(delta).ok_or(ShareOverflow)?;
        self.credit(name.into(), delta, category)?;
        self.total = total;
        Ok(())
    }

    /// Add `delta` to one entry without touching the total.
    fn credit(
        &mut self,
        name: StakeholderName,
        delta: Decimal,
        category: StakeholderCategory,
    ) -> Result<(), ShareOverflow> {
        match self.index.get(&name).copied() {
            Some(i) => {
                let shares = self.holdings[i].shares.checked_add(delta).ok_or(ShareOverflow)?;
                self.holdings[i].shares = shares;
            }
            None => {
                self.index.insert(name.clone(), self.holdings.len());
                self.holdings.push(Holding {
                    name,
                    category,
                    shares: delta,
                });
            }
        }
        Ok(())
    }

    /// Current shares held by `name`, if the entry exists.
    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.holding(name).map(|h| h.shares)
    }

    /// Category of `name`, if the entry exists.
    pub fn category(&self, name: &str) -> Option<StakeholderCategory> {
        self.holding(name).map(|h| h.category)
    }

    fn holding(&self, name: &str) -> Option<&Holding> {
        self.index
            .get(&StakeholderName::new(name))
            .map(|&i| &self.holdings[i])
    }

    /// Move `shares` from `seller` to `buyer` (created as `buyer_category`
    /// if absent). Nothing is mutated when the transfer is refused.
    pub fn transfer(
        &mut self,
        seller: &str,
        buyer: &str,
        shares: Decimal,
        buyer_category: StakeholderCategory,
    ) -> Result<(), TransferError> {
        let seller_name = StakeholderName::new(seller);
        let i = self
            .index
            .get(&seller_name)
            .copied()
            .ok_or_else(|| TransferError::UnknownSeller {
                seller: seller_name.clone(),
            })?;

        let available = self.holdings[i].shares;
        if available < shares {
            return Err(TransferError::InsufficientShares {
                seller: seller_name,
                requested: shares,
                available,
            });
        }

        self.credit(StakeholderName::new(buyer), shares, buyer_category)?;
        self.holdings[i].shares -= shares;
        Ok(())
    }

    /// Sum of every entry's shares.
    pub fn total_shares(&self) -> Decimal {
        self.total
    }

    /// Ownership records at `total_shares`, largest holder first.
    pub fn snapshot(&self, total_shares: Decimal) -> Vec<StakeholderOwnership> {
        ownership_snapshot(&self.holdings, total_shares)
    }

    /// Entries in creation order.
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}
