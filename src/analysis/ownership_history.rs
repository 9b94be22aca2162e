use crate::core::ownership::{find, StakeholderOwnership};
use crate::core::stakeholder::{StakeholderCategory, StakeholderName};
use crate::engine::response::CalculationResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One stakeholder's ownership percentage at every point of the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipSeries {
    pub name: StakeholderName,
    pub category: StakeholderCategory,
    /// Aligned with [`OwnershipHistory::labels`]; 0 before the stakeholder exists.
    pub percentages: Vec<Decimal>,
}

/// Ownership over time: t0 followed by the state after each round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipHistory {
    /// `"Initial"` then one label per round.
    pub labels: Vec<String>,
    /// Stakeholders in order of first appearance.
    pub series: Vec<OwnershipSeries>,
}

impl OwnershipHistory {
    /// Build the history from a successful response. A failed response
    /// yields an empty history.
    pub fn from_response(response: &CalculationResponse) -> Self {
        if response.error.is_some() {
            return Self::default();
        }

        let initial = match response.breakdown.first() {
            Some(first) => &first.ownership_before,
            None => &response.summary.final_ownership,
        };

        let mut points: Vec<(&str, &[StakeholderOwnership])> = vec![("Initial", initial.as_slice())];
        for round in &response.breakdown {
            points.push((round.round_name.as_str(), round.ownership_after.as_slice()));
        }

        let mut seen = HashSet::new();
        let mut holders: Vec<(StakeholderName, StakeholderCategory)> = Vec::new();
        for (_, snapshot) in &points {
            for row in snapshot.iter() {
                if seen.insert(row.name.clone()) {
                    holders.push((row.name.clone(), row.category));
                }
            }
        }

        let series = holders
            .into_iter()
            .map(|(name, category)| {
                let percentages = points
                    .iter()
                    .map(|(_, snapshot)| {
                        find(snapshot, name.as_str())
                            .map(|o| o.percentage)
                            .unwrap_or(Decimal::ZERO)
                    })
                    .collect();
                OwnershipSeries {
                    name,
                    category,
                    percentages,
                }
            })
            .collect();

        OwnershipHistory {
            labels: points.iter().map(|(label, _)| label.to_string()).collect(),
            series,
        }
    }

    pub fn series_for(&self, name: &str) -> Option<&OwnershipSeries> {
        self.series.iter().find(|s| s.name.as_str() == name)
    }
}

/// Shares and percentage held by one category of stakeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: StakeholderCategory,
    pub shares: Decimal,
    pub percentage: Decimal,
}

/// Founder, ESOP and Investor totals of a snapshot, always in that order.
pub fn category_totals(ownership: &[StakeholderOwnership]) -> Vec<CategoryTotal> {
    StakeholderCategory::ALL
        .iter()
        .map(|&category| {
            let rows = ownership.iter().filter(|o| o.category == category);
            CategoryTotal {
                category,
                shares: rows.clone().map(|o| o.shares).sum(),
                percentage: rows.map(|o| o.percentage).sum(),
            }
        })
        .collect()
}

impl std::fmt::Display for OwnershipHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Ownership History ===")?;
        write!(f, "{:<24}", "")?;
        for label in &self.labels {
            write!(f, " {:>14}", label)?;
        }
        writeln!(f)?;

        for series in &self.series {
            write!(f, "{:<24}", series.name.as_str())?;
            for pct in &series.percentages {
                write!(f, " {:>13}%", pct.round_dp(2))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
