use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::super::domain::{EnrichedClient, FarolStatus};

/// Dashboard-style filter over the enriched table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientFilter {
    pub farol: BTreeSet<FarolStatus>,
    /// Empty means every portfolio.
    pub portfolios: BTreeSet<String>,
    /// Unknown income counts as zero.
    pub min_income: f64,
    pub only_main_agency: bool,
}

impl Default for ClientFilter {
    fn default() -> Self {
        Self {
            farol: FarolStatus::ALL.into_iter().collect(),
            portfolios: BTreeSet::new(),
            min_income: 0.0,
            only_main_agency: false,
        }
    }
}

impl ClientFilter {
    pub fn matches(&self, client: &EnrichedClient) -> bool {
        if !self.farol.contains(&client.farol) {
            return false;
        }

        if !self.portfolios.is_empty() {
            let in_portfolio = client
                .client
                .portfolio
                .as_ref()
                .is_some_and(|portfolio| self.portfolios.contains(portfolio));
            if !in_portfolio {
                return false;
            }
        }

        if client.client.income_value.unwrap_or(0.0) < self.min_income {
            return false;
        }

        !self.only_main_agency || client.client.agency_is_main
    }

    pub fn apply<'a>(&self, clients: &'a [EnrichedClient]) -> Vec<&'a EnrichedClient> {
        clients.iter().filter(|client| self.matches(client)).collect()
    }
}

/// Ordering of the actionable list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    CreditPriority,
    Potential,
    Income,
    MovementRecency,
}

impl SortMode {
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::CreditPriority => "Prioridade de crédito",
            SortMode::Potential => "Potencialidade",
            SortMode::Income => "Renda",
            SortMode::MovementRecency => "Recência de movimento",
        }
    }

    /// Descending for priority/potential/income, ascending for recency.
    /// Unknown values sort last; ties fall back to client id.
    pub fn sort(&self, clients: &mut [&EnrichedClient]) {
        clients.sort_by(|a, b| {
            self.compare(a, b)
                .then_with(|| a.client.client_id.cmp(&b.client.client_id))
        });
    }

    fn compare(&self, a: &EnrichedClient, b: &EnrichedClient) -> Ordering {
        match self {
            SortMode::CreditPriority => {
                descending(Some(a.credit_priority_score), Some(b.credit_priority_score))
            }
            SortMode::Potential => descending(a.client.potential_pct, b.client.potential_pct),
            SortMode::Income => descending(a.client.income_value, b.client.income_value),
            SortMode::MovementRecency => ascending(
                a.client.months_since_movement,
                b.client.months_since_movement,
            ),
        }
    }
}

fn ascending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        _ => ascending(a, b),
    }
}

/// Verde clients ranked by credit priority, best first.
pub fn top_opportunities(
    clients: &[EnrichedClient],
    limit: usize,
    only_eligible: bool,
) -> Vec<&EnrichedClient> {
    let mut selected: Vec<&EnrichedClient> = clients
        .iter()
        .filter(|client| client.farol == FarolStatus::Verde)
        .filter(|client| !only_eligible || client.credit_eligible)
        .collect();
    SortMode::CreditPriority.sort(&mut selected);
    selected.truncate(limit);
    selected
}
