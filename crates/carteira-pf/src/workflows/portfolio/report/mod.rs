mod filters;
mod privacy;
mod summary;
pub mod views;

pub use filters::{top_opportunities, ClientFilter, SortMode};
pub use privacy::mask_name;
pub use summary::{credit_summary, portfolio_summary};

use super::domain::EnrichedClient;
use super::engine::PortfolioTable;
use views::{CreditSummary, PortfolioSummary};

impl PortfolioTable {
    /// Filtered, sorted view of the table for the actionable list.
    pub fn actionable_list(&self, filter: &ClientFilter, sort: SortMode) -> Vec<&EnrichedClient> {
        let mut selected = filter.apply(&self.clients);
        sort.sort(&mut selected);
        selected
    }

    pub fn summary(&self, filter: &ClientFilter) -> PortfolioSummary {
        portfolio_summary(&filter.apply(&self.clients))
    }

    pub fn credit_summary(&self, filter: &ClientFilter) -> CreditSummary {
        credit_summary(&filter.apply(&self.clients))
    }

    /// Copy of the table with client names masked for presentation.
    pub fn masked(&self) -> PortfolioTable {
        let mut table = self.clone();
        for client in &mut table.clients {
            client.client.client_name = client
                .client
                .client_name
                .as_deref()
                .map(mask_name);
        }
        table
    }
}
