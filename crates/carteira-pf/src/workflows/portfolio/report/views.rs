use super::super::domain::FarolStatus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarolCountEntry {
    pub farol: FarolStatus,
    pub farol_label: &'static str,
    pub clients: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioCountEntry {
    pub portfolio: String,
    pub clients: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonCountEntry {
    pub reason: String,
    pub clients: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketEntry {
    pub bucket: String,
    pub clients: usize,
}

/// Executive view over a (possibly filtered) client table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub unique_clients: usize,
    pub farol_counts: Vec<FarolCountEntry>,
    pub median_income: Option<f64>,
    pub mean_products_per_client: Option<f64>,
    pub clients_per_portfolio: Vec<PortfolioCountEntry>,
    pub top_vermelho_reasons: Vec<ReasonCountEntry>,
    pub verde_per_portfolio: Vec<PortfolioCountEntry>,
    /// Unique clients per employment link, top 12.
    pub employment_links: Vec<BucketEntry>,
}

/// Credit view restricted to encarteirados (Verde).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditSummary {
    pub encarteirados: usize,
    pub eligible: usize,
    pub eligible_share: f64,
    pub mean_priority_score: Option<f64>,
    pub delay_buckets: Vec<BucketEntry>,
    pub score_bands: Vec<BucketEntry>,
}
