//! Portfolio eligibility (farol) and credit prioritization for retail clients.
//!
//! Data flows leaf-first: raw rows are folded by the [`Aggregator`], each
//! client is classified by the [`FarolClassifier`], and the
//! [`CreditAssessor`] adds the eligibility flag and priority score. The
//! [`PortfolioEngine`] wires the three together for one in-memory batch.

mod aggregation;
mod classification;
pub mod credit;
pub mod domain;
mod engine;
pub mod report;
pub mod schema;
mod values;

#[cfg(test)]
mod tests;

pub use aggregation::Aggregator;
pub use classification::FarolClassifier;
pub use credit::{CreditAssessor, ScoreComponent, ScoreFactor};
pub use domain::{
    ClientId, ClientRecord, CreditAssessment, EnrichedClient, FarolResult, FarolStatus,
    ProductRecord, ENCARTEIRAVEL_REASON,
};
pub use engine::{PortfolioEngine, PortfolioError, PortfolioTable};
pub use report::{mask_name, top_opportunities, ClientFilter, SortMode};
pub use schema::{CanonicalField, ColumnMap, MappingError, RawRow};
