use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};

use super::aggregation::Aggregator;
use super::classification::FarolClassifier;
use super::credit::CreditAssessor;
use super::domain::{ClientRecord, EnrichedClient, FarolStatus};
use super::schema::{ColumnMap, MappingError, RawRow};

/// Errors raised before any row of a batch is processed.
#[derive(Debug, thiserror::Error)]
pub enum PortfolioError {
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error("minimum wage must be a positive number (got {0})")]
    InvalidMinimumWage(f64),
}

/// Runs aggregation, classification and credit assessment over one batch.
#[derive(Debug, Clone, Copy)]
pub struct PortfolioEngine {
    minimum_wage: f64,
    classifier: FarolClassifier,
    assessor: CreditAssessor,
}

impl PortfolioEngine {
    pub fn new(minimum_wage: f64) -> Result<Self, PortfolioError> {
        Ok(Self {
            minimum_wage: checked_minimum_wage(minimum_wage)?,
            classifier: FarolClassifier::new(minimum_wage)?,
            assessor: CreditAssessor::new(minimum_wage)?,
        })
    }

    pub fn minimum_wage(&self) -> f64 {
        self.minimum_wage
    }

    /// Validates the mapping, then produces the enriched table.
    ///
    /// `now` is never read from the clock here so identical inputs always
    /// yield identical output.
    pub fn run(
        &self,
        rows: &[RawRow],
        columns: &ColumnMap,
        now: NaiveDateTime,
    ) -> Result<PortfolioTable, PortfolioError> {
        columns.validate()?;
        debug!(rows = rows.len(), %now, "aggregating portfolio batch");

        let clients = Aggregator::new(columns, now).aggregate(rows);
        let clients: Vec<EnrichedClient> = clients
            .into_iter()
            .map(|client| self.enrich(client))
            .collect();

        let table = PortfolioTable {
            now,
            minimum_wage: self.minimum_wage,
            clients,
        };

        info!(
            rows = rows.len(),
            clients = table.clients.len(),
            verde = table.count(FarolStatus::Verde),
            vermelho = table.count(FarolStatus::Vermelho),
            cinza = table.count(FarolStatus::Cinza),
            eligible = table.clients.iter().filter(|c| c.credit_eligible).count(),
            "portfolio batch classified"
        );

        Ok(table)
    }

    pub fn enrich(&self, client: ClientRecord) -> EnrichedClient {
        let farol = self.classifier.classify(&client);
        let credit = self.assessor.assess(&client, &farol);
        EnrichedClient::new(client, &farol, credit)
    }
}

/// Income thresholds and the income sub-score divide by the minimum wage.
pub(crate) fn checked_minimum_wage(minimum_wage: f64) -> Result<f64, PortfolioError> {
    if minimum_wage.is_finite() && minimum_wage > 0.0 {
        Ok(minimum_wage)
    } else {
        Err(PortfolioError::InvalidMinimumWage(minimum_wage))
    }
}

/// Enriched per-client table, ordered by client id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioTable {
    pub now: NaiveDateTime,
    pub minimum_wage: f64,
    pub clients: Vec<EnrichedClient>,
}

impl PortfolioTable {
    pub fn count(&self, status: FarolStatus) -> usize {
        self.clients
            .iter()
            .filter(|client| client.farol == status)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
