mod eligibility;
mod scoring;

pub use scoring::{ScoreComponent, ScoreFactor};

use super::domain::{ClientRecord, CreditAssessment, FarolResult};
use super::engine::{checked_minimum_wage, PortfolioError};

/// Computes the eligibility flag and outreach priority for classified clients.
///
/// The priority score is produced for every client, whatever its farol.
#[derive(Debug, Clone, Copy)]
pub struct CreditAssessor {
    minimum_wage: f64,
}

impl CreditAssessor {
    pub fn new(minimum_wage: f64) -> Result<Self, PortfolioError> {
        Ok(Self {
            minimum_wage: checked_minimum_wage(minimum_wage)?,
        })
    }

    pub fn assess(&self, client: &ClientRecord, farol: &FarolResult) -> CreditAssessment {
        let components = scoring::score_components(client, self.minimum_wage);
        let priority_score = scoring::priority_score(client, &components);

        CreditAssessment {
            eligible: eligibility::is_credit_eligible(client, farol),
            priority_score,
            components,
        }
    }
}
