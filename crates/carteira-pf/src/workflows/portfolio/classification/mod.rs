mod rules;

#[cfg(test)]
pub(crate) use rules::is_checking_account;

use super::domain::{ClientRecord, FarolResult};
use super::engine::{checked_minimum_wage, PortfolioError};

/// Stateless farol classifier.
///
/// Blocking rules are checked first and all of them are reported; only a
/// client with no blocking rule is measured against the nine Verde premises,
/// again collecting every failure rather than stopping at the first.
#[derive(Debug, Clone, Copy)]
pub struct FarolClassifier {
    minimum_wage: f64,
}

impl FarolClassifier {
    pub fn new(minimum_wage: f64) -> Result<Self, PortfolioError> {
        Ok(Self {
            minimum_wage: checked_minimum_wage(minimum_wage)?,
        })
    }

    pub fn classify(&self, client: &ClientRecord) -> FarolResult {
        let blocking = rules::blocking_reasons(client);
        if !blocking.is_empty() {
            return FarolResult::Cinza(blocking);
        }

        let failures = rules::eligibility_failures(client, self.minimum_wage);
        if failures.is_empty() {
            FarolResult::Verde
        } else {
            FarolResult::Vermelho(failures)
        }
    }
}
