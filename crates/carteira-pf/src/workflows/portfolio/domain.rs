use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::credit::ScoreComponent;

/// Reason attached to every Verde client.
pub const ENCARTEIRAVEL_REASON: &str = "Encarteirável (cumpre premissas)";

/// Identifier wrapper for a bank client (account code or tokenized CPF).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One product/contract row after its cells were parsed.
///
/// Dates and numbers that were absent or unparseable are `None`. Flags are
/// plain booleans: an absent or unrecognised flag cell reads as `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub client_id: ClientId,
    pub client_name: Option<String>,
    pub birth_date: Option<NaiveDateTime>,
    pub income_value: Option<f64>,
    pub income_date: Option<NaiveDateTime>,
    pub employment_link: Option<String>,
    pub last_movement_date: Option<NaiveDateTime>,
    pub account_type: Option<String>,
    pub has_restrictive: bool,
    pub is_in_loss: bool,
    pub score_band: Option<String>,
    pub final_stage: Option<String>,
    pub max_delay_days: Option<f64>,
    pub has_valid_contact: bool,
    pub agency_is_main: bool,
    pub portfolio: Option<String>,
    pub potential_pct: Option<f64>,
    pub avg_balance: Option<f64>,
    pub product_name: Option<String>,
}

/// Canonical one-row-per-client view produced by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub client_id: ClientId,
    pub client_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<f64>,
    pub income_value: Option<f64>,
    pub income_date: Option<NaiveDate>,
    pub employment_link: Option<String>,
    pub last_movement_date: Option<NaiveDate>,
    pub months_since_movement: Option<f64>,
    pub months_since_income_update: Option<f64>,
    pub account_type: Option<String>,
    pub has_restrictive: bool,
    pub is_in_loss: bool,
    pub score_band: Option<String>,
    pub final_stage: Option<String>,
    pub max_delay_days: Option<f64>,
    pub has_valid_contact: bool,
    pub agency_is_main: bool,
    pub portfolio: Option<String>,
    pub potential_pct: Option<f64>,
    pub avg_balance: Option<f64>,
    pub products_count: usize,
    pub products_list: Vec<String>,
}

impl ClientRecord {
    /// Blank record carrying only an id; every optional attribute is unknown.
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            client_name: None,
            birth_date: None,
            age: None,
            income_value: None,
            income_date: None,
            employment_link: None,
            last_movement_date: None,
            months_since_movement: None,
            months_since_income_update: None,
            account_type: None,
            has_restrictive: false,
            is_in_loss: false,
            score_band: None,
            final_stage: None,
            max_delay_days: None,
            has_valid_contact: false,
            agency_is_main: false,
            portfolio: None,
            potential_pct: None,
            avg_balance: None,
            products_count: 0,
            products_list: Vec::new(),
        }
    }
}

/// Three-valued portfolio eligibility ("farol").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FarolStatus {
    Verde,
    Vermelho,
    Cinza,
}

impl FarolStatus {
    pub const ALL: [FarolStatus; 3] = [FarolStatus::Verde, FarolStatus::Vermelho, FarolStatus::Cinza];

    pub fn label(&self) -> &'static str {
        match self {
            FarolStatus::Verde => "Verde",
            FarolStatus::Vermelho => "Vermelho",
            FarolStatus::Cinza => "Cinza",
        }
    }
}

impl fmt::Display for FarolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification outcome. Vermelho and Cinza always carry at least one reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarolResult {
    Verde,
    Vermelho(Vec<String>),
    Cinza(Vec<String>),
}

impl FarolResult {
    pub fn status(&self) -> FarolStatus {
        match self {
            FarolResult::Verde => FarolStatus::Verde,
            FarolResult::Vermelho(_) => FarolStatus::Vermelho,
            FarolResult::Cinza(_) => FarolStatus::Cinza,
        }
    }

    pub fn reasons(&self) -> Vec<&str> {
        match self {
            FarolResult::Verde => vec![ENCARTEIRAVEL_REASON],
            FarolResult::Vermelho(reasons) | FarolResult::Cinza(reasons) => {
                reasons.iter().map(String::as_str).collect()
            }
        }
    }

    pub fn is_encarteiravel(&self) -> bool {
        matches!(self, FarolResult::Verde)
    }

    pub fn is_impedido(&self) -> bool {
        matches!(self, FarolResult::Cinza(_))
    }
}

/// Credit outreach annotation for a classified client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditAssessment {
    pub eligible: bool,
    pub priority_score: f64,
    pub components: Vec<ScoreComponent>,
}

/// Row of the enriched table handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedClient {
    #[serde(flatten)]
    pub client: ClientRecord,
    pub farol: FarolStatus,
    pub farol_reasons: Vec<String>,
    pub is_encarteiravel: bool,
    pub is_impedido: bool,
    pub credit_eligible: bool,
    pub credit_priority_score: f64,
    pub credit_score_components: Vec<ScoreComponent>,
}

impl EnrichedClient {
    pub fn new(client: ClientRecord, farol: &FarolResult, credit: CreditAssessment) -> Self {
        Self {
            farol: farol.status(),
            farol_reasons: farol.reasons().into_iter().map(str::to_string).collect(),
            is_encarteiravel: farol.is_encarteiravel(),
            is_impedido: farol.is_impedido(),
            credit_eligible: credit.eligible,
            credit_priority_score: credit.priority_score,
            credit_score_components: credit.components,
            client,
        }
    }
}
