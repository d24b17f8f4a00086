use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;

/// Canonical field names a raw CSV column can be mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    ClientId,
    ClientName,
    BirthDate,
    IncomeValue,
    IncomeDate,
    EmploymentLink,
    LastMovementDate,
    AccountType,
    HasRestrictiveFlag,
    IsInLossFlag,
    ScoreBand,
    FinalStage,
    MaxDelayDays,
    HasValidContact,
    AgencyIsMain,
    Portfolio,
    PotentialPct,
    AvgBalance,
    ProductName,
    ProductGroup,
    ContractStartDate,
    PresentValue,
    ContractValue,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 23] = [
        CanonicalField::ClientId,
        CanonicalField::ClientName,
        CanonicalField::BirthDate,
        CanonicalField::IncomeValue,
        CanonicalField::IncomeDate,
        CanonicalField::EmploymentLink,
        CanonicalField::LastMovementDate,
        CanonicalField::AccountType,
        CanonicalField::HasRestrictiveFlag,
        CanonicalField::IsInLossFlag,
        CanonicalField::ScoreBand,
        CanonicalField::FinalStage,
        CanonicalField::MaxDelayDays,
        CanonicalField::HasValidContact,
        CanonicalField::AgencyIsMain,
        CanonicalField::Portfolio,
        CanonicalField::PotentialPct,
        CanonicalField::AvgBalance,
        CanonicalField::ProductName,
        CanonicalField::ProductGroup,
        CanonicalField::ContractStartDate,
        CanonicalField::PresentValue,
        CanonicalField::ContractValue,
    ];

    /// Fields that must be mapped before a batch is processed.
    pub const REQUIRED: [CanonicalField; 11] = [
        CanonicalField::ClientId,
        CanonicalField::ClientName,
        CanonicalField::LastMovementDate,
        CanonicalField::AccountType,
        CanonicalField::IncomeValue,
        CanonicalField::IncomeDate,
        CanonicalField::ScoreBand,
        CanonicalField::FinalStage,
        CanonicalField::MaxDelayDays,
        CanonicalField::HasValidContact,
        CanonicalField::AgencyIsMain,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::ClientId => "client_id",
            CanonicalField::ClientName => "client_name",
            CanonicalField::BirthDate => "birth_date",
            CanonicalField::IncomeValue => "income_value",
            CanonicalField::IncomeDate => "income_date",
            CanonicalField::EmploymentLink => "employment_link",
            CanonicalField::LastMovementDate => "last_movement_date",
            CanonicalField::AccountType => "account_type",
            CanonicalField::HasRestrictiveFlag => "has_restrictive_flag",
            CanonicalField::IsInLossFlag => "is_in_loss_flag",
            CanonicalField::ScoreBand => "score_band",
            CanonicalField::FinalStage => "final_stage",
            CanonicalField::MaxDelayDays => "max_delay_days",
            CanonicalField::HasValidContact => "has_valid_contact",
            CanonicalField::AgencyIsMain => "agency_is_main",
            CanonicalField::Portfolio => "portfolio",
            CanonicalField::PotentialPct => "potential_pct",
            CanonicalField::AvgBalance => "avg_balance",
            CanonicalField::ProductName => "product_name",
            CanonicalField::ProductGroup => "product_group",
            CanonicalField::ContractStartDate => "contract_start_date",
            CanonicalField::PresentValue => "present_value",
            CanonicalField::ContractValue => "contract_value",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Operator-facing label shown when asking for a column.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::ClientId => "ID do cliente (código ou CPF tokenizado)",
            CanonicalField::ClientName => "Nome do cliente",
            CanonicalField::BirthDate => "Data de nascimento",
            CanonicalField::IncomeValue => "Renda (valor)",
            CanonicalField::IncomeDate => "Data da renda/faturamento",
            CanonicalField::EmploymentLink => "Vínculo empregatício",
            CanonicalField::LastMovementDate => "Data do último movimento em conta",
            CanonicalField::AccountType => "Tipo de conta (corrente, poupança, etc)",
            CanonicalField::HasRestrictiveFlag => "Restrição impeditiva (bool/flag)",
            CanonicalField::IsInLossFlag => "Em prejuízo (bool/flag)",
            CanonicalField::ScoreBand => "Escore (N01..N09)",
            CanonicalField::FinalStage => "Estágio final (01..03)",
            CanonicalField::MaxDelayDays => "Maior atraso em dias",
            CanonicalField::HasValidContact => "Contato válido (bool/flag)",
            CanonicalField::AgencyIsMain => "Conta principal na agência (bool/flag)",
            CanonicalField::Portfolio => "Carteira atual",
            CanonicalField::PotentialPct => "Potencialidade (%)",
            CanonicalField::AvgBalance => "Saldo médio / aplicações (R$)",
            CanonicalField::ProductName => "Nome do produto",
            CanonicalField::ProductGroup => "Grupo do produto",
            CanonicalField::ContractStartDate => "Data início contrato",
            CanonicalField::PresentValue => "Valor presente",
            CanonicalField::ContractValue => "Valor do contrato",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw CSV row keyed by column header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: &str) {
        self.cells.insert(column.to_string(), value.to_string());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        }
    }
}

/// Resolved mapping from canonical field to raw column name.
///
/// Unmapped fields are simply absent for every row; only [`ColumnMap::validate`]
/// treats them as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    columns: BTreeMap<CanonicalField, String>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: CanonicalField, column: &str) -> Self {
        self.insert(field, column);
        self
    }

    /// Blank column names leave the field unmapped.
    pub fn insert(&mut self, field: CanonicalField, column: &str) {
        let column = column.trim();
        if column.is_empty() {
            self.columns.remove(&field);
        } else {
            self.columns.insert(field, column.to_string());
        }
    }

    pub fn column(&self, field: CanonicalField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.columns.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.columns
            .iter()
            .map(|(field, column)| (*field, column.as_str()))
    }

    /// Builds a map from `canonical key -> column` pairs, rejecting unknown keys.
    pub fn from_keys<I, K, V>(pairs: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = Self::new();
        let mut unknown = Vec::new();

        for (key, column) in pairs {
            match CanonicalField::from_key(key.as_ref()) {
                Some(field) => map.insert(field, column.as_ref()),
                None => unknown.push(key.as_ref().to_string()),
            }
        }

        if unknown.is_empty() {
            Ok(map)
        } else {
            unknown.sort();
            Err(MappingError::UnknownFields(unknown))
        }
    }

    /// Reads a JSON object such as `{"client_id": "CPF", "client_name": "Nome"}`.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, MappingError> {
        let raw: BTreeMap<String, String> = serde_json::from_reader(reader)?;
        Self::from_keys(raw)
    }

    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::REQUIRED
            .into_iter()
            .filter(|field| !self.contains(*field))
            .collect()
    }

    /// Fails with the complete list of unmapped required fields.
    pub fn validate(&self) -> Result<(), MappingError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MappingError::MissingRequired(missing))
        }
    }

    /// Fails when a mapped column does not exist in the uploaded header.
    pub fn validate_against_headers(&self, headers: &[String]) -> Result<(), MappingError> {
        let mut absent: Vec<String> = self
            .columns
            .values()
            .filter(|column| !headers.iter().any(|header| header == *column))
            .cloned()
            .collect();
        absent.sort();
        absent.dedup();

        if absent.is_empty() {
            Ok(())
        } else {
            Err(MappingError::UnknownColumns(absent))
        }
    }
}

/// Column mapping problems, always reported as complete lists.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("map at least these fields to continue: {}", join_fields(.0))]
    MissingRequired(Vec<CanonicalField>),
    #[error("unknown canonical fields in mapping: {}", .0.join(", "))]
    UnknownFields(Vec<String>),
    #[error("mapped columns not found in the uploaded file: {}", .0.join(", "))]
    UnknownColumns(Vec<String>),
    #[error("column mapping is not a valid JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(CanonicalField::key)
        .collect::<Vec<_>>()
        .join(", ")
}
