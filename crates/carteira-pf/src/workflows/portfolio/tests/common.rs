use chrono::{NaiveDate, NaiveDateTime};

use crate::workflows::portfolio::domain::{ClientId, ClientRecord, EnrichedClient, FarolStatus};
use crate::workflows::portfolio::engine::PortfolioEngine;
use crate::workflows::portfolio::schema::{CanonicalField, ColumnMap, RawRow};

pub(super) const MINIMUM_WAGE: f64 = 1412.0;

pub(super) fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 30)
        .expect("valid date")
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
}

pub(super) fn engine() -> PortfolioEngine {
    PortfolioEngine::new(MINIMUM_WAGE).expect("valid minimum wage")
}

/// Client meeting every Verde premise (Scenario A).
pub(super) fn verde_client(id: &str) -> ClientRecord {
    let mut client = ClientRecord::new(ClientId(id.to_string()));
    client.client_name = Some("Maria da Silva".to_string());
    client.months_since_movement = Some(3.0);
    client.account_type = Some("Conta Corrente".to_string());
    client.months_since_income_update = Some(2.0);
    client.income_value = Some(3000.0);
    client.score_band = Some("N02".to_string());
    client.final_stage = Some("01".to_string());
    client.max_delay_days = Some(0.0);
    client.has_valid_contact = true;
    client.agency_is_main = true;
    client
}

pub(super) fn enriched(client: ClientRecord) -> EnrichedClient {
    engine().enrich(client)
}

pub(super) fn with_farol(id: &str, farol: FarolStatus) -> EnrichedClient {
    let mut client = verde_client(id);
    match farol {
        FarolStatus::Verde => {}
        FarolStatus::Vermelho => client.agency_is_main = false,
        FarolStatus::Cinza => client.is_in_loss = true,
    }
    let enriched = enriched(client);
    assert_eq!(enriched.farol, farol, "fixture farol");
    enriched
}

pub(super) fn column_map() -> ColumnMap {
    ColumnMap::new()
        .with(CanonicalField::ClientId, "CPF")
        .with(CanonicalField::ClientName, "Nome")
        .with(CanonicalField::BirthDate, "Nascimento")
        .with(CanonicalField::LastMovementDate, "Ultimo Movimento")
        .with(CanonicalField::AccountType, "Tipo Conta")
        .with(CanonicalField::IncomeValue, "Renda")
        .with(CanonicalField::IncomeDate, "Data Renda")
        .with(CanonicalField::ScoreBand, "Escore")
        .with(CanonicalField::FinalStage, "Estagio")
        .with(CanonicalField::MaxDelayDays, "Atraso")
        .with(CanonicalField::HasValidContact, "Contato")
        .with(CanonicalField::AgencyIsMain, "Principal")
        .with(CanonicalField::IsInLossFlag, "Prejuizo")
        .with(CanonicalField::HasRestrictiveFlag, "Restricao")
        .with(CanonicalField::AvgBalance, "Saldo")
        .with(CanonicalField::Portfolio, "Carteira")
        .with(CanonicalField::ProductName, "Produto")
}

/// Raw row for a client that classifies Verde at [`now`].
pub(super) fn verde_row(id: &str, product: &str) -> RawRow {
    RawRow::new()
        .with("CPF", id)
        .with("Nome", "Maria da Silva")
        .with("Nascimento", "10/05/1980")
        .with("Ultimo Movimento", "01/05/2025")
        .with("Tipo Conta", "Conta Corrente")
        .with("Renda", "3.000,00")
        .with("Data Renda", "01/03/2025")
        .with("Escore", "N02")
        .with("Estagio", "01")
        .with("Atraso", "0")
        .with("Contato", "S")
        .with("Principal", "S")
        .with("Prejuizo", "N")
        .with("Restricao", "N")
        .with("Saldo", "12000")
        .with("Carteira", "Varejo 01")
        .with("Produto", product)
}
