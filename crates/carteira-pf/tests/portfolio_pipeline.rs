use carteira_pf::workflows::import::{CsvBatch, PortfolioCsvImporter};
use carteira_pf::workflows::portfolio::{
    top_opportunities, ClientFilter, ColumnMap, EnrichedClient, FarolStatus, PortfolioEngine,
    PortfolioTable, SortMode, ENCARTEIRAVEL_REASON,
};
use chrono::{NaiveDate, NaiveDateTime};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 30)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .expect("valid reference instant")
}

fn sample_batch() -> CsvBatch {
    let data = include_bytes!("../carteira_amostra.csv");
    PortfolioCsvImporter::from_reader(&data[..]).expect("sample export imports")
}

fn sample_mapping() -> ColumnMap {
    let data = include_bytes!("../mapeamento_amostra.json");
    ColumnMap::from_json_reader(&data[..]).expect("sample mapping parses")
}

fn classified() -> PortfolioTable {
    let engine = PortfolioEngine::new(1412.0).expect("valid minimum wage");
    sample_batch()
        .classify(&engine, &sample_mapping(), now())
        .expect("sample batch classifies")
}

fn client<'a>(table: &'a PortfolioTable, id: &str) -> &'a EnrichedClient {
    table
        .clients
        .iter()
        .find(|client| client.client.client_id.0 == id)
        .expect("client present")
}

#[test]
fn sample_export_is_classified_per_client() {
    let table = classified();

    let ids: Vec<&str> = table
        .clients
        .iter()
        .map(|client| client.client.client_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["1001", "1002", "1003", "1004", "1005", "1006"]);

    assert_eq!(table.count(FarolStatus::Verde), 2);
    assert_eq!(table.count(FarolStatus::Vermelho), 1);
    assert_eq!(table.count(FarolStatus::Cinza), 3);
}

#[test]
fn product_rows_fold_into_one_client() {
    let table = classified();
    let maria = client(&table, "1001");

    assert_eq!(maria.client.products_count, 2);
    assert_eq!(
        maria.client.products_list,
        vec!["Cartão de Crédito", "Seguro Vida"]
    );
    assert_eq!(
        maria.client.last_movement_date,
        NaiveDate::from_ymd_opt(2025, 6, 20)
    );
    assert_eq!(maria.farol_reasons, vec![ENCARTEIRAVEL_REASON]);
    assert!(maria.credit_eligible);
    assert_eq!(maria.credit_priority_score, 100.0);
}

#[test]
fn vermelho_lists_every_failed_premise_in_order() {
    let table = classified();
    let ana = client(&table, "1003");

    assert_eq!(ana.farol, FarolStatus::Vermelho);
    assert_eq!(
        ana.farol_reasons,
        vec![
            "Não correntista (ex: poupança)",
            "Renda <= 1 salário mínimo",
            "Escore fora de N01-N04",
        ]
    );
    assert!(!ana.credit_eligible);
}

#[test]
fn cinza_reasons_cover_every_blocking_rule() {
    let table = classified();

    assert_eq!(client(&table, "1004").farol_reasons, vec!["Em prejuízo"]);
    assert_eq!(
        client(&table, "1005").farol_reasons,
        vec!["PF > 75a com renda < 10k e aplicações < 50k"]
    );
    assert_eq!(
        client(&table, "1006").farol_reasons,
        vec!["Movimentação > 18m (Perdido)", "Restrição impeditiva"]
    );
    assert!(table
        .clients
        .iter()
        .filter(|client| client.farol == FarolStatus::Cinza)
        .all(|client| client.is_impedido && !client.credit_eligible));
}

#[test]
fn in_loss_client_keeps_a_tenth_of_its_score() {
    let table = classified();
    let pedro = client(&table, "1004");

    let raw: f64 = pedro
        .credit_score_components
        .iter()
        .map(|component| component.points)
        .sum();
    assert!((pedro.credit_priority_score - raw * 0.1).abs() < 1e-9);
}

#[test]
fn summaries_describe_the_whole_table() {
    let table = classified();
    let filter = ClientFilter::default();

    let summary = table.summary(&filter);
    assert_eq!(summary.unique_clients, 6);
    assert_eq!(summary.median_income, Some(3000.0));
    let portfolios: Vec<(&str, usize)> = summary
        .clients_per_portfolio
        .iter()
        .map(|entry| (entry.portfolio.as_str(), entry.clients))
        .collect();
    assert_eq!(
        portfolios,
        vec![("C01", 2), ("C02", 2), ("C03", 1), ("Não informado", 1)]
    );
    assert_eq!(summary.top_vermelho_reasons.len(), 3);
    assert_eq!(summary.employment_links[0].bucket, "CLT");
    assert_eq!(summary.employment_links[0].clients, 3);

    let credit = table.credit_summary(&filter);
    assert_eq!(credit.encarteirados, 2);
    assert_eq!(credit.eligible, 2);
    assert_eq!(credit.eligible_share, 1.0);
    let buckets: Vec<&str> = credit
        .delay_buckets
        .iter()
        .map(|entry| entry.bucket.as_str())
        .collect();
    assert_eq!(buckets, vec!["0", "1-15"]);
}

#[test]
fn opportunities_and_actionable_list_rank_by_priority() {
    let table = classified();

    let top: Vec<&str> = top_opportunities(&table.clients, 5, true)
        .into_iter()
        .map(|client| client.client.client_id.0.as_str())
        .collect();
    assert_eq!(top, vec!["1001", "1002"]);

    let filter = ClientFilter {
        farol: [FarolStatus::Verde, FarolStatus::Vermelho].into_iter().collect(),
        min_income: 2000.0,
        ..ClientFilter::default()
    };
    let listed: Vec<&str> = table
        .actionable_list(&filter, SortMode::Income)
        .into_iter()
        .map(|client| client.client.client_id.0.as_str())
        .collect();
    assert_eq!(listed, vec!["1001", "1002"]);
}

#[test]
fn masked_table_hides_full_names() {
    let table = classified().masked();

    assert_eq!(
        client(&table, "1001").client.client_name.as_deref(),
        Some("Maria S.")
    );
    assert_eq!(
        client(&table, "1006").client.client_name.as_deref(),
        Some("Carlos D.")
    );
}

#[test]
fn identical_inputs_serialize_identically() {
    let first = serde_json::to_string(&classified()).expect("serializes");
    let second = serde_json::to_string(&classified()).expect("serializes");

    assert_eq!(first, second);
    assert!(first.contains("\"farol\":\"Verde\""));
}
