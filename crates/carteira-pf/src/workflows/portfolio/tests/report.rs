use std::collections::BTreeSet;

use super::common::*;
use crate::workflows::portfolio::domain::FarolStatus;
use crate::workflows::portfolio::report::{
    credit_summary, portfolio_summary, top_opportunities, ClientFilter, SortMode,
};

#[test]
fn filter_defaults_keep_everything() {
    let clients = vec![
        with_farol("1", FarolStatus::Verde),
        with_farol("2", FarolStatus::Vermelho),
        with_farol("3", FarolStatus::Cinza),
    ];

    assert_eq!(ClientFilter::default().apply(&clients).len(), 3);
}

#[test]
fn filter_combines_farol_portfolio_income_and_agency() {
    let mut a = with_farol("1", FarolStatus::Verde);
    a.client.portfolio = Some("Varejo 01".to_string());
    let mut b = with_farol("2", FarolStatus::Verde);
    b.client.portfolio = Some("Varejo 02".to_string());
    let mut c = with_farol("3", FarolStatus::Verde);
    c.client.portfolio = Some("Varejo 01".to_string());
    c.client.income_value = None;
    let d = with_farol("4", FarolStatus::Vermelho);
    let clients = vec![a, b, c, d];

    let filter = ClientFilter {
        farol: [FarolStatus::Verde].into_iter().collect(),
        portfolios: ["Varejo 01".to_string()].into_iter().collect(),
        min_income: 1.0,
        only_main_agency: true,
    };

    let ids: Vec<&str> = filter
        .apply(&clients)
        .iter()
        .map(|client| client.client.client_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["1"]);
}

#[test]
fn sort_modes_put_unknown_values_last() {
    let mut a = with_farol("a", FarolStatus::Verde);
    a.client.potential_pct = Some(10.0);
    a.client.months_since_movement = Some(4.0);
    let mut b = with_farol("b", FarolStatus::Verde);
    b.client.potential_pct = None;
    b.client.months_since_movement = None;
    let mut c = with_farol("c", FarolStatus::Verde);
    c.client.potential_pct = Some(80.0);
    c.client.months_since_movement = Some(1.0);
    let clients = vec![a, b, c];

    let mut view: Vec<_> = clients.iter().collect();
    SortMode::Potential.sort(&mut view);
    let ids: Vec<&str> = view.iter().map(|c| c.client.client_id.0.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);

    SortMode::MovementRecency.sort(&mut view);
    let ids: Vec<&str> = view.iter().map(|c| c.client.client_id.0.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn top_opportunities_rank_verde_by_priority() {
    let strong = with_farol("strong", FarolStatus::Verde);
    let mut weaker = verde_client("weaker");
    weaker.score_band = Some("N04".to_string());
    let weaker = enriched(weaker);
    let mut late = verde_client("late");
    late.max_delay_days = Some(10.0);
    let late = enriched(late);
    let cinza = with_farol("cinza", FarolStatus::Cinza);
    let clients = vec![cinza, weaker, strong, late];

    let ranked = top_opportunities(&clients, 2, false);
    let ids: Vec<&str> = ranked.iter().map(|c| c.client.client_id.0.as_str()).collect();
    assert_eq!(ids, vec!["strong", "late"]);

    let eligible = top_opportunities(&clients, 10, true);
    let ids: Vec<&str> = eligible.iter().map(|c| c.client.client_id.0.as_str()).collect();
    assert_eq!(ids, vec!["strong", "late", "weaker"]);
}

#[test]
fn portfolio_summary_counts_farol_and_reasons() {
    let mut red_one = verde_client("r1");
    red_one.agency_is_main = false;
    red_one.has_valid_contact = false;
    let mut red_two = verde_client("r2");
    red_two.agency_is_main = false;
    let clients = vec![
        with_farol("g1", FarolStatus::Verde),
        enriched(red_one),
        enriched(red_two),
        with_farol("c1", FarolStatus::Cinza),
    ];
    let view: Vec<_> = clients.iter().collect();

    let summary = portfolio_summary(&view);

    assert_eq!(summary.unique_clients, 4);
    let counts: Vec<usize> = summary.farol_counts.iter().map(|e| e.clients).collect();
    assert_eq!(counts, vec![1, 2, 1]);
    assert_eq!(summary.median_income, Some(3000.0));
    assert_eq!(summary.mean_products_per_client, Some(0.0));
    assert_eq!(summary.top_vermelho_reasons[0].reason, "Conta principal fora da agência");
    assert_eq!(summary.top_vermelho_reasons[0].clients, 2);
    assert_eq!(summary.top_vermelho_reasons[1].reason, "Sem contato válido");
    assert_eq!(summary.verde_per_portfolio[0].portfolio, "Não informado");
    assert_eq!(summary.verde_per_portfolio[0].clients, 1);
}

#[test]
fn credit_summary_only_considers_verde() {
    let mut late = verde_client("late");
    late.max_delay_days = Some(20.0);
    let mut riskier = verde_client("riskier");
    riskier.score_band = Some("N03".to_string());
    let clients = vec![
        with_farol("g1", FarolStatus::Verde),
        enriched(late),
        enriched(riskier),
        with_farol("c1", FarolStatus::Cinza),
    ];
    let view: Vec<_> = clients.iter().collect();

    let summary = credit_summary(&view);

    assert_eq!(summary.encarteirados, 3);
    assert_eq!(summary.eligible, 3);
    assert_eq!(summary.eligible_share, 1.0);
    let buckets: BTreeSet<(&str, usize)> = summary
        .delay_buckets
        .iter()
        .map(|entry| (entry.bucket.as_str(), entry.clients))
        .collect();
    assert_eq!(buckets, [("0", 2), ("16-30", 1)].into_iter().collect());
    assert_eq!(summary.score_bands[0].bucket, "N02");
    assert_eq!(summary.score_bands[0].clients, 2);
}

#[test]
fn masked_table_hides_full_names() {
    let rows = vec![verde_row("1", "Cartão")];
    let table = engine().run(&rows, &column_map(), now()).expect("runs");

    let masked = table.masked();

    assert_eq!(masked.clients[0].client.client_name.as_deref(), Some("Maria S."));
    assert_eq!(
        table.clients[0].client.client_name.as_deref(),
        Some("Maria da Silva")
    );
}

#[test]
fn portfolio_summary_ranks_employment_links() {
    let mut clients = Vec::new();
    for (index, link) in ["CLT", "CLT", " Servidor ", "", "CLT"].into_iter().enumerate() {
        let mut client = with_farol(&index.to_string(), FarolStatus::Verde);
        client.client.employment_link = Some(link.to_string()).filter(|link| !link.is_empty());
        clients.push(client);
    }
    for index in 0..14 {
        let mut client = with_farol(&format!("x{index:02}"), FarolStatus::Vermelho);
        client.client.employment_link = Some(format!("Vínculo {index:02}"));
        clients.push(client);
    }
    let view: Vec<_> = clients.iter().collect();

    let summary = portfolio_summary(&view);

    let links: Vec<(&str, usize)> = summary
        .employment_links
        .iter()
        .map(|entry| (entry.bucket.as_str(), entry.clients))
        .collect();
    assert_eq!(links.len(), 12);
    assert_eq!(links[0], ("CLT", 3));
    assert_eq!(links[1], ("Não informado", 1));
    assert_eq!(links[2], ("Servidor", 1));
    assert_eq!(links[3], ("Vínculo 00", 1));
}
