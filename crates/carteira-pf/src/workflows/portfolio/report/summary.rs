use std::collections::{BTreeMap, BTreeSet};

use super::super::domain::{EnrichedClient, FarolStatus};
use super::views::{
    BucketEntry, CreditSummary, FarolCountEntry, PortfolioCountEntry, PortfolioSummary,
    ReasonCountEntry,
};

const TOP_REASONS: usize = 12;
const TOP_EMPLOYMENT_LINKS: usize = 12;
const UNINFORMED: &str = "Não informado";

pub fn portfolio_summary(clients: &[&EnrichedClient]) -> PortfolioSummary {
    let unique_clients = clients
        .iter()
        .map(|client| &client.client.client_id)
        .collect::<BTreeSet<_>>()
        .len();

    let farol_counts = FarolStatus::ALL
        .into_iter()
        .map(|farol| FarolCountEntry {
            farol,
            farol_label: farol.label(),
            clients: clients.iter().filter(|client| client.farol == farol).count(),
        })
        .collect();

    let incomes: Vec<f64> = clients
        .iter()
        .filter_map(|client| client.client.income_value)
        .collect();

    let mean_products_per_client = if clients.is_empty() {
        None
    } else {
        let total: usize = clients.iter().map(|client| client.client.products_count).sum();
        Some(total as f64 / clients.len() as f64)
    };

    let verde: Vec<&EnrichedClient> = clients
        .iter()
        .copied()
        .filter(|client| client.farol == FarolStatus::Verde)
        .collect();

    PortfolioSummary {
        unique_clients,
        farol_counts,
        median_income: median(incomes),
        mean_products_per_client,
        clients_per_portfolio: per_portfolio(clients),
        top_vermelho_reasons: top_vermelho_reasons(clients),
        verde_per_portfolio: per_portfolio(&verde),
        employment_links: employment_links(clients),
    }
}

pub fn credit_summary(clients: &[&EnrichedClient]) -> CreditSummary {
    let verde: Vec<&EnrichedClient> = clients
        .iter()
        .copied()
        .filter(|client| client.farol == FarolStatus::Verde)
        .collect();

    let encarteirados = verde.len();
    let eligible = verde.iter().filter(|client| client.credit_eligible).count();
    let (eligible_share, mean_priority_score) = if encarteirados == 0 {
        (0.0, None)
    } else {
        let total: f64 = verde.iter().map(|client| client.credit_priority_score).sum();
        (
            eligible as f64 / encarteirados as f64,
            Some(total / encarteirados as f64),
        )
    };

    let mut delay_counts: BTreeMap<usize, usize> = BTreeMap::new();
    for client in &verde {
        let bucket = delay_bucket(client.client.max_delay_days.unwrap_or(0.0));
        *delay_counts.entry(bucket).or_default() += 1;
    }
    let delay_buckets = delay_counts
        .into_iter()
        .map(|(index, clients)| BucketEntry {
            bucket: DELAY_BUCKET_LABELS[index].to_string(),
            clients,
        })
        .collect();

    let mut band_counts: BTreeMap<String, usize> = BTreeMap::new();
    for client in &verde {
        let band = client
            .client
            .score_band
            .as_deref()
            .map(|band| band.trim().to_uppercase())
            .filter(|band| !band.is_empty())
            .unwrap_or_else(|| UNINFORMED.to_string());
        *band_counts.entry(band).or_default() += 1;
    }
    let mut score_bands: Vec<BucketEntry> = band_counts
        .into_iter()
        .map(|(bucket, clients)| BucketEntry { bucket, clients })
        .collect();
    score_bands.sort_by(|a, b| b.clients.cmp(&a.clients).then_with(|| a.bucket.cmp(&b.bucket)));

    CreditSummary {
        encarteirados,
        eligible,
        eligible_share,
        mean_priority_score,
        delay_buckets,
        score_bands,
    }
}

const DELAY_BUCKET_LABELS: [&str; 5] = ["0", "1-15", "16-30", "31-59", "60+"];

fn delay_bucket(days: f64) -> usize {
    if days <= 0.0 {
        0
    } else if days <= 15.0 {
        1
    } else if days <= 30.0 {
        2
    } else if days <= 59.0 {
        3
    } else {
        4
    }
}

fn per_portfolio(clients: &[&EnrichedClient]) -> Vec<PortfolioCountEntry> {
    let mut members: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for client in clients {
        let portfolio = client
            .client
            .portfolio
            .clone()
            .unwrap_or_else(|| UNINFORMED.to_string());
        members
            .entry(portfolio)
            .or_default()
            .insert(client.client.client_id.0.as_str());
    }

    let mut entries: Vec<PortfolioCountEntry> = members
        .into_iter()
        .map(|(portfolio, ids)| PortfolioCountEntry {
            portfolio,
            clients: ids.len(),
        })
        .collect();
    entries.sort_by(|a, b| {
        b.clients
            .cmp(&a.clients)
            .then_with(|| a.portfolio.cmp(&b.portfolio))
    });
    entries
}

fn employment_links(clients: &[&EnrichedClient]) -> Vec<BucketEntry> {
    let mut members: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for client in clients {
        let link = client
            .client
            .employment_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
            .unwrap_or(UNINFORMED);
        members
            .entry(link.to_string())
            .or_default()
            .insert(client.client.client_id.0.as_str());
    }

    let mut entries: Vec<BucketEntry> = members
        .into_iter()
        .map(|(bucket, ids)| BucketEntry {
            bucket,
            clients: ids.len(),
        })
        .collect();
    entries.sort_by(|a, b| b.clients.cmp(&a.clients).then_with(|| a.bucket.cmp(&b.bucket)));
    entries.truncate(TOP_EMPLOYMENT_LINKS);
    entries
}

fn top_vermelho_reasons(clients: &[&EnrichedClient]) -> Vec<ReasonCountEntry> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for client in clients
        .iter()
        .filter(|client| client.farol == FarolStatus::Vermelho)
    {
        for reason in &client.farol_reasons {
            *counts.entry(reason.as_str()).or_default() += 1;
        }
    }

    let mut entries: Vec<ReasonCountEntry> = counts
        .into_iter()
        .map(|(reason, clients)| ReasonCountEntry {
            reason: reason.to_string(),
            clients,
        })
        .collect();
    entries.sort_by(|a, b| b.clients.cmp(&a.clients).then_with(|| a.reason.cmp(&b.reason)));
    entries.truncate(TOP_REASONS);
    entries
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
