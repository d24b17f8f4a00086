use carteira_pf::config::AppConfig;
use carteira_pf::error::AppError;
use carteira_pf::telemetry::{self, LogTarget};
use carteira_pf::workflows::import::{suggest_mapping, PortfolioCsvImporter};
use carteira_pf::workflows::portfolio::{
    top_opportunities, ClientFilter, ColumnMap, FarolStatus, PortfolioEngine, PortfolioTable,
};
use chrono::{Local, NaiveDateTime};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Portfolio CSV export (one row per client product)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// JSON column mapping (canonical field -> CSV column). Suggested from the header when omitted.
    #[arg(long)]
    pub(crate) mapping: Option<PathBuf>,
    /// Override the configured minimum wage (R$)
    #[arg(long)]
    pub(crate) minimum_wage: Option<f64>,
    /// Reference instant (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_now)]
    pub(crate) now: Option<NaiveDateTime>,
    /// Print the enriched table as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
    /// Number of credit opportunities to list
    #[arg(long, default_value_t = 20)]
    pub(crate) top: usize,
    /// Only list opportunities that pass the credit eligibility gate
    #[arg(long)]
    pub(crate) only_eligible: bool,
    /// Show full client names even when masking is enabled
    #[arg(long)]
    pub(crate) show_names: bool,
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let ClassifyArgs {
        csv,
        mapping,
        minimum_wage,
        now,
        json,
        top,
        only_eligible,
        show_names,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogTarget::Stderr)?;
    let engine = PortfolioEngine::new(minimum_wage.unwrap_or(config.portfolio.minimum_wage))?;

    let batch = PortfolioCsvImporter::from_path(csv)?;
    let columns = match mapping {
        Some(path) => ColumnMap::from_json_reader(std::fs::File::open(path)?)?,
        None => suggest_mapping(&batch.headers),
    };

    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let table = batch.classify(&engine, &columns, now)?;
    let table = if config.portfolio.mask_names && !show_names {
        table.masked()
    } else {
        table
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        println!("{}", render_report(&table, top, only_eligible));
    }

    Ok(())
}

pub(crate) fn render_report(table: &PortfolioTable, top: usize, only_eligible: bool) -> String {
    let filter = ClientFilter::default();
    let summary = table.summary(&filter);
    let credit = table.credit_summary(&filter);
    let mut lines = Vec::new();

    lines.push("Carteira PF".to_string());
    lines.push(format!(
        "Reference {} | minimum wage R$ {:.2}",
        table.now, table.minimum_wage
    ));
    lines.push(format!("- {} unique clients", summary.unique_clients));
    for entry in &summary.farol_counts {
        lines.push(format!("  - {}: {}", entry.farol_label, entry.clients));
    }
    if let Some(median) = summary.median_income {
        lines.push(format!("- Median income R$ {:.2}", median));
    }
    if let Some(mean) = summary.mean_products_per_client {
        lines.push(format!("- {:.2} products per client", mean));
    }

    if !summary.top_vermelho_reasons.is_empty() {
        lines.push(String::new());
        lines.push("Top reasons (Vermelho)".to_string());
        for entry in &summary.top_vermelho_reasons {
            lines.push(format!("  - {}: {}", entry.reason, entry.clients));
        }
    }

    if !summary.employment_links.is_empty() {
        lines.push(String::new());
        lines.push("Employment links".to_string());
        for entry in &summary.employment_links {
            lines.push(format!("  - {}: {}", entry.bucket, entry.clients));
        }
    }

    lines.push(String::new());
    lines.push("Credit".to_string());
    lines.push(format!(
        "- {} encarteirados | {} eligible ({:.0}%)",
        credit.encarteirados,
        credit.eligible,
        credit.eligible_share * 100.0
    ));
    if let Some(mean) = credit.mean_priority_score {
        lines.push(format!("- Mean priority score {:.1}", mean));
    }

    let opportunities = top_opportunities(&table.clients, top, only_eligible);
    lines.push(String::new());
    if opportunities.is_empty() {
        lines.push("No credit opportunities".to_string());
    } else {
        lines.push(format!("Top {} credit opportunities", opportunities.len()));
        for client in opportunities {
            lines.push(format!(
                "  - {} {} | score {:.1} | {}",
                client.client.client_id,
                client.client.client_name.as_deref().unwrap_or("-"),
                client.credit_priority_score,
                if client.credit_eligible {
                    "eligible"
                } else {
                    "not eligible"
                }
            ));
        }
    }

    let impeded = table.count(FarolStatus::Cinza);
    if impeded > 0 {
        lines.push(String::new());
        lines.push(format!("{} clients impeded (Cinza)", impeded));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use carteira_pf::workflows::import::CsvBatch;
    use chrono::NaiveDate;
    use std::io::Cursor;

    const EXPORT: &str = "CPF;Nome;Ultimo Movimento;Tipo Conta;Renda;Data Renda;Escore;Estagio;Atraso;Contato;Principal\n\
        001;Maria da Silva;2025-06-01;Conta Corrente;3.500,00;01/01/2025;N03;01;0;sim;sim\n\
        002;João Souza;2025-06-10;Conta Poupança;900,00;01/01/2025;N06;01;0;sim;sim\n";

    fn classified(export: &str) -> PortfolioTable {
        let batch: CsvBatch = PortfolioCsvImporter::from_reader(Cursor::new(export.to_string()))
            .expect("import");
        let columns = suggest_mapping(&batch.headers);
        let engine = PortfolioEngine::new(1412.0).expect("engine");
        let now = NaiveDate::from_ymd_opt(2025, 6, 30)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("valid timestamp");
        batch.classify(&engine, &columns, now).expect("classify")
    }

    #[test]
    fn report_lists_masked_opportunities() {
        let table = classified(EXPORT).masked();

        let report = render_report(&table, 10, false);

        assert!(report.contains("- 2 unique clients"));
        assert!(report.contains("Top 1 credit opportunities"));
        assert!(report.contains("001 Maria S."));
        assert!(!report.contains("Maria da Silva"));
        assert!(report.contains("Renda <= 1 salário mínimo: 1"));
    }

    #[test]
    fn report_without_verde_clients_says_so() {
        let export = "CPF;Nome;Ultimo Movimento;Tipo Conta;Renda;Data Renda;Escore;Estagio;Atraso;Contato;Principal\n\
            002;João Souza;2025-06-10;Conta Poupança;900,00;01/01/2025;N06;01;0;sim;sim\n";
        let table = classified(export);

        let report = render_report(&table, 10, true);

        assert!(report.contains("No credit opportunities"));
        assert!(report.contains("- 0 encarteirados"));
    }
}
