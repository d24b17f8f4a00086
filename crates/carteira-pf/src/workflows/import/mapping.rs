use super::normalizer::normalize_key;
use crate::workflows::portfolio::{CanonicalField, ColumnMap};
use std::collections::HashMap;
use std::sync::OnceLock;

static HEADER_ALIAS_MAP: OnceLock<HashMap<String, CanonicalField>> = OnceLock::new();

/// Proposes a mapping from the CSV headers alone.
///
/// Each header is matched, after normalization, against the canonical key
/// and a list of common Portuguese column names. The first header matching a
/// field wins; headers that match nothing stay unmapped.
pub fn suggest_mapping(headers: &[String]) -> ColumnMap {
    let mut columns = ColumnMap::new();
    for header in headers {
        if let Some(field) = field_for_header(header) {
            if !columns.contains(field) {
                columns.insert(field, header);
            }
        }
    }
    columns
}

pub(crate) fn field_for_header(header: &str) -> Option<CanonicalField> {
    header_alias_map().get(&normalize_key(header)).copied()
}

fn header_alias_map() -> &'static HashMap<String, CanonicalField> {
    HEADER_ALIAS_MAP.get_or_init(|| {
        const ALIASES: &[(&str, CanonicalField)] = &[
            // Identification
            ("cpf", CanonicalField::ClientId),
            ("cpf tokenizado", CanonicalField::ClientId),
            ("cpf cnpj", CanonicalField::ClientId),
            ("codigo cliente", CanonicalField::ClientId),
            ("cod cliente", CanonicalField::ClientId),
            ("id cliente", CanonicalField::ClientId),
            ("mci", CanonicalField::ClientId),
            ("nome", CanonicalField::ClientName),
            ("nome cliente", CanonicalField::ClientName),
            ("nome do cliente", CanonicalField::ClientName),
            ("cliente", CanonicalField::ClientName),
            ("nascimento", CanonicalField::BirthDate),
            ("data nascimento", CanonicalField::BirthDate),
            ("data de nascimento", CanonicalField::BirthDate),
            ("dt nascimento", CanonicalField::BirthDate),
            // Income
            ("renda", CanonicalField::IncomeValue),
            ("valor renda", CanonicalField::IncomeValue),
            ("renda bruta", CanonicalField::IncomeValue),
            ("faturamento", CanonicalField::IncomeValue),
            ("data renda", CanonicalField::IncomeDate),
            ("data da renda", CanonicalField::IncomeDate),
            ("dt renda", CanonicalField::IncomeDate),
            ("data atualizacao renda", CanonicalField::IncomeDate),
            ("vinculo", CanonicalField::EmploymentLink),
            ("vinculo empregaticio", CanonicalField::EmploymentLink),
            ("ocupacao", CanonicalField::EmploymentLink),
            // Account
            ("ultimo movimento", CanonicalField::LastMovementDate),
            ("data ultimo movimento", CanonicalField::LastMovementDate),
            ("dt ultimo movimento", CanonicalField::LastMovementDate),
            ("ultima movimentacao", CanonicalField::LastMovementDate),
            ("tipo conta", CanonicalField::AccountType),
            ("tipo de conta", CanonicalField::AccountType),
            ("modalidade conta", CanonicalField::AccountType),
            ("principal", CanonicalField::AgencyIsMain),
            ("conta principal", CanonicalField::AgencyIsMain),
            ("agencia principal", CanonicalField::AgencyIsMain),
            ("contato", CanonicalField::HasValidContact),
            ("contato valido", CanonicalField::HasValidContact),
            ("carteira", CanonicalField::Portfolio),
            ("carteira atual", CanonicalField::Portfolio),
            ("potencialidade", CanonicalField::PotentialPct),
            ("potencial", CanonicalField::PotentialPct),
            ("saldo", CanonicalField::AvgBalance),
            ("saldo medio", CanonicalField::AvgBalance),
            ("aplicacoes", CanonicalField::AvgBalance),
            // Risk
            ("restricao", CanonicalField::HasRestrictiveFlag),
            ("restricao impeditiva", CanonicalField::HasRestrictiveFlag),
            ("prejuizo", CanonicalField::IsInLossFlag),
            ("em prejuizo", CanonicalField::IsInLossFlag),
            ("escore", CanonicalField::ScoreBand),
            ("score", CanonicalField::ScoreBand),
            ("nivel risco", CanonicalField::ScoreBand),
            ("estagio", CanonicalField::FinalStage),
            ("estagio final", CanonicalField::FinalStage),
            ("atraso", CanonicalField::MaxDelayDays),
            ("maior atraso", CanonicalField::MaxDelayDays),
            ("dias atraso", CanonicalField::MaxDelayDays),
            // Products
            ("produto", CanonicalField::ProductName),
            ("nome produto", CanonicalField::ProductName),
            ("grupo produto", CanonicalField::ProductGroup),
            ("data inicio contrato", CanonicalField::ContractStartDate),
            ("inicio contrato", CanonicalField::ContractStartDate),
            ("valor presente", CanonicalField::PresentValue),
            ("valor contrato", CanonicalField::ContractValue),
            ("valor do contrato", CanonicalField::ContractValue),
        ];

        let mut map: HashMap<String, CanonicalField> = ALIASES
            .iter()
            .map(|(alias, field)| (normalize_key(alias), *field))
            .collect();
        for field in CanonicalField::ALL {
            map.insert(normalize_key(field.key()), field);
        }
        map
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn matches_portuguese_aliases_and_canonical_keys() {
        let suggested = suggest_mapping(&headers(&[
            "CPF",
            "Nome do Cliente",
            "Renda",
            "Escore",
            "max_delay_days",
            "Observação",
        ]));

        assert_eq!(suggested.column(CanonicalField::ClientId), Some("CPF"));
        assert_eq!(
            suggested.column(CanonicalField::ClientName),
            Some("Nome do Cliente")
        );
        assert_eq!(suggested.column(CanonicalField::IncomeValue), Some("Renda"));
        assert_eq!(suggested.column(CanonicalField::ScoreBand), Some("Escore"));
        assert_eq!(
            suggested.column(CanonicalField::MaxDelayDays),
            Some("max_delay_days")
        );
        assert_eq!(suggested.iter().count(), 5);
    }

    #[test]
    fn accents_and_case_are_ignored() {
        assert_eq!(
            field_for_header("DATA ÚLTIMO MOVIMENTO"),
            Some(CanonicalField::LastMovementDate)
        );
        assert_eq!(field_for_header("Em Prejuízo"), Some(CanonicalField::IsInLossFlag));
        assert_eq!(field_for_header("Estágio"), Some(CanonicalField::FinalStage));
    }

    #[test]
    fn first_matching_header_wins() {
        let suggested = suggest_mapping(&headers(&["CPF", "Código Cliente"]));

        assert_eq!(suggested.column(CanonicalField::ClientId), Some("CPF"));
    }
}
