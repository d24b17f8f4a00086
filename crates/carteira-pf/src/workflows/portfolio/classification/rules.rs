use super::super::domain::ClientRecord;
use super::super::values::score_band_level;

const LOST_MOVEMENT_MONTHS: f64 = 18.0;
const ACTIVE_MOVEMENT_MONTHS: f64 = 6.0;
const INCOME_FRESHNESS_MONTHS: f64 = 48.0;
const MAX_DELAY_DAYS: f64 = 60.0;
const ELDER_AGE: f64 = 75.0;
const ELDER_INCOME_CEILING: f64 = 10_000.0;
const ELDER_BALANCE_CEILING: f64 = 50_000.0;
const ELIGIBLE_STAGES: [&str; 4] = ["01", "1", "02", "2"];

/// Conditions that impede a client (Cinza), in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockingRule {
    LostMovement,
    InLoss,
    Restrictive,
    ElderLowIncome,
}

impl BlockingRule {
    pub(crate) const ALL: [BlockingRule; 4] = [
        BlockingRule::LostMovement,
        BlockingRule::InLoss,
        BlockingRule::Restrictive,
        BlockingRule::ElderLowIncome,
    ];

    pub(crate) fn message(&self) -> &'static str {
        match self {
            BlockingRule::LostMovement => "Movimentação > 18m (Perdido)",
            BlockingRule::InLoss => "Em prejuízo",
            BlockingRule::Restrictive => "Restrição impeditiva",
            BlockingRule::ElderLowIncome => "PF > 75a com renda < 10k e aplicações < 50k",
        }
    }

    /// Missing operands never make a blocking rule fire.
    pub(crate) fn fires(&self, client: &ClientRecord) -> bool {
        match self {
            BlockingRule::LostMovement => client
                .months_since_movement
                .is_some_and(|months| months > LOST_MOVEMENT_MONTHS),
            BlockingRule::InLoss => client.is_in_loss,
            BlockingRule::Restrictive => client.has_restrictive,
            BlockingRule::ElderLowIncome => matches!(
                (client.age, client.income_value, client.avg_balance),
                (Some(age), Some(income), Some(balance))
                    if age > ELDER_AGE
                        && income < ELDER_INCOME_CEILING
                        && balance < ELDER_BALANCE_CEILING
            ),
        }
    }
}

/// Premises a client must meet to be encarteirável (Verde), in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EligibilityRule {
    RecentMovement,
    CheckingAccount,
    FreshIncome,
    IncomeAboveMinimumWage,
    ScoreBand,
    FinalStage,
    DelayBelowLimit,
    ValidContact,
    MainAgency,
}

impl EligibilityRule {
    pub(crate) const ALL: [EligibilityRule; 9] = [
        EligibilityRule::RecentMovement,
        EligibilityRule::CheckingAccount,
        EligibilityRule::FreshIncome,
        EligibilityRule::IncomeAboveMinimumWage,
        EligibilityRule::ScoreBand,
        EligibilityRule::FinalStage,
        EligibilityRule::DelayBelowLimit,
        EligibilityRule::ValidContact,
        EligibilityRule::MainAgency,
    ];

    /// Failure message, or `None` when the premise holds. Missing operands fail.
    pub(crate) fn failure(&self, client: &ClientRecord, minimum_wage: f64) -> Option<&'static str> {
        match self {
            EligibilityRule::RecentMovement => match client.months_since_movement {
                Some(months) if months <= ACTIVE_MOVEMENT_MONTHS => None,
                Some(months) if months <= LOST_MOVEMENT_MONTHS => {
                    Some("Movimentação 6-18m (Inativo)")
                }
                _ => Some("Sem movimento recente (não ativo)"),
            },
            EligibilityRule::CheckingAccount => {
                let account = client.account_type.as_deref().unwrap_or_default();
                (!is_checking_account(account)).then_some("Não correntista (ex: poupança)")
            }
            EligibilityRule::FreshIncome => (!client
                .months_since_income_update
                .is_some_and(|months| months <= INCOME_FRESHNESS_MONTHS))
            .then_some("Renda desatualizada (> 4 anos)"),
            EligibilityRule::IncomeAboveMinimumWage => (!client
                .income_value
                .is_some_and(|income| income > minimum_wage))
            .then_some("Renda <= 1 salário mínimo"),
            EligibilityRule::ScoreBand => (!score_band_level(client.score_band.as_deref())
                .is_some_and(|level| (1..=4).contains(&level)))
            .then_some("Escore fora de N01-N04"),
            EligibilityRule::FinalStage => {
                let stage = client.final_stage.as_deref().map(str::trim);
                (!stage.is_some_and(|stage| ELIGIBLE_STAGES.contains(&stage)))
                    .then_some("Estágio final fora 01-02")
            }
            EligibilityRule::DelayBelowLimit => (!client
                .max_delay_days
                .is_some_and(|days| days < MAX_DELAY_DAYS))
            .then_some("Atraso >= 60 dias"),
            EligibilityRule::ValidContact => {
                (!client.has_valid_contact).then_some("Sem contato válido")
            }
            EligibilityRule::MainAgency => {
                (!client.agency_is_main).then_some("Conta principal fora da agência")
            }
        }
    }
}

/// Literal checking-account predicate; it reduces to "contains corrente".
pub(crate) fn is_checking_account(account_type: &str) -> bool {
    let account = account_type.to_lowercase();
    let corrente = account.contains("corrente");
    corrente && (!account.contains("poup") || corrente)
}

pub(crate) fn blocking_reasons(client: &ClientRecord) -> Vec<String> {
    BlockingRule::ALL
        .iter()
        .filter(|rule| rule.fires(client))
        .map(|rule| rule.message().to_string())
        .collect()
}

pub(crate) fn eligibility_failures(client: &ClientRecord, minimum_wage: f64) -> Vec<String> {
    EligibilityRule::ALL
        .iter()
        .filter_map(|rule| rule.failure(client, minimum_wage))
        .map(str::to_string)
        .collect()
}
