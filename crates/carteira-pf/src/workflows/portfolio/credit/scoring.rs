use serde::{Deserialize, Serialize};

use super::super::domain::ClientRecord;

const EMPLOYMENT_KEYWORDS: [&str; 4] = ["ativo", "clt", "servidor", "aposent"];
const RESTRICTIVE_PENALTY: f64 = 0.3;
const IN_LOSS_PENALTY: f64 = 0.1;
const MAX_SCORE: f64 = 100.0;
const PRODUCT_GAP_BASELINE: f64 = 8.0;

/// Factors contributing to the credit outreach priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Risk,
    Stage,
    Income,
    Employment,
    Recency,
    Delay,
    Potential,
    ProductGap,
}

impl ScoreFactor {
    pub const ALL: [ScoreFactor; 8] = [
        ScoreFactor::Risk,
        ScoreFactor::Stage,
        ScoreFactor::Income,
        ScoreFactor::Employment,
        ScoreFactor::Recency,
        ScoreFactor::Delay,
        ScoreFactor::Potential,
        ScoreFactor::ProductGap,
    ];

    pub fn max_points(&self) -> f64 {
        match self {
            ScoreFactor::Risk => 30.0,
            ScoreFactor::Stage => 15.0,
            ScoreFactor::Income => 20.0,
            ScoreFactor::Employment => 10.0,
            ScoreFactor::Recency => 20.0,
            ScoreFactor::Delay => 15.0,
            ScoreFactor::Potential => 10.0,
            ScoreFactor::ProductGap => 8.0,
        }
    }

    fn points(&self, client: &ClientRecord, minimum_wage: f64) -> f64 {
        match self {
            ScoreFactor::Risk => risk_points(client.score_band.as_deref()),
            ScoreFactor::Stage => stage_points(client.final_stage.as_deref()),
            ScoreFactor::Income => {
                let income = client.income_value.unwrap_or(0.0);
                (income / (minimum_wage * 10.0) * 20.0).clamp(0.0, self.max_points())
            }
            ScoreFactor::Employment => employment_points(client.employment_link.as_deref()),
            ScoreFactor::Recency => client
                .months_since_movement
                .map(|months| (20.0 - months * 3.0).clamp(0.0, self.max_points()))
                .unwrap_or(0.0),
            ScoreFactor::Delay => delay_points(client.max_delay_days),
            ScoreFactor::Potential => {
                let pct = client.potential_pct.unwrap_or(0.0);
                (pct / 100.0 * 10.0).clamp(0.0, self.max_points())
            }
            ScoreFactor::ProductGap => {
                (PRODUCT_GAP_BASELINE - client.products_count as f64).clamp(0.0, self.max_points())
            }
        }
    }
}

/// Points awarded by one factor, kept for audit/explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f64,
    pub max_points: f64,
}

pub(crate) fn score_components(client: &ClientRecord, minimum_wage: f64) -> Vec<ScoreComponent> {
    ScoreFactor::ALL
        .iter()
        .map(|factor| ScoreComponent {
            factor: *factor,
            points: factor.points(client, minimum_wage),
            max_points: factor.max_points(),
        })
        .collect()
}

/// Sums the components, applies the penalty multipliers, then clamps once.
pub(crate) fn priority_score(client: &ClientRecord, components: &[ScoreComponent]) -> f64 {
    let mut total: f64 = components.iter().map(|component| component.points).sum();

    if client.has_restrictive {
        total *= RESTRICTIVE_PENALTY;
    }
    if client.is_in_loss {
        total *= IN_LOSS_PENALTY;
    }

    total.clamp(0.0, MAX_SCORE)
}

/// Band number for scoring; unlike the Verde premise the `N` is optional,
/// so `"03"` and `"N03"` both read as 3.
fn risk_level(score_band: Option<&str>) -> Option<i64> {
    let stripped = score_band?.trim().to_uppercase().replace('N', "");
    stripped.trim().parse::<i64>().ok()
}

fn risk_points(score_band: Option<&str>) -> f64 {
    match risk_level(score_band) {
        Some(1 | 2) => 30.0,
        Some(3 | 4) => 22.0,
        Some(5 | 6) => 12.0,
        Some(7..=9) => 5.0,
        _ => 8.0,
    }
}

fn stage_points(final_stage: Option<&str>) -> f64 {
    match final_stage.map(str::trim) {
        Some("01" | "1") => 15.0,
        Some("02" | "2") => 10.0,
        _ => 3.0,
    }
}

fn employment_points(employment_link: Option<&str>) -> f64 {
    let link = employment_link.unwrap_or_default().to_lowercase();
    if EMPLOYMENT_KEYWORDS
        .iter()
        .any(|keyword| link.contains(keyword))
    {
        10.0
    } else {
        6.0
    }
}

fn delay_points(max_delay_days: Option<f64>) -> f64 {
    match max_delay_days {
        Some(days) if days == 0.0 => 15.0,
        Some(days) if days > 0.0 && days <= 15.0 => 10.0,
        Some(days) if days > 15.0 && days <= 30.0 => 6.0,
        Some(days) if days > 30.0 && days < 60.0 => 2.0,
        _ => 0.0,
    }
}
