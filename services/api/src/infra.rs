use chrono::{NaiveDate, NaiveDateTime};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) minimum_wage: f64,
    pub(crate) mask_names: bool,
}

/// Accepts `YYYY-MM-DD` (midnight) or `YYYY-MM-DDTHH:MM:SS`.
pub(crate) fn parse_now(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|err| {
            format!("failed to parse '{raw}' as YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS ({err})")
        })
        .and_then(|date| {
            date.and_hms_opt(0, 0, 0)
                .ok_or_else(|| format!("'{raw}' has no valid midnight"))
        })
}

pub(crate) fn deserialize_optional_now<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_now(&value).map_err(serde::de::Error::custom))
        .transpose()
}
