use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::domain::{ClientId, ClientRecord, ProductRecord};
use super::schema::{CanonicalField, ColumnMap, RawRow};
use super::values::{
    months_since, parse_datetime, parse_flag, parse_number, parse_text, years_since,
};

/// Folds product-level rows into one [`ClientRecord`] per client id.
///
/// `now` is the reference instant for every "months since" and age figure.
pub struct Aggregator<'a> {
    columns: &'a ColumnMap,
    now: NaiveDateTime,
}

impl<'a> Aggregator<'a> {
    pub fn new(columns: &'a ColumnMap, now: NaiveDateTime) -> Self {
        Self { columns, now }
    }

    /// Parses one raw row. Rows without a client id yield `None`.
    pub fn product_record(&self, row: &RawRow) -> Option<ProductRecord> {
        let cell = |field: CanonicalField| self.columns.column(field).and_then(|col| row.get(col));
        let date = |field| cell(field).and_then(parse_datetime);
        let number = |field| cell(field).and_then(parse_number);
        let text = |field| parse_text(cell(field));

        let client_id = text(CanonicalField::ClientId)?;

        Some(ProductRecord {
            client_id: ClientId(client_id),
            client_name: text(CanonicalField::ClientName),
            birth_date: date(CanonicalField::BirthDate),
            income_value: number(CanonicalField::IncomeValue),
            income_date: date(CanonicalField::IncomeDate),
            employment_link: text(CanonicalField::EmploymentLink),
            last_movement_date: date(CanonicalField::LastMovementDate),
            account_type: text(CanonicalField::AccountType),
            has_restrictive: parse_flag(cell(CanonicalField::HasRestrictiveFlag)),
            is_in_loss: parse_flag(cell(CanonicalField::IsInLossFlag)),
            score_band: text(CanonicalField::ScoreBand),
            final_stage: text(CanonicalField::FinalStage),
            max_delay_days: number(CanonicalField::MaxDelayDays),
            has_valid_contact: parse_flag(cell(CanonicalField::HasValidContact)),
            agency_is_main: parse_flag(cell(CanonicalField::AgencyIsMain)),
            portfolio: text(CanonicalField::Portfolio),
            potential_pct: number(CanonicalField::PotentialPct),
            avg_balance: number(CanonicalField::AvgBalance),
            product_name: text(CanonicalField::ProductName),
        })
    }

    /// Aggregates a whole batch. The result is ordered by client id.
    pub fn aggregate(&self, rows: &[RawRow]) -> Vec<ClientRecord> {
        let mut clients: BTreeMap<ClientId, ClientAccumulator> = BTreeMap::new();
        let mut skipped = 0usize;

        for row in rows {
            let Some(record) = self.product_record(row) else {
                skipped += 1;
                continue;
            };

            clients
                .entry(record.client_id.clone())
                .or_insert_with(|| ClientAccumulator::new(record.client_id.clone()))
                .fold(record, self.now);
        }

        if skipped > 0 {
            debug!(skipped, "rows without client id ignored");
        }

        clients
            .into_values()
            .map(ClientAccumulator::finish)
            .collect()
    }
}

struct ClientAccumulator {
    record: ClientRecord,
    products: BTreeSet<String>,
}

impl ClientAccumulator {
    fn new(client_id: ClientId) -> Self {
        Self {
            record: ClientRecord::new(client_id),
            products: BTreeSet::new(),
        }
    }

    fn fold(&mut self, row: ProductRecord, now: NaiveDateTime) {
        let client = &mut self.record;

        keep_first(&mut client.client_name, row.client_name);
        keep_first(
            &mut client.birth_date,
            row.birth_date.map(|date| date.date()),
        );
        keep_first(
            &mut client.age,
            row.birth_date.map(|date| years_since(date, now)),
        );
        keep_first(&mut client.income_value, row.income_value);
        keep_first(
            &mut client.income_date,
            row.income_date.map(|date| date.date()),
        );
        keep_first(&mut client.employment_link, row.employment_link);
        keep_first(&mut client.account_type, row.account_type);
        keep_first(&mut client.score_band, row.score_band);
        keep_first(&mut client.final_stage, row.final_stage);
        keep_first(&mut client.portfolio, row.portfolio);
        keep_first(&mut client.potential_pct, row.potential_pct);
        keep_first(&mut client.avg_balance, row.avg_balance);

        keep_max(
            &mut client.last_movement_date,
            row.last_movement_date.map(|date| date.date()),
        );
        keep_min(
            &mut client.months_since_movement,
            row.last_movement_date.map(|date| months_since(date, now)),
        );
        keep_min(
            &mut client.months_since_income_update,
            row.income_date.map(|date| months_since(date, now)),
        );
        keep_max(&mut client.max_delay_days, row.max_delay_days);

        client.has_restrictive |= row.has_restrictive;
        client.is_in_loss |= row.is_in_loss;
        client.has_valid_contact |= row.has_valid_contact;
        client.agency_is_main |= row.agency_is_main;

        if let Some(product) = row.product_name {
            self.products.insert(product);
        }
    }

    fn finish(self) -> ClientRecord {
        let mut record = self.record;
        record.products_count = self.products.len();
        record.products_list = self.products.into_iter().collect();
        record
    }
}

fn keep_first<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

fn keep_min<T: PartialOrd>(slot: &mut Option<T>, value: Option<T>) {
    if let Some(value) = value {
        match slot {
            Some(current) if *current <= value => {}
            _ => *slot = Some(value),
        }
    }
}

fn keep_max<T: PartialOrd>(slot: &mut Option<T>, value: Option<T>) {
    if let Some(value) = value {
        match slot {
            Some(current) if *current >= value => {}
            _ => *slot = Some(value),
        }
    }
}
