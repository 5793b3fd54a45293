//! Row decoding for the instance projection.
//!
//! Columns are read positionally in [`INSTANCE_PROJECTION`] order; a
//! collection row carries the window count as one extra trailing column.
//!
//! Integer columns are accepted at any width: the projection stores
//! `sequence` as `BIGINT` and the setup steps as `SMALLINT`, `SQLite`
//! reports every integer as 64-bit, and the window count is `BIGINT`.

use chrono::{DateTime, Utc};
use instance_query_sdk::{Instance, Instances, LanguageTag, SetupStep};
use sea_orm::{DbErr, QueryResult, TryGetable};

use crate::domain::error::{DomainError, Lookup};
use crate::infra::storage::schema::{
    Column, INSTANCE_CHANGE_DATE, INSTANCE_CONSOLE_APP_ID, INSTANCE_CONSOLE_ID,
    INSTANCE_CREATION_DATE, INSTANCE_DEFAULT_LANGUAGE, INSTANCE_GLOBAL_ORG_ID, INSTANCE_ID,
    INSTANCE_PROJECT_ID, INSTANCE_PROJECTION, INSTANCE_SEQUENCE, INSTANCE_SETUP_DONE,
    INSTANCE_SETUP_STARTED,
};

const COUNT_COLUMN: &str = "count";

/// Sequential reader over one row.
struct RowReader<'r> {
    row: &'r QueryResult,
    lookup: &'r Lookup,
    idx: usize,
}

impl<'r> RowReader<'r> {
    fn new(row: &'r QueryResult, lookup: &'r Lookup) -> Self {
        Self {
            row,
            lookup,
            idx: 0,
        }
    }

    fn next<T: TryGetable>(&mut self, column: Column) -> Result<T, DomainError> {
        self.expect_column(column);
        let value = self
            .row
            .try_get_by_index::<T>(self.idx)
            .map_err(|e| self.decode_error(column.name(), e))?;
        self.idx += 1;
        Ok(value)
    }

    fn next_u64(&mut self, column: Column) -> Result<u64, DomainError> {
        self.expect_column(column);
        let raw = self.integer(column.name())?;
        u64::try_from(raw).map_err(|_| out_of_range(self.lookup, column.name(), raw))
    }

    fn next_step(&mut self, column: Column) -> Result<SetupStep, DomainError> {
        self.expect_column(column);
        let raw = self.integer(column.name())?;
        u32::try_from(raw)
            .map(SetupStep::new)
            .map_err(|_| out_of_range(self.lookup, column.name(), raw))
    }

    /// The window count following the projection.
    fn count(&mut self) -> Result<u64, DomainError> {
        let raw = self.integer(COUNT_COLUMN)?;
        u64::try_from(raw).map_err(|_| out_of_range(self.lookup, COUNT_COLUMN, raw))
    }

    /// Integer at the cursor, widened from whatever width the driver reports.
    fn integer(&mut self, name: &'static str) -> Result<i64, DomainError> {
        let idx = self.idx;
        let value = match self.row.try_get_by_index::<i64>(idx) {
            Ok(v) => v,
            Err(wide) => self
                .row
                .try_get_by_index::<i32>(idx)
                .map(i64::from)
                .or_else(|_| self.row.try_get_by_index::<i16>(idx).map(i64::from))
                .map_err(|_| self.decode_error(name, wide))?,
        };
        self.idx += 1;
        Ok(value)
    }

    fn expect_column(&self, column: Column) {
        debug_assert_eq!(
            INSTANCE_PROJECTION.get(self.idx),
            Some(&column),
            "projection read out of order"
        );
    }

    fn decode_error(&self, column: &'static str, source: DbErr) -> DomainError {
        DomainError::decode(self.lookup.clone(), column, source)
    }
}

fn out_of_range(lookup: &Lookup, column: &'static str, raw: i64) -> DomainError {
    DomainError::decode(
        lookup.clone(),
        column,
        DbErr::Type(format!("value {raw} is out of range")),
    )
}

fn read_instance(reader: &mut RowReader<'_>, host: &str) -> Result<Instance, DomainError> {
    let id: String = reader.next(INSTANCE_ID)?;
    let creation_date: DateTime<Utc> = reader.next(INSTANCE_CREATION_DATE)?;
    let change_date: DateTime<Utc> = reader.next(INSTANCE_CHANGE_DATE)?;
    let sequence = reader.next_u64(INSTANCE_SEQUENCE)?;
    let global_org_id: String = reader.next(INSTANCE_GLOBAL_ORG_ID)?;
    let project_id: String = reader.next(INSTANCE_PROJECT_ID)?;
    let console_id: String = reader.next(INSTANCE_CONSOLE_ID)?;
    let console_app_id: String = reader.next(INSTANCE_CONSOLE_APP_ID)?;
    let setup_started = reader.next_step(INSTANCE_SETUP_STARTED)?;
    let setup_done = reader.next_step(INSTANCE_SETUP_DONE)?;
    let default_language: Option<String> = reader.next(INSTANCE_DEFAULT_LANGUAGE)?;

    Ok(Instance {
        id,
        creation_date,
        change_date,
        sequence,
        global_org_id,
        project_id,
        console_id,
        console_app_id,
        default_language: default_language
            .as_deref()
            .map_or_else(LanguageTag::undefined, LanguageTag::parse_or_undefined),
        setup_started,
        setup_done,
        host: host.to_owned(),
    })
}

/// Decode the single row of a lookup.
///
/// # Errors
/// `NotFound` when there is no row, `Decode` when a column cannot be read.
pub fn scan_instance(
    row: Option<QueryResult>,
    host: &str,
    lookup: Lookup,
) -> Result<Instance, DomainError> {
    let Some(row) = row else {
        return Err(DomainError::not_found(lookup));
    };
    read_instance(&mut RowReader::new(&row, &lookup), host)
}

/// Decode all rows of a collection query.
///
/// The total count is taken from the rows as reported by the store; zero
/// rows yield an empty result with count zero. Any decode failure discards
/// the rows read so far.
///
/// # Errors
/// `Decode` when a column of any row cannot be read.
pub fn scan_instances(rows: Vec<QueryResult>, lookup: &Lookup) -> Result<Instances, DomainError> {
    let mut found = Instances {
        count: 0,
        instances: Vec::with_capacity(rows.len()),
    };
    for row in rows {
        let mut reader = RowReader::new(&row, lookup);
        found.instances.push(read_instance(&mut reader, "")?);
        found.count = reader.count()?;
    }
    Ok(found)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use sea_orm::{ConnectionTrait, DbBackend, MockDatabase, Statement, Value};

    type MockRow = BTreeMap<&'static str, Value>;

    /// Mock rows are read by key order, so keys carry the projection position.
    fn projection_row(id: &str, started: Value, done: Value) -> MockRow {
        BTreeMap::from([
            ("c00_id", Value::from(id.to_owned())),
            ("c01_created_at", Value::from(DateTime::<Utc>::UNIX_EPOCH)),
            ("c02_changed_at", Value::from(DateTime::<Utc>::UNIX_EPOCH)),
            ("c03_sequence", Value::BigInt(Some(12))),
            ("c04_global_org_id", Value::from("org".to_owned())),
            ("c05_project_id", Value::from("proj".to_owned())),
            ("c06_console_id", Value::from("console".to_owned())),
            ("c07_console_app_id", Value::from("console-app".to_owned())),
            ("c08_setup_started", started),
            ("c09_setup_done", done),
            ("c10_default_language", Value::String(None)),
        ])
    }

    fn counted_row(id: &str, count: Value) -> MockRow {
        let mut row = projection_row(id, Value::BigInt(Some(1)), Value::BigInt(Some(1)));
        row.insert("c11_count", count);
        row
    }

    async fn rows(rows: Vec<MockRow>) -> Vec<QueryResult> {
        let conn = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([rows])
            .into_connection();
        conn.query_all(Statement::from_string(DbBackend::Postgres, "SELECT 1"))
            .await
            .unwrap()
    }

    fn lookup() -> Lookup {
        Lookup::search("*")
    }

    #[tokio::test]
    async fn count_is_read_from_the_row_not_summed() {
        let rows = rows(vec![
            counted_row("a", Value::BigInt(Some(2))),
            counted_row("b", Value::BigInt(Some(2))),
        ])
        .await;

        let found = scan_instances(rows, &lookup()).unwrap();
        assert_eq!(found.count, 2);
        let ids: Vec<_> = found.instances.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(found.instances.iter().all(|i| i.host.is_empty()));
    }

    #[tokio::test]
    async fn window_count_may_exceed_the_page() {
        let rows = rows(vec![counted_row("a", Value::BigInt(Some(40)))]).await;
        let found = scan_instances(rows, &lookup()).unwrap();
        assert_eq!(found.count, 40);
        assert_eq!(found.instances.len(), 1);
    }

    #[test]
    fn zero_rows_yield_empty_result() {
        let found = scan_instances(Vec::new(), &lookup()).unwrap();
        assert_eq!(found, Instances::default());
    }

    #[tokio::test]
    async fn missing_count_column_is_a_decode_error() {
        let rows = rows(vec![projection_row(
            "a",
            Value::BigInt(Some(1)),
            Value::BigInt(Some(1)),
        )])
        .await;

        let err = scan_instances(rows, &lookup()).unwrap_err();
        assert!(
            matches!(err, DomainError::Decode { column: "count", .. }),
            "{err}"
        );
    }

    #[tokio::test]
    async fn negative_count_is_a_decode_error() {
        let rows = rows(vec![counted_row("a", Value::BigInt(Some(-1)))]).await;
        let err = scan_instances(rows, &lookup()).unwrap_err();
        assert!(
            matches!(err, DomainError::Decode { column: "count", .. }),
            "{err}"
        );
    }

    // Postgres reports SMALLINT setup steps and an INTEGER count at their own
    // widths; every integer read widens to 64 bits.
    #[tokio::test]
    async fn narrow_integer_columns_are_widened() {
        let mut row = projection_row("a", Value::SmallInt(Some(3)), Value::SmallInt(Some(2)));
        row.insert("c11_count", Value::Int(Some(1)));
        let rows = rows(vec![row]).await;

        let found = scan_instances(rows, &lookup()).unwrap();
        assert_eq!(found.count, 1);
        let instance = &found.instances[0];
        assert_eq!(instance.sequence, 12);
        assert_eq!(instance.setup_started, SetupStep::new(3));
        assert_eq!(instance.setup_done, SetupStep::new(2));
        assert_eq!(instance.default_language, LanguageTag::undefined());
    }

    #[tokio::test]
    async fn negative_setup_step_is_a_decode_error() {
        let row = projection_row("a", Value::SmallInt(Some(-1)), Value::SmallInt(Some(0)));
        let mut rows = rows(vec![row]).await;

        let err = scan_instance(rows.pop(), "acme.example.com", Lookup::by_id("a")).unwrap_err();
        assert!(
            matches!(err, DomainError::Decode { column: "setup_started", .. }),
            "{err}"
        );
    }

    #[tokio::test]
    async fn single_lookup_keeps_the_requested_host() {
        let row = projection_row("a", Value::SmallInt(Some(1)), Value::SmallInt(Some(1)));
        let mut rows = rows(vec![row]).await;

        let instance = scan_instance(rows.pop(), "acme.example.com", Lookup::by_id("a")).unwrap();
        assert_eq!(instance.id, "a");
        assert_eq!(instance.host, "acme.example.com");
    }

    #[test]
    fn missing_row_is_not_found() {
        let err = scan_instance(None, "", Lookup::by_id("gone")).unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }), "{err}");
    }
}
