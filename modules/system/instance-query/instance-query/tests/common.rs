#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

//! Shared fixtures: an in-memory `SQLite` projection seeded with instances.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use instance_query::{InstanceQueryConfig, InstanceQueryModule};
use instance_query_sdk::InstanceQueryClient;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement, Value,
};

const CREATE_INSTANCES: &str = "CREATE TABLE instances (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    changed_at TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    global_org_id TEXT NOT NULL,
    project_id TEXT NOT NULL,
    console_id TEXT NOT NULL,
    console_app_id TEXT NOT NULL,
    setup_started INTEGER NOT NULL,
    setup_done INTEGER NOT NULL,
    default_language TEXT
)";

const CREATE_INSTANCE_DOMAINS: &str = "CREATE TABLE instance_domains (
    instance_id TEXT NOT NULL,
    domain TEXT NOT NULL,
    PRIMARY KEY (instance_id, domain)
)";

/// A row of the instance projection.
pub struct Row {
    pub id: &'static str,
    pub name: &'static str,
    pub sequence: i64,
    pub default_language: Option<&'static str>,
    pub setup_started: i64,
    pub setup_done: i64,
}

impl Row {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            name: id,
            sequence: 1,
            default_language: Some("en"),
            setup_started: 2,
            setup_done: 2,
        }
    }

    pub fn sequence(mut self, sequence: i64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn language(mut self, language: Option<&'static str>) -> Self {
        self.default_language = language;
        self
    }

    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn changed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, 8, 30, 0).unwrap()
}

/// Open an in-memory database with both projection tables.
///
/// The pool is pinned to one connection; every `SQLite` memory connection
/// is its own database.
pub async fn projection_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");

    db.execute_unprepared(CREATE_INSTANCES).await.unwrap();
    db.execute_unprepared(CREATE_INSTANCE_DOMAINS).await.unwrap();
    db
}

pub async fn insert_instance(db: &DatabaseConnection, row: &Row) {
    let values: Vec<Value> = vec![
        row.id.into(),
        row.name.into(),
        created_at().into(),
        changed_at().into(),
        row.sequence.into(),
        format!("org-{}", row.id).into(),
        format!("project-{}", row.id).into(),
        format!("console-{}", row.id).into(),
        format!("console-app-{}", row.id).into(),
        row.setup_started.into(),
        row.setup_done.into(),
        row.default_language.map(str::to_owned).into(),
    ];
    db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "INSERT INTO instances (id, name, created_at, changed_at, sequence, global_org_id, \
         project_id, console_id, console_app_id, setup_started, setup_done, default_language) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        values,
    ))
    .await
    .unwrap();
}

pub async fn bind_domain(db: &DatabaseConnection, instance_id: &str, domain: &str) {
    db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "INSERT INTO instance_domains (instance_id, domain) VALUES (?, ?)",
        [instance_id.into(), domain.into()],
    ))
    .await
    .unwrap();
}

/// Client over `db` with the default configuration.
pub fn client(db: DatabaseConnection) -> Arc<dyn InstanceQueryClient> {
    InstanceQueryModule::init(db, &InstanceQueryConfig::default())
}

/// Database with three instances; `acme` is bound to two domains.
pub async fn seeded() -> DatabaseConnection {
    let db = projection_db().await;
    insert_instance(&db, &Row::new("acme").name("Acme Corp").sequence(12)).await;
    insert_instance(
        &db,
        &Row::new("globex")
            .name("Globex")
            .sequence(7)
            .language(Some("de-CH")),
    )
    .await;
    insert_instance(
        &db,
        &Row::new("initech").name("Initech").sequence(3).language(None),
    )
    .await;
    bind_domain(&db, "acme", "acme.example.com").await;
    bind_domain(&db, "acme", "login.acme.test").await;
    bind_domain(&db, "globex", "globex.example.com").await;
    db
}
