//! Projection tables and columns read by this module.
//!
//! Table names come from configuration; column names are fixed by the
//! projection. The [`INSTANCE_PROJECTION`] order is shared by the statement
//! builder and the scanner.

use std::fmt;

use sea_orm::sea_query::{Alias, ColumnRef, IntoIden, TableRef};

use crate::config::InstanceQueryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionTable {
    Instances,
    InstanceDomains,
}

/// A column of one of the projection tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    table: ProjectionTable,
    name: &'static str,
}

impl Column {
    const fn instances(name: &'static str) -> Self {
        Self {
            table: ProjectionTable::Instances,
            name,
        }
    }

    const fn instance_domains(name: &'static str) -> Self {
        Self {
            table: ProjectionTable::InstanceDomains,
            name,
        }
    }

    #[must_use]
    pub const fn table(self) -> ProjectionTable {
        self.table
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

pub const INSTANCE_ID: Column = Column::instances("id");
pub const INSTANCE_NAME: Column = Column::instances("name");
pub const INSTANCE_CREATION_DATE: Column = Column::instances("created_at");
pub const INSTANCE_CHANGE_DATE: Column = Column::instances("changed_at");
pub const INSTANCE_SEQUENCE: Column = Column::instances("sequence");
pub const INSTANCE_GLOBAL_ORG_ID: Column = Column::instances("global_org_id");
pub const INSTANCE_PROJECT_ID: Column = Column::instances("project_id");
pub const INSTANCE_CONSOLE_ID: Column = Column::instances("console_id");
pub const INSTANCE_CONSOLE_APP_ID: Column = Column::instances("console_app_id");
pub const INSTANCE_SETUP_STARTED: Column = Column::instances("setup_started");
pub const INSTANCE_SETUP_DONE: Column = Column::instances("setup_done");
pub const INSTANCE_DEFAULT_LANGUAGE: Column = Column::instances("default_language");

pub const DOMAIN_INSTANCE_ID: Column = Column::instance_domains("instance_id");
pub const DOMAIN_DOMAIN: Column = Column::instance_domains("domain");

/// Columns selected for an instance, in scan order.
pub const INSTANCE_PROJECTION: [Column; 11] = [
    INSTANCE_ID,
    INSTANCE_CREATION_DATE,
    INSTANCE_CHANGE_DATE,
    INSTANCE_SEQUENCE,
    INSTANCE_GLOBAL_ORG_ID,
    INSTANCE_PROJECT_ID,
    INSTANCE_CONSOLE_ID,
    INSTANCE_CONSOLE_APP_ID,
    INSTANCE_SETUP_STARTED,
    INSTANCE_SETUP_DONE,
    INSTANCE_DEFAULT_LANGUAGE,
];

/// An optionally schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    schema: Option<String>,
    name: String,
}

impl TableName {
    #[must_use]
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.map(str::to_owned),
            name: name.into(),
        }
    }

    fn table_ref(&self) -> TableRef {
        let table = Alias::new(self.name.as_str()).into_iden();
        match &self.schema {
            Some(schema) => TableRef::SchemaTable(Alias::new(schema.as_str()).into_iden(), table),
            None => TableRef::Table(table),
        }
    }

    fn column_ref(&self, column: &'static str) -> ColumnRef {
        let table = Alias::new(self.name.as_str()).into_iden();
        let column = Alias::new(column).into_iden();
        match &self.schema {
            Some(schema) => {
                ColumnRef::SchemaTableColumn(Alias::new(schema.as_str()).into_iden(), table, column)
            }
            None => ColumnRef::TableColumn(table, column),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Immutable description of the projection tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSchema {
    instances: TableName,
    instance_domains: TableName,
}

impl Default for InstanceSchema {
    fn default() -> Self {
        Self::from_config(&InstanceQueryConfig::default())
    }
}

impl InstanceSchema {
    #[must_use]
    pub fn new(instances: TableName, instance_domains: TableName) -> Self {
        Self {
            instances,
            instance_domains,
        }
    }

    #[must_use]
    pub fn from_config(cfg: &InstanceQueryConfig) -> Self {
        let schema = cfg.schema.as_deref();
        Self::new(
            TableName::new(schema, cfg.instances_table.as_str()),
            TableName::new(schema, cfg.instance_domains_table.as_str()),
        )
    }

    #[must_use]
    pub fn table_name(&self, table: ProjectionTable) -> &TableName {
        match table {
            ProjectionTable::Instances => &self.instances,
            ProjectionTable::InstanceDomains => &self.instance_domains,
        }
    }

    #[must_use]
    pub fn table_ref(&self, table: ProjectionTable) -> TableRef {
        self.table_name(table).table_ref()
    }

    /// Table-qualified reference to `column`.
    #[must_use]
    pub fn column_ref(&self, column: Column) -> ColumnRef {
        self.table_name(column.table()).column_ref(column.name())
    }

    /// Table-qualified name of `column`, for messages.
    #[must_use]
    pub fn identifier(&self, column: Column) -> String {
        format!("{}.{}", self.table_name(column.table()), column.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_table_qualified() {
        let schema = InstanceSchema::default();
        assert_eq!(schema.identifier(INSTANCE_ID), "instances.id");
        assert_eq!(schema.identifier(DOMAIN_DOMAIN), "instance_domains.domain");
    }

    #[test]
    fn configured_schema_qualifies_both_tables() {
        let cfg = InstanceQueryConfig {
            schema: Some("projections".to_owned()),
            ..InstanceQueryConfig::default()
        };
        let schema = InstanceSchema::from_config(&cfg);
        assert_eq!(
            schema.identifier(INSTANCE_DEFAULT_LANGUAGE),
            "projections.instances.default_language"
        );
        assert_eq!(
            schema.identifier(DOMAIN_INSTANCE_ID),
            "projections.instance_domains.instance_id"
        );
    }

    #[test]
    fn projection_reads_only_the_instance_table() {
        assert!(
            INSTANCE_PROJECTION
                .iter()
                .all(|c| c.table() == ProjectionTable::Instances)
        );
        assert!(!INSTANCE_PROJECTION.contains(&INSTANCE_NAME));
    }
}
