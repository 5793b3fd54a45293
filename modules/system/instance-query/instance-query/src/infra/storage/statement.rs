//! Statement builder for instance reads.
//!
//! Produces `SELECT <projection> [, COUNT(*) OVER ()] FROM instances
//! [LEFT JOIN instance_domains ON …] WHERE … [ORDER BY …] [LIMIT …] [OFFSET …]`
//! with placeholders numbered by the backend in the order predicates are
//! applied.

use instance_query_sdk::{SearchQuery, SearchRequest};
use sea_orm::sea_query::{Expr, Order, Query, SelectStatement};
use sea_orm::{DbBackend, Statement};

use crate::domain::error::DomainError;
use crate::infra::storage::predicate::{field_column, render};
use crate::infra::storage::schema::{
    Column, DOMAIN_INSTANCE_ID, INSTANCE_ID, INSTANCE_PROJECTION, InstanceSchema, ProjectionTable,
};

/// Window aggregate carrying the total match count on every row.
const COUNT_OVER: &str = "COUNT(*) OVER ()";

/// Builder for one read statement over the instance projection.
#[must_use]
pub struct InstanceStatement<'s> {
    schema: &'s InstanceSchema,
    join_domains: bool,
    with_count: bool,
    filters: Vec<SearchQuery>,
    request: Option<SearchRequest>,
}

impl<'s> InstanceStatement<'s> {
    /// Statement for a single-row lookup.
    pub fn single(schema: &'s InstanceSchema) -> Self {
        Self {
            schema,
            join_domains: false,
            with_count: false,
            filters: Vec::new(),
            request: None,
        }
    }

    /// Statement for a collection query; appends the count column.
    pub fn collection(schema: &'s InstanceSchema) -> Self {
        Self {
            with_count: true,
            ..Self::single(schema)
        }
    }

    /// Left-join the domain-binding table on the instance id.
    pub fn join_domains(mut self) -> Self {
        self.join_domains = true;
        self
    }

    pub fn filter(mut self, query: SearchQuery) -> Self {
        self.filters.push(query);
        self
    }

    pub fn filters(mut self, queries: impl IntoIterator<Item = SearchQuery>) -> Self {
        self.filters.extend(queries);
        self
    }

    pub fn request(mut self, request: SearchRequest) -> Self {
        self.request = Some(request);
        self
    }

    /// Assemble the statement and serialize it for `backend`.
    ///
    /// # Errors
    /// `InvalidQuery` if a predicate or the sort column refers to a table the
    /// statement does not read, a list predicate is empty, or the limit or
    /// offset does not fit a signed 64-bit integer. Nothing is executed in
    /// that case.
    pub fn build(&self, backend: DbBackend) -> Result<Statement, DomainError> {
        Ok(backend.build(&self.select(backend)?))
    }

    fn select(&self, backend: DbBackend) -> Result<SelectStatement, DomainError> {
        let mut select = Query::select();
        for column in INSTANCE_PROJECTION {
            select.column(self.schema.column_ref(column));
        }
        if self.with_count {
            select.expr(Expr::cust(COUNT_OVER));
        }
        select.from(self.schema.table_ref(ProjectionTable::Instances));

        if self.join_domains {
            select.left_join(
                self.schema.table_ref(ProjectionTable::InstanceDomains),
                Expr::col(self.schema.column_ref(DOMAIN_INSTANCE_ID))
                    .equals(self.schema.column_ref(INSTANCE_ID)),
            );
        }

        for query in &self.filters {
            self.ensure_readable(field_column(query.field()))?;
            select.and_where(render(query, self.schema, backend)?);
        }

        if let Some(request) = &self.request {
            if let Some(field) = request.sorting_column {
                let column = field_column(field);
                self.ensure_readable(column)?;
                let order = if request.asc { Order::Asc } else { Order::Desc };
                select.order_by(self.schema.column_ref(column), order);
            }
            if request.limit > 0 {
                select.limit(bounded("limit", request.limit)?);
            }
            if request.offset > 0 {
                select.offset(bounded("offset", request.offset)?);
            }
        }

        Ok(select)
    }

    fn ensure_readable(&self, column: Column) -> Result<(), DomainError> {
        let readable = match column.table() {
            ProjectionTable::Instances => true,
            ProjectionTable::InstanceDomains => self.join_domains,
        };
        if readable {
            return Ok(());
        }
        Err(DomainError::invalid_query(format!(
            "column `{}` is not part of the statement",
            self.schema.identifier(column)
        )))
    }
}

/// Pagination values are bound as signed 64-bit integers by every driver.
fn bounded(name: &str, value: u64) -> Result<u64, DomainError> {
    i64::try_from(value)
        .map(|_| value)
        .map_err(|_| DomainError::invalid_query(format!("{name} {value} is out of range")))
}
