//! `SearchQuery` → `SeaQuery` expression rendering.
//!
//! Every caller value becomes a bound [`Value`]; only column identifiers
//! from the schema ever reach the statement text.

use instance_query_sdk::{
    FilterValue, InstanceField, NumberComparison, Predicate, SearchQuery, TextComparison,
};
use sea_orm::sea_query::{BinOper, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{DbBackend, Value};

use crate::domain::error::DomainError;
use crate::infra::storage::schema::{
    Column, DOMAIN_DOMAIN, INSTANCE_CHANGE_DATE, INSTANCE_CONSOLE_APP_ID, INSTANCE_CONSOLE_ID,
    INSTANCE_CREATION_DATE, INSTANCE_DEFAULT_LANGUAGE, INSTANCE_GLOBAL_ORG_ID, INSTANCE_ID,
    INSTANCE_NAME, INSTANCE_PROJECT_ID, INSTANCE_SEQUENCE, INSTANCE_SETUP_DONE,
    INSTANCE_SETUP_STARTED, InstanceSchema,
};

const LIKE_ESCAPE: char = '\\';
const GLOB: BinOper = BinOper::Custom("GLOB");

/// Maps a logical field to its projection column.
#[must_use]
pub fn field_column(field: InstanceField) -> Column {
    match field {
        InstanceField::Id => INSTANCE_ID,
        InstanceField::Name => INSTANCE_NAME,
        InstanceField::CreationDate => INSTANCE_CREATION_DATE,
        InstanceField::ChangeDate => INSTANCE_CHANGE_DATE,
        InstanceField::Sequence => INSTANCE_SEQUENCE,
        InstanceField::GlobalOrgId => INSTANCE_GLOBAL_ORG_ID,
        InstanceField::ProjectId => INSTANCE_PROJECT_ID,
        InstanceField::ConsoleId => INSTANCE_CONSOLE_ID,
        InstanceField::ConsoleAppId => INSTANCE_CONSOLE_APP_ID,
        InstanceField::SetupStarted => INSTANCE_SETUP_STARTED,
        InstanceField::SetupDone => INSTANCE_SETUP_DONE,
        InstanceField::DefaultLanguage => INSTANCE_DEFAULT_LANGUAGE,
        InstanceField::Domain => DOMAIN_DOMAIN,
    }
}

/// Render `query` as a condition on its column for `backend`.
///
/// # Errors
/// `InvalidQuery` for an empty list predicate.
pub fn render(
    query: &SearchQuery,
    schema: &InstanceSchema,
    backend: DbBackend,
) -> Result<SimpleExpr, DomainError> {
    let column = field_column(query.field());
    let col = || Expr::col(schema.column_ref(column));

    let expr = match query.predicate() {
        Predicate::Equals(value) => col().eq(bind(value)),
        Predicate::InList(values) => {
            if values.is_empty() {
                return Err(DomainError::invalid_query(format!(
                    "list query on `{}` has no values",
                    schema.identifier(column)
                )));
            }
            col().is_in(values.iter().map(bind))
        }
        Predicate::Text(
            comparison @ (TextComparison::StartsWith
            | TextComparison::EndsWith
            | TextComparison::Contains),
            value,
        ) if backend == DbBackend::Sqlite => {
            sqlite_glob(SimpleExpr::Column(schema.column_ref(column)), *comparison, value)
        }
        Predicate::Text(comparison, value) => render_text(col(), *comparison, value),
        Predicate::Number(comparison, value) => render_number(col(), *comparison, *value),
        Predicate::NotNull => col().is_not_null(),
    };
    Ok(expr)
}

fn bind(value: &FilterValue) -> Value {
    match value {
        FilterValue::Text(v) => Value::from(v.clone()),
        FilterValue::Number(v) => Value::from(*v),
        FilterValue::Timestamp(v) => Value::from(*v),
    }
}

fn render_text(col: Expr, comparison: TextComparison, value: &str) -> SimpleExpr {
    let (target, value) = if comparison.ignores_case() {
        (Expr::expr(Func::lower(col)), value.to_lowercase())
    } else {
        (col, value.to_owned())
    };

    match comparison {
        TextComparison::Equals | TextComparison::EqualsIgnoreCase => target.eq(value),
        TextComparison::NotEquals => target.ne(value),
        TextComparison::StartsWith | TextComparison::StartsWithIgnoreCase => {
            target.like(like_pattern(&value, false, true))
        }
        TextComparison::EndsWith | TextComparison::EndsWithIgnoreCase => {
            target.like(like_pattern(&value, true, false))
        }
        TextComparison::Contains | TextComparison::ContainsIgnoreCase => {
            target.like(like_pattern(&value, true, true))
        }
    }
}

fn render_number(col: Expr, comparison: NumberComparison, value: i64) -> SimpleExpr {
    match comparison {
        NumberComparison::Equals => col.eq(value),
        NumberComparison::NotEquals => col.ne(value),
        NumberComparison::Less => col.lt(value),
        NumberComparison::LessOrEquals => col.lte(value),
        NumberComparison::Greater => col.gt(value),
        NumberComparison::GreaterOrEquals => col.gte(value),
    }
}

/// `SQLite` `LIKE` ignores ASCII case; `GLOB` does not.
fn sqlite_glob(column: SimpleExpr, comparison: TextComparison, value: &str) -> SimpleExpr {
    let (leading, trailing) = match comparison {
        TextComparison::EndsWith => (true, false),
        TextComparison::Contains => (true, true),
        _ => (false, true),
    };
    SimpleExpr::Binary(
        Box::new(column),
        GLOB,
        Box::new(Value::from(glob_pattern(value, leading, trailing)).into()),
    )
}

fn glob_pattern(value: &str, leading: bool, trailing: bool) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    if leading {
        pattern.push('*');
    }
    for c in value.chars() {
        match c {
            '*' => pattern.push_str("[*]"),
            '?' => pattern.push_str("[?]"),
            '[' => pattern.push_str("[[]"),
            _ => pattern.push(c),
        }
    }
    if trailing {
        pattern.push('*');
    }
    pattern
}

fn like_pattern(value: &str, leading: bool, trailing: bool) -> LikeExpr {
    let mut pattern = String::with_capacity(value.len() + 2);
    if leading {
        pattern.push('%');
    }
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    if trailing {
        pattern.push('%');
    }
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}
