//! Predicate algebra for instance searches.
//!
//! Predicates are expressed over logical [`InstanceField`]s. The storage layer
//! maps fields to physical columns and renders every value as a bound
//! parameter; nothing here ever becomes statement text.

use chrono::{DateTime, Utc};

use crate::error::InstanceQueryError;

/// Value category of a field, used to validate predicate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Timestamp,
}

/// Filterable and sortable instance fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceField {
    Id,
    Name,
    CreationDate,
    ChangeDate,
    Sequence,
    GlobalOrgId,
    ProjectId,
    ConsoleId,
    ConsoleAppId,
    SetupStarted,
    SetupDone,
    DefaultLanguage,
    /// Bound domain; lives on the domain-binding table and is only usable
    /// in statements that join it.
    Domain,
}

impl InstanceField {
    pub const FIELDS: &'static [Self] = &[
        Self::Id,
        Self::Name,
        Self::CreationDate,
        Self::ChangeDate,
        Self::Sequence,
        Self::GlobalOrgId,
        Self::ProjectId,
        Self::ConsoleId,
        Self::ConsoleAppId,
        Self::SetupStarted,
        Self::SetupDone,
        Self::DefaultLanguage,
        Self::Domain,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::CreationDate => "creation_date",
            Self::ChangeDate => "change_date",
            Self::Sequence => "sequence",
            Self::GlobalOrgId => "global_org_id",
            Self::ProjectId => "project_id",
            Self::ConsoleId => "console_id",
            Self::ConsoleAppId => "console_app_id",
            Self::SetupStarted => "setup_started",
            Self::SetupDone => "setup_done",
            Self::DefaultLanguage => "default_language",
            Self::Domain => "domain",
        }
    }

    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Sequence | Self::SetupStarted | Self::SetupDone => FieldKind::Number,
            Self::CreationDate | Self::ChangeDate => FieldKind::Timestamp,
            Self::Id
            | Self::Name
            | Self::GlobalOrgId
            | Self::ProjectId
            | Self::ConsoleId
            | Self::ConsoleAppId
            | Self::DefaultLanguage
            | Self::Domain => FieldKind::Text,
        }
    }

    /// Resolve a field by its API name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::FIELDS
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// A typed predicate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Number(i64),
    Timestamp(DateTime<Utc>),
}

impl FilterValue {
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Number(_) => FieldKind::Number,
            Self::Timestamp(_) => FieldKind::Timestamp,
        }
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Number(v)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

/// Text comparison methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextComparison {
    Equals,
    EqualsIgnoreCase,
    NotEquals,
    StartsWith,
    StartsWithIgnoreCase,
    EndsWith,
    EndsWithIgnoreCase,
    Contains,
    ContainsIgnoreCase,
}

impl TextComparison {
    #[must_use]
    pub const fn ignores_case(self) -> bool {
        matches!(
            self,
            Self::EqualsIgnoreCase
                | Self::StartsWithIgnoreCase
                | Self::EndsWithIgnoreCase
                | Self::ContainsIgnoreCase
        )
    }
}

/// Number comparison methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberComparison {
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

/// The condition part of a [`SearchQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `field = value`
    Equals(FilterValue),
    /// `field IN (values…)`; never empty.
    InList(Vec<FilterValue>),
    Text(TextComparison, String),
    Number(NumberComparison, i64),
    NotNull,
}

/// A single filter term bound to one field.
///
/// Constructed only through the validating constructors, so a value always
/// matches its field's [`FieldKind`] and list predicates are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    field: InstanceField,
    predicate: Predicate,
}

impl SearchQuery {
    /// `field = value`.
    ///
    /// # Errors
    /// `InvalidArgument` if the value kind does not match the field.
    pub fn equals(
        field: InstanceField,
        value: impl Into<FilterValue>,
    ) -> Result<Self, InstanceQueryError> {
        let value = value.into();
        check_kind(field, &value)?;
        Ok(Self {
            field,
            predicate: Predicate::Equals(value),
        })
    }

    /// `field IN (values…)`.
    ///
    /// # Errors
    /// `InvalidArgument` if `values` is empty or any value kind does not
    /// match the field. An empty list is rejected rather than matching
    /// nothing or everything.
    pub fn in_list<I, V>(field: InstanceField, values: I) -> Result<Self, InstanceQueryError>
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        let values: Vec<FilterValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(InstanceQueryError::invalid_argument(format!(
                "list query on `{}` requires at least one value",
                field.name()
            )));
        }
        for value in &values {
            check_kind(field, value)?;
        }
        Ok(Self {
            field,
            predicate: Predicate::InList(values),
        })
    }

    /// Text comparison on a text field.
    ///
    /// # Errors
    /// `InvalidArgument` if the field is not a text field.
    pub fn text(
        field: InstanceField,
        value: impl Into<String>,
        comparison: TextComparison,
    ) -> Result<Self, InstanceQueryError> {
        require_kind(field, FieldKind::Text)?;
        Ok(Self {
            field,
            predicate: Predicate::Text(comparison, value.into()),
        })
    }

    /// Number comparison on a numeric field.
    ///
    /// # Errors
    /// `InvalidArgument` if the field is not numeric.
    pub fn number(
        field: InstanceField,
        value: i64,
        comparison: NumberComparison,
    ) -> Result<Self, InstanceQueryError> {
        require_kind(field, FieldKind::Number)?;
        Ok(Self {
            field,
            predicate: Predicate::Number(comparison, value),
        })
    }

    #[must_use]
    pub fn not_null(field: InstanceField) -> Self {
        Self {
            field,
            predicate: Predicate::NotNull,
        }
    }

    #[must_use]
    pub fn field(&self) -> InstanceField {
        self.field
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

/// Build an "id is one of {…}" query.
///
/// # Errors
/// `InvalidArgument` if `ids` is empty.
pub fn instance_ids_list_query<I, S>(ids: I) -> Result<SearchQuery, InstanceQueryError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SearchQuery::in_list(
        InstanceField::Id,
        ids.into_iter().map(|id| FilterValue::Text(id.into())),
    )
}

fn check_kind(field: InstanceField, value: &FilterValue) -> Result<(), InstanceQueryError> {
    require_kind(field, value.kind())
}

fn require_kind(field: InstanceField, got: FieldKind) -> Result<(), InstanceQueryError> {
    if field.kind() == got {
        return Ok(());
    }
    Err(InstanceQueryError::invalid_argument(format!(
        "type mismatch on `{}`: expected {:?}, got {got:?}",
        field.name(),
        field.kind()
    )))
}

/// Pagination and ordering of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub offset: u64,
    /// `0` means no limit.
    pub limit: u64,
    pub sorting_column: Option<InstanceField>,
    /// Ascending when `true`, descending otherwise.
    pub asc: bool,
}

/// A search: pagination plus predicates combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceSearchQueries {
    pub request: SearchRequest,
    pub queries: Vec<SearchQuery>,
}

impl InstanceSearchQueries {
    #[must_use]
    pub fn new(request: SearchRequest) -> Self {
        Self {
            request,
            queries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: SearchQuery) -> Self {
        self.queries.push(query);
        self
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_id_list_is_rejected() {
        let err = instance_ids_list_query(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, InstanceQueryError::InvalidArgument { .. }));
    }

    #[test]
    fn id_list_keeps_caller_order() {
        let q = instance_ids_list_query(["b", "a", "c"]).unwrap();
        assert_eq!(q.field(), InstanceField::Id);
        assert_eq!(
            q.predicate(),
            &Predicate::InList(vec!["b".into(), "a".into(), "c".into()])
        );
    }

    #[test]
    fn equals_rejects_value_of_wrong_kind() {
        let err = SearchQuery::equals(InstanceField::Sequence, "ten").unwrap_err();
        assert!(matches!(err, InstanceQueryError::InvalidArgument { .. }));
        assert!(SearchQuery::equals(InstanceField::Sequence, 10_i64).is_ok());
    }

    #[test]
    fn text_comparison_requires_text_field() {
        assert!(SearchQuery::text(InstanceField::Name, "acme", TextComparison::Contains).is_ok());
        assert!(
            SearchQuery::text(InstanceField::SetupDone, "1", TextComparison::Equals).is_err()
        );
        assert!(
            SearchQuery::number(InstanceField::Name, 1, NumberComparison::Greater).is_err()
        );
    }

    #[test]
    fn list_with_mixed_kinds_is_rejected() {
        let values = vec![FilterValue::from("a"), FilterValue::from(1_i64)];
        assert!(SearchQuery::in_list(InstanceField::Id, values).is_err());
    }

    #[test]
    fn fields_resolve_by_name() {
        assert_eq!(
            InstanceField::from_name("DEFAULT_LANGUAGE"),
            Some(InstanceField::DefaultLanguage)
        );
        assert_eq!(InstanceField::from_name("unknown"), None);
        for field in InstanceField::FIELDS {
            assert_eq!(InstanceField::from_name(field.name()), Some(*field));
        }
    }
}
