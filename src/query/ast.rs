//! Select-AST structures
//!
//! Defines the structured query representation handed to the compiler.
//! All types are immutable values; a `SelectQuery` lives only for the
//! duration of one `execute_query` call.

/// Reference to a table, optionally qualified by its dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    /// Dataset the table lives in (omitted when the session default applies)
    pub dataset: Option<String>,
    /// Table name
    pub name: String,
}

impl TableRef {
    /// Creates an unqualified table reference
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            dataset: None,
            name: name.into(),
        }
    }

    /// Creates a dataset-qualified table reference
    pub fn in_dataset(dataset: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            dataset: Some(dataset.into()),
            name: name.into(),
        }
    }
}

/// Column projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Select every column (`*`)
    All,
    /// Select the named columns, in order
    Fields(Vec<String>),
}

/// Filter expression tree
///
/// Trees are acyclic and immutable. Child order is preserved in the
/// rendered text but does not affect semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    /// `field IS NULL`
    IsNull(String),
    /// `field IS NOT NULL`
    NotNull(String),
    /// `field = 'value'`
    Eq(String, String),
    /// Conjunction of children
    And(Vec<FilterExpr>),
    /// Disjunction of children
    Or(Vec<FilterExpr>),
}

impl FilterExpr {
    /// Creates an `IS NULL` leaf
    pub fn is_null(field: impl Into<String>) -> Self {
        FilterExpr::IsNull(field.into())
    }

    /// Creates an `IS NOT NULL` leaf
    pub fn not_null(field: impl Into<String>) -> Self {
        FilterExpr::NotNull(field.into())
    }

    /// Creates an equality leaf
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterExpr::Eq(field.into(), value.into())
    }

    /// Creates a conjunction
    pub fn and(children: Vec<FilterExpr>) -> Self {
        FilterExpr::And(children)
    }

    /// Creates a disjunction
    pub fn or(children: Vec<FilterExpr>) -> Self {
        FilterExpr::Or(children)
    }

    /// Returns true for `And`/`Or` nodes
    pub fn is_composite(&self) -> bool {
        matches!(self, FilterExpr::And(_) | FilterExpr::Or(_))
    }
}

/// A structured select query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    /// Target table
    pub table: TableRef,
    /// Column projection
    pub projection: Projection,
    /// Optional filter tree
    pub filter: Option<FilterExpr>,
    /// Optional row limit (must be positive)
    pub limit: Option<u64>,
}

impl SelectQuery {
    /// Creates a `SELECT *` query with no filter or limit
    pub fn new(table: TableRef) -> Self {
        Self {
            table,
            projection: Projection::All,
            filter: None,
            limit: None,
        }
    }

    /// Restricts the projection to the named columns
    pub fn select(mut self, fields: Vec<String>) -> Self {
        self.projection = Projection::Fields(fields);
        self
    }

    /// Sets the filter tree
    pub fn with_filter(mut self, filter: FilterExpr) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the row limit
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = SelectQuery::new(TableRef::in_dataset("sales", "orders"))
            .select(vec!["id".into(), "total".into()])
            .with_filter(FilterExpr::not_null("total"))
            .with_limit(10);

        assert_eq!(query.table.name, "orders");
        assert_eq!(query.table.dataset.as_deref(), Some("sales"));
        assert_eq!(
            query.projection,
            Projection::Fields(vec!["id".into(), "total".into()])
        );
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_composite_detection() {
        assert!(FilterExpr::and(vec![]).is_composite());
        assert!(FilterExpr::or(vec![]).is_composite());
        assert!(!FilterExpr::is_null("a").is_composite());
        assert!(!FilterExpr::eq("a", "b").is_composite());
    }
}
