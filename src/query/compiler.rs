//! Select-AST to SQL text compiler
//!
//! Pure, total translation of a `SelectQuery` into standard-SQL text.
//! Identifiers are backtick-quoted; string literals are single-quoted
//! with backslash escaping, so caller-supplied values cannot break out
//! of the literal.
//!
//! Convention for degenerate filters: an empty `And` compiles to `TRUE`
//! and an empty `Or` compiles to `FALSE` (the identity element of each
//! connective).

use super::ast::{FilterExpr, Projection, SelectQuery, TableRef};

/// Compiles a select query into SQL text.
pub fn compile(query: &SelectQuery) -> String {
    let mut sql = String::with_capacity(64);
    sql.push_str("SELECT ");
    sql.push_str(&render_projection(&query.projection));
    sql.push_str(" FROM ");
    sql.push_str(&render_table(&query.table));
    if let Some(filter) = &query.filter {
        sql.push_str(" WHERE ");
        sql.push_str(&render_filter(filter));
    }
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    sql
}

fn render_projection(projection: &Projection) -> String {
    match projection {
        Projection::All => "*".to_string(),
        Projection::Fields(fields) => fields
            .iter()
            .map(|f| quote_ident(f))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn render_table(table: &TableRef) -> String {
    match &table.dataset {
        Some(dataset) => quote_ident(&format!("{}.{}", dataset, table.name)),
        None => quote_ident(&table.name),
    }
}

fn render_filter(filter: &FilterExpr) -> String {
    match filter {
        FilterExpr::IsNull(field) => format!("{} IS NULL", quote_ident(field)),
        FilterExpr::NotNull(field) => format!("{} IS NOT NULL", quote_ident(field)),
        FilterExpr::Eq(field, value) => {
            format!("{} = {}", quote_ident(field), quote_literal(value))
        }
        FilterExpr::And(children) if children.is_empty() => "TRUE".to_string(),
        FilterExpr::Or(children) if children.is_empty() => "FALSE".to_string(),
        FilterExpr::And(children) => join_children(children, " AND "),
        FilterExpr::Or(children) => join_children(children, " OR "),
    }
}

/// Renders children joined by a connective; composite children are
/// parenthesized to preserve precedence, leaves are not.
fn join_children(children: &[FilterExpr], sep: &str) -> String {
    children
        .iter()
        .map(|child| {
            let rendered = render_filter(child);
            if child.is_composite() {
                format!("({})", rendered)
            } else {
                rendered
            }
        })
        .collect::<Vec<_>>()
        .join(sep)
}

/// Backtick-quotes an identifier, escaping embedded backticks.
fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('\\', "\\\\").replace('`', "\\`"))
}

/// Single-quotes a string literal, escaping backslashes and quotes.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
