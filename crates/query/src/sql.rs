//! Renders a [`Select`] into parameterized Postgres SQL.
//!
//! Identifiers come from our own query constructors, never from callers, so
//! they are interpolated as-is; every value becomes a `$n` placeholder.

use crate::select::{Predicate, Select, Value};

/// Rendered statement: SQL text plus bind values in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

fn qualify(column: &str, base_alias: &str) -> String {
    if column.contains('.') {
        column.to_string()
    } else {
        format!("{base_alias}.{column}")
    }
}

pub fn render(select: &Select) -> Statement {
    let mut sql = String::from("SELECT ");
    if select.distinct {
        sql.push_str("DISTINCT ");
    }

    let mut projection = Vec::new();
    if select.columns.is_empty() {
        projection.push(format!("{}.*", select.alias));
    } else {
        for (column, name) in &select.columns {
            projection.push(format!("{} AS {}", qualify(column, &select.alias), name));
        }
    }
    for join in &select.joins {
        for (column, name) in &join.columns {
            projection.push(format!("{}.{} AS {}", join.alias, column, name));
        }
    }
    sql.push_str(&projection.join(", "));

    sql.push_str(&format!(" FROM {} AS {}", select.table, select.alias));

    for join in &select.joins {
        sql.push_str(&format!(" INNER JOIN {} AS {} ON ", join.table, join.alias));
        let on: Vec<String> = join
            .on
            .iter()
            .map(|(left, right)| format!("{left} = {right}"))
            .collect();
        sql.push_str(&on.join(" AND "));
    }

    let mut params = Vec::new();
    if !select.predicates.is_empty() {
        sql.push_str(" WHERE ");
        let mut clauses = Vec::with_capacity(select.predicates.len());
        for predicate in &select.predicates {
            clauses.push(match predicate {
                Predicate::Eq(column, value) => {
                    params.push(value.clone());
                    format!("{} = ${}", qualify(column, &select.alias), params.len())
                }
                Predicate::Gt(column, value) => {
                    params.push(value.clone());
                    format!("{} > ${}", qualify(column, &select.alias), params.len())
                }
                Predicate::In(column, values) => {
                    if values.is_empty() {
                        "FALSE".to_string()
                    } else {
                        let placeholders: Vec<String> = values
                            .iter()
                            .map(|value| {
                                params.push(value.clone());
                                format!("${}", params.len())
                            })
                            .collect();
                        format!(
                            "{} IN ({})",
                            qualify(column, &select.alias),
                            placeholders.join(", ")
                        )
                    }
                }
            });
        }
        sql.push_str(&clauses.join(" AND "));
    }

    if !select.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        let columns: Vec<String> = select
            .group_by
            .iter()
            .map(|column| qualify(column, &select.alias))
            .collect();
        sql.push_str(&columns.join(", "));
    }

    if !select.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        let columns: Vec<String> = select
            .order_by
            .iter()
            .map(|column| format!("{} ASC", qualify(column, &select.alias)))
            .collect();
        sql.push_str(&columns.join(", "));
    }

    if let Some(limit) = select.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    Statement { sql, params }
}
