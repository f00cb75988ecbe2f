use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::select::{Predicate, Select, Value};

use super::r#trait::{ExecutorError, QueryExecutor, Row};

/// In-memory query executor.
///
/// Tables are registered as named row sets; `fetch` evaluates the full
/// `Select` semantics against them. Intended for tests/dev. Not optimized
/// for performance.
#[derive(Debug, Default)]
pub struct InMemoryExecutor {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

/// One joined row under evaluation: the base row plus one row per join,
/// each tagged with its alias.
type Combo = Vec<(String, Row)>;

impl InMemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a table exists even when no fixture rows are registered.
    pub fn register_table(&self, table: &str) {
        if let Ok(mut tables) = self.tables.write() {
            tables.entry(table.to_string()).or_default();
        }
    }

    pub fn insert(&self, table: &str, row: Row) {
        if let Ok(mut tables) = self.tables.write() {
            tables.entry(table.to_string()).or_default().push(row);
        }
    }

    pub fn insert_rows(&self, table: &str, rows: impl IntoIterator<Item = Row>) {
        for row in rows {
            self.insert(table, row);
        }
    }

    fn table_rows(&self, table: &str) -> Result<Vec<Row>, ExecutorError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| ExecutorError::Storage("lock poisoned".to_string()))?;
        tables
            .get(table)
            .cloned()
            .ok_or_else(|| ExecutorError::UnknownTable(table.to_string()))
    }
}

fn resolve<'a>(column: &str, combo: &'a Combo) -> Option<&'a Value> {
    if let Some((alias, bare)) = column.split_once('.') {
        combo
            .iter()
            .find(|(a, _)| a == alias)
            .and_then(|(_, row)| row.get(bare))
    } else {
        combo.iter().find_map(|(_, row)| row.get(column))
    }
}

fn resolve_required<'a>(column: &str, combo: &'a Combo) -> Result<&'a Value, ExecutorError> {
    resolve(column, combo).ok_or_else(|| ExecutorError::UnknownColumn(column.to_string()))
}

fn matches(predicate: &Predicate, combo: &Combo) -> Result<bool, ExecutorError> {
    Ok(match predicate {
        Predicate::Eq(column, value) => resolve_required(column, combo)?.loose_eq(value),
        Predicate::Gt(column, value) => {
            resolve_required(column, combo)?.cmp_sort(value) == core::cmp::Ordering::Greater
        }
        Predicate::In(column, values) => {
            let actual = resolve_required(column, combo)?;
            values.iter().any(|value| actual.loose_eq(value))
        }
    })
}

/// Canonical string key for grouping/distinct comparisons.
fn key_string<'a>(values: impl Iterator<Item = &'a Value>) -> String {
    let mut key = String::new();
    for value in values {
        match value {
            Value::Int(i) => key.push_str(&format!("i:{i}")),
            Value::Float(f) => key.push_str(&format!("f:{f}")),
            Value::Str(s) => key.push_str(&format!("s:{s}")),
            Value::Null => key.push('n'),
        }
        key.push('\u{1f}');
    }
    key
}

fn project(select: &Select, combo: &Combo) -> Result<Row, ExecutorError> {
    let mut out = Row::new();

    if select.columns.is_empty() {
        let base = combo
            .iter()
            .find(|(alias, _)| *alias == select.alias)
            .map(|(_, row)| row)
            .ok_or_else(|| ExecutorError::UnknownTable(select.alias.clone()))?;
        for (name, value) in base.columns() {
            out = out.set(name, value.clone());
        }
    } else {
        for (column, name) in &select.columns {
            let value = resolve_required(column, combo)?;
            out = out.set(name.as_str(), value.clone());
        }
    }

    for join in &select.joins {
        for (column, name) in &join.columns {
            let qualified = format!("{}.{}", join.alias, column);
            let value = resolve_required(&qualified, combo)?;
            out = out.set(name.as_str(), value.clone());
        }
    }

    Ok(out)
}

impl QueryExecutor for InMemoryExecutor {
    fn fetch(&self, select: &Select) -> Result<Vec<Row>, ExecutorError> {
        let mut combos: Vec<Combo> = self
            .table_rows(&select.table)?
            .into_iter()
            .map(|row| vec![(select.alias.clone(), row)])
            .collect();

        for join in &select.joins {
            let rows = self.table_rows(&join.table)?;
            let mut joined = Vec::new();
            for combo in &combos {
                for row in &rows {
                    let mut candidate = combo.clone();
                    candidate.push((join.alias.clone(), row.clone()));
                    let mut ok = true;
                    for (left, right) in &join.on {
                        let l = resolve_required(left, &candidate)?;
                        let r = resolve_required(right, &candidate)?;
                        if !l.loose_eq(r) {
                            ok = false;
                            break;
                        }
                    }
                    if ok {
                        joined.push(candidate);
                    }
                }
            }
            combos = joined;
        }

        let mut filtered = Vec::with_capacity(combos.len());
        for combo in combos {
            let mut keep = true;
            for predicate in &select.predicates {
                if !matches(predicate, &combo)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                filtered.push(combo);
            }
        }

        // Group-by without aggregates: keep the first row of each group.
        if !select.group_by.is_empty() {
            let mut seen = HashSet::new();
            let mut grouped = Vec::with_capacity(filtered.len());
            for combo in filtered {
                let mut values = Vec::with_capacity(select.group_by.len());
                for column in &select.group_by {
                    values.push(resolve_required(column, &combo)?.clone());
                }
                if seen.insert(key_string(values.iter())) {
                    grouped.push(combo);
                }
            }
            filtered = grouped;
        }

        if !select.order_by.is_empty() {
            let mut keyed = Vec::with_capacity(filtered.len());
            for combo in filtered {
                let mut keys = Vec::with_capacity(select.order_by.len());
                for column in &select.order_by {
                    keys.push(resolve_required(column, &combo)?.clone());
                }
                keyed.push((keys, combo));
            }
            keyed.sort_by(|(a, _), (b, _)| {
                a.iter()
                    .zip(b.iter())
                    .map(|(x, y)| x.cmp_sort(y))
                    .find(|o| *o != core::cmp::Ordering::Equal)
                    .unwrap_or(core::cmp::Ordering::Equal)
            });
            filtered = keyed.into_iter().map(|(_, combo)| combo).collect();
        }

        let mut rows = Vec::with_capacity(filtered.len());
        for combo in &filtered {
            rows.push(project(select, combo)?);
        }

        if select.distinct {
            let mut seen = HashSet::new();
            rows.retain(|row| seen.insert(key_string(row.columns().map(|(_, v)| v))));
        }

        if let Some(limit) = select.limit {
            rows.truncate(limit as usize);
        }

        Ok(rows)
    }
}
