//! Declarative query description.
//!
//! `Select` is a plain value: every builder method consumes the receiver and
//! returns a new value, so a query template can be shared and extended per
//! call site without a mutable accumulator.

use serde::{Deserialize, Serialize};

use vitrine_core::{
    AttributeId, CategoryId, CustomerGroupId, ProductId, ProductType, StoreId, WebsiteId,
};

/// A scalar bound into a query or carried in a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl Value {
    /// Numeric equality crosses the int/float divide; everything else is
    /// strict. `Null` never equals anything, including itself.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }

    /// Total ordering for sorting result rows: nulls first, then numbers,
    /// then strings.
    pub fn cmp_sort(&self, other: &Value) -> core::cmp::Ordering {
        use core::cmp::Ordering;
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Int(_) | Value::Float(_) => 1,
                Value::Str(_) => 2,
            }
        }
        fn numeric(v: &Value) -> f64 {
            match v {
                Value::Int(i) => *i as f64,
                Value::Float(f) => *f,
                _ => 0.0,
            }
        }
        match rank(self).cmp(&rank(other)) {
            Ordering::Equal => match (self, other) {
                (Value::Str(a), Value::Str(b)) => a.cmp(b),
                (Value::Null, Value::Null) => Ordering::Equal,
                _ => numeric(self)
                    .partial_cmp(&numeric(other))
                    .unwrap_or(Ordering::Equal),
            },
            unequal => unequal,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<ProductType> for Value {
    fn from(value: ProductType) -> Self {
        Value::Str(value.as_str().to_string())
    }
}

macro_rules! impl_value_from_id {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Int(value.get())
                }
            }
        )*
    };
}

impl_value_from_id!(ProductId, CategoryId, WebsiteId, StoreId, AttributeId, CustomerGroupId);

/// A where-clause predicate. Columns are referenced as `alias.column` or,
/// when unambiguous, bare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Eq(String, Value),
    Gt(String, Value),
    In(String, Vec<Value>),
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq(column.into(), value.into())
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Gt(column.into(), value.into())
    }

    pub fn in_list<I>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Predicate::In(column.into(), values.into_iter().map(Into::into).collect())
    }
}

/// An inner join: on-conditions are column-equality pairs, projected columns
/// are `(source column, output name)` pairs and default to none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub table: String,
    pub alias: String,
    pub on: Vec<(String, String)>,
    pub columns: Vec<(String, String)>,
}

/// Declarative description of one read query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub table: String,
    pub alias: String,
    /// `(column, output name)` pairs; empty means all base-table columns.
    pub columns: Vec<(String, String)>,
    pub joins: Vec<Join>,
    pub predicates: Vec<Predicate>,
    pub group_by: Vec<String>,
    pub order_by: Vec<String>,
    pub limit: Option<u64>,
    pub distinct: bool,
}

impl Select {
    pub fn from_table(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            predicates: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            distinct: false,
        }
    }

    /// Project the given base-table columns under their own names.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            let column = column.into();
            self.columns.push((column.clone(), column));
        }
        self
    }

    pub fn join(self, table: impl Into<String>, alias: impl Into<String>, on: &[(&str, &str)]) -> Self {
        self.join_columns(table, alias, on, &[])
    }

    pub fn join_columns(
        mut self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: &[(&str, &str)],
        columns: &[(&str, &str)],
    ) -> Self {
        self.joins.push(Join {
            table: table.into(),
            alias: alias.into(),
            on: on
                .iter()
                .map(|(l, r)| ((*l).to_string(), (*r).to_string()))
                .collect(),
            columns: columns
                .iter()
                .map(|(c, n)| ((*c).to_string(), (*n).to_string()))
                .collect(),
        });
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by.push(column.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}
