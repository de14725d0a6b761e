//! An in-memory table that answers page queries without a database, used by
//! tests and local tooling.

use crate::{error::DbError, memory::eval::Scope, query::PageQuery};
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::ast::{common::OrderDir, expr::Expr};
use std::cmp::Ordering;

mod eval;

#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    name: String,
    rows: Vec<RowData>,
}

impl MemoryTable {
    pub fn new(name: impl Into<String>, rows: Vec<RowData>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[RowData] {
        &self.rows
    }

    pub fn insert(&mut self, row: RowData) {
        self.rows.push(row);
    }

    /// Starts a query over every row of the table.
    pub fn query(&self) -> MemoryPageQuery<'_> {
        MemoryPageQuery {
            table: self,
            alias: None,
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }
}

pub struct MemoryPageQuery<'a> {
    table: &'a MemoryTable,
    alias: Option<String>,
    conditions: Vec<Expr>,
    order_by: Vec<(Expr, OrderDir)>,
    limit: Option<usize>,
}

impl MemoryPageQuery<'_> {
    /// Lets identifiers qualify columns with `alias` as well as the table name.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Adds a base filter, as a caller's WHERE clause would.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.conditions.push(condition);
        self
    }

    fn scope(&self) -> Scope<'_> {
        Scope {
            table: self.table.name(),
            alias: self.alias.as_deref(),
        }
    }

    fn matching_rows(&self) -> Result<Vec<&RowData>, DbError> {
        let scope = self.scope();
        let mut matched = Vec::new();
        for row in self.table.rows() {
            let mut keep = true;
            for condition in &self.conditions {
                if scope.truth(condition, row)? != Some(true) {
                    keep = false;
                    break;
                }
            }
            if keep {
                matched.push(row);
            }
        }
        Ok(matched)
    }
}

#[async_trait]
impl<'a> PageQuery for MemoryPageQuery<'a> {
    fn append_condition(&mut self, condition: Expr) {
        self.conditions.push(condition);
    }

    fn append_order_by(&mut self, expr: Expr, direction: OrderDir) {
        self.order_by.push((expr, direction));
    }

    fn set_limit(&mut self, limit: usize) {
        self.limit = Some(limit);
    }

    async fn execute(&self) -> Result<Vec<RowData>, DbError> {
        let mut rows = self.matching_rows()?;

        // sort_by cannot fail; keep the first evaluation error and return it.
        let scope = self.scope();
        let mut failure = None;
        rows.sort_by(|a, b| {
            scope
                .compare_rows(&self.order_by, a, b)
                .unwrap_or_else(|err| {
                    failure.get_or_insert(err);
                    Ordering::Equal
                })
        });
        if let Some(err) = failure {
            return Err(err);
        }

        let limit = self.limit.unwrap_or(rows.len());
        Ok(rows.into_iter().take(limit).cloned().collect())
    }

    async fn count_all(&self) -> Result<u64, DbError> {
        Ok(self.matching_rows()?.len() as u64)
    }
}
