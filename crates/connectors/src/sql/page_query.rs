use crate::{error::DbError, query::PageQuery, sql::executor::SqlExecutor};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use planner::{
    count_all,
    query::{
        ast::{common::OrderDir, expr::Expr, select::{OrderByExpr, Select}},
        builder::select::SelectBuilder,
        renderer::to_sql,
        value,
    },
};
use tracing::debug;

const COUNT_COLUMN: &str = "count";
const COUNT_SUBQUERY_ALIAS: &str = "page_count";

/// A `Select` AST bound to an executor.
pub struct SqlPageQuery<'a, E: SqlExecutor> {
    executor: &'a E,
    select: Select,
}

impl<'a, E: SqlExecutor> SqlPageQuery<'a, E> {
    pub fn new(executor: &'a E, select: Select) -> Self {
        Self { executor, select }
    }

    pub fn select(&self) -> &Select {
        &self.select
    }

    /// Renders the current query for the executor's dialect.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        to_sql(&self.select, self.executor.dialect())
    }

    fn count_query(&self) -> Select {
        let mut base = self.select.clone();
        base.order_by.clear();
        base.limit = None;

        SelectBuilder::new()
            .select(vec![count_all!(COUNT_COLUMN)])
            .from_subquery(base, COUNT_SUBQUERY_ALIAS)
            .build()
    }
}

#[async_trait]
impl<'a, E: SqlExecutor> PageQuery for SqlPageQuery<'a, E> {
    fn append_condition(&mut self, condition: Expr) {
        self.select.and_where(condition);
    }

    fn append_order_by(&mut self, expr: Expr, direction: OrderDir) {
        self.select.order_by.push(OrderByExpr {
            expr,
            direction: Some(direction),
        });
    }

    fn set_limit(&mut self, limit: usize) {
        self.select.limit = Some(value(Value::Uint(limit as u64)));
    }

    async fn execute(&self) -> Result<Vec<RowData>, DbError> {
        let (sql, params) = self.to_sql();
        debug!(%sql, params = params.len(), "Executing page query");
        self.executor.query_params(&sql, params).await
    }

    async fn count_all(&self) -> Result<u64, DbError> {
        let (sql, params) = to_sql(&self.count_query(), self.executor.dialect());
        debug!(%sql, "Executing count query");

        let rows = self.executor.query_params(&sql, params).await?;
        let count = rows
            .first()
            .map(|row| row.get_value(COUNT_COLUMN))
            .and_then(|v| v.as_i64())
            .ok_or_else(|| DbError::Decode("count query returned no count".to_string()))?;

        u64::try_from(count).map_err(|_| DbError::Decode(format!("negative count {count}")))
    }
}
