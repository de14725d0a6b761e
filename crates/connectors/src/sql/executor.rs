use crate::error::DbError;
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use planner::query::dialect::Dialect;

/// Runs rendered, parameterized SQL against a live database.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    fn dialect(&self) -> &dyn Dialect;

    async fn query_params(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<RowData>, DbError>;
}
