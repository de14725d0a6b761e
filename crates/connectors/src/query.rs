use crate::error::DbError;
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::ast::{common::OrderDir, expr::Expr};

/// A base query the paginator can narrow, order and limit before running it.
///
/// Implementations start from the caller's query (filters, joins, projection)
/// and append to it; existing conditions are kept and ANDed with new ones.
#[async_trait]
pub trait PageQuery: Send + Sync {
    fn append_condition(&mut self, condition: Expr);

    /// Appends after any ordering already on the query.
    fn append_order_by(&mut self, expr: Expr, direction: OrderDir);

    fn set_limit(&mut self, limit: usize);

    async fn execute(&self) -> Result<Vec<RowData>, DbError>;

    /// Counts the rows matched by the current conditions, ignoring ordering
    /// and limit.
    async fn count_all(&self) -> Result<u64, DbError>;
}
