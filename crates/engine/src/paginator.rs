use crate::error::PaginateError;
use connectors::query::PageQuery;
use model::{
    pagination::{
        codec::CursorCodec,
        cursor::Cursor,
        request::{Direction, PageRequest, PaginationKeys},
        result::PageResult,
    },
    records::row::RowData,
};
use planner::{
    keyset::{OrderPlanner, PredicateBuilder},
    query::column,
};
use tracing::debug;

/// Runs one keyset page request against a query handle.
///
/// One extra row beyond the limit is fetched to tell whether more rows exist
/// in the traversal direction; it is dropped before the page is returned.
/// Pages are independent reads, so concurrent writes between requests can
/// shift rows across page boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paginator {
    codec: CursorCodec,
}

impl Paginator {
    pub fn new(codec: CursorCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &CursorCodec {
        &self.codec
    }

    pub async fn paginate<Q: PageQuery>(
        &self,
        request: &PageRequest,
        mut query: Q,
    ) -> Result<PageResult, PaginateError> {
        let keys = request.keys();
        self.codec.validate_keys(keys)?;

        let direction = request.direction();
        let planner = OrderPlanner::new(request.order(), direction);
        debug!(?direction, order = ?request.order(), limit = request.limit(), "Paginating");

        // Decode before touching the executor so a bad token fails fast.
        let cursor_values = request
            .active_cursor()
            .map(|cursor| self.codec.decode(keys, cursor))
            .transpose()?;

        let count = if request.with_count() {
            Some(query.count_all().await?)
        } else {
            None
        };

        if let Some(values) = cursor_values {
            let predicate = PredicateBuilder::new(keys, request.alias())
                .build(&values, planner.comparison_operator());
            if let Some(predicate) = predicate {
                query.append_condition(predicate);
            }
        }

        let dir = planner.order_dir();
        for key in keys {
            query.append_order_by(column(request.alias(), &key.name), dir);
        }

        let limit = request.limit();
        query.set_limit(limit.saturating_add(1));

        let mut rows = query.execute().await?;
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        if planner.reverses() {
            rows.reverse();
        }
        debug!(rows = rows.len(), has_more, "Fetched page");

        let (after_cursor, before_cursor) = self.edge_cursors(keys, &rows, direction, has_more)?;

        Ok(PageResult {
            items: rows,
            after_cursor,
            before_cursor,
            count,
        })
    }

    /// Tokens for the page edges.
    ///
    /// `after` is emitted when paging backward or when more rows follow;
    /// `before` when paging forward or when paging backward with more rows
    /// ahead. An empty page has neither.
    fn edge_cursors(
        &self,
        keys: &PaginationKeys,
        rows: &[RowData],
        direction: Direction,
        has_more: bool,
    ) -> Result<(Option<Cursor>, Option<Cursor>), PaginateError> {
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return Ok((None, None));
        };

        let backward = direction == Direction::Backward;
        let emit_after = backward || has_more;
        let emit_before = direction == Direction::Forward || (has_more && backward);

        let after = emit_after
            .then(|| self.codec.encode(keys, last))
            .transpose()?;
        let before = emit_before
            .then(|| self.codec.encode(keys, first))
            .transpose()?;
        Ok((after, before))
    }
}
