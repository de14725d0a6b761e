use crate::{pagination::cursor::Cursor, records::row::RowData};
use serde::Serialize;

/// One page of rows plus the tokens that continue from its edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub items: Vec<RowData>,

    /// Continues after the last item; `None` when nothing follows it.
    pub after_cursor: Option<Cursor>,

    /// Continues before the first item; `None` when nothing precedes it.
    pub before_cursor: Option<Cursor>,

    /// Rows matching the base query, when a count was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl PageResult {
    pub fn empty(count: Option<u64>) -> Self {
        PageResult {
            items: Vec::new(),
            after_cursor: None,
            before_cursor: None,
            count,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
