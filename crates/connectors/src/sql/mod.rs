pub mod executor;
pub mod page_query;
pub mod postgres;
