pub mod keyset;
pub mod query;
