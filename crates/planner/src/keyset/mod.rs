//! Keyset (seek) pagination: ordering and the boundary predicate that resumes
//! a traversal from a decoded cursor.

pub mod order;
pub mod predicate;

pub use order::OrderPlanner;
pub use predicate::PredicateBuilder;
