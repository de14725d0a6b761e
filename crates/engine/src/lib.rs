pub mod error;
pub mod paginator;

#[cfg(test)]
mod tests;
