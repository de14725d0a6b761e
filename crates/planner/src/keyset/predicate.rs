use crate::query::{
    ast::expr::{BinaryOperator, Expr},
    column, value,
};
use model::pagination::{cursor::CursorValues, request::PaginationKeys};
use tracing::debug;

/// Builds the lexicographic boundary condition for a cursor.
///
/// For keys `k1..kn` with cursor values `v1..vn` and operator `op` the result
/// is the disjunction over `i` of
/// `k1 = v1 AND ... AND k(i-1) = v(i-1) AND ki op vi`. Keys with no value in
/// the cursor are left out of every term.
pub struct PredicateBuilder<'a> {
    keys: &'a PaginationKeys,
    alias: Option<&'a str>,
}

impl<'a> PredicateBuilder<'a> {
    pub fn new(keys: &'a PaginationKeys, alias: Option<&'a str>) -> Self {
        Self { keys, alias }
    }

    /// Returns `None` when the cursor carries no usable value.
    pub fn build(&self, cursor: &CursorValues, op: BinaryOperator) -> Option<Expr> {
        let mut equalities: Vec<Expr> = Vec::new();
        let mut terms: Vec<Expr> = Vec::new();

        for key in self.keys {
            let Some(val) = cursor.get(&key.name) else {
                continue;
            };
            let col = column(self.alias, &key.name);

            let boundary = Expr::binary(col.clone(), op, value(val.clone()));
            let term = Expr::conjunction(equalities.iter().cloned().chain([boundary]));
            terms.extend(term);

            equalities.push(Expr::binary(col, BinaryOperator::Eq, value(val.clone())));
        }

        debug!(terms = terms.len(), "Built keyset predicate");
        Expr::disjunction(terms)
    }
}
