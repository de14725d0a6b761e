//! Evaluates `Expr` trees against in-memory rows with SQL semantics: any
//! comparison involving NULL is unknown, and unknown never passes a filter.

use crate::error::DbError;
use model::{core::value::Value, records::row::RowData};
use planner::query::ast::{
    common::OrderDir,
    expr::{BinaryOp, BinaryOperator, Expr, Ident},
};
use std::cmp::Ordering;

/// Table names an identifier qualifier may refer to.
pub(crate) struct Scope<'a> {
    pub table: &'a str,
    pub alias: Option<&'a str>,
}

impl Scope<'_> {
    fn column(&self, ident: &Ident, row: &RowData) -> Result<Value, DbError> {
        if let Some(qualifier) = &ident.qualifier {
            let known = qualifier == self.table || Some(qualifier.as_str()) == self.alias;
            if !known {
                return Err(DbError::QueryBuildError(format!(
                    "unknown table reference `{qualifier}`"
                )));
            }
        }

        row.get(&ident.name)
            .map(|field| field.value.clone().unwrap_or(Value::Null))
            .ok_or_else(|| DbError::QueryBuildError(format!("unknown column `{}`", ident.name)))
    }

    pub fn scalar(&self, expr: &Expr, row: &RowData) -> Result<Value, DbError> {
        match expr {
            Expr::Identifier(ident) => self.column(ident, row),
            Expr::Value(value) => Ok(value.clone()),
            Expr::Literal(raw) => literal(raw),
            Expr::BinaryOp(op) => Ok(self
                .truth_of(op, row)?
                .map(Value::Boolean)
                .unwrap_or(Value::Null)),
            Expr::Alias { expr, .. } => self.scalar(expr, row),
            Expr::FunctionCall(func) => Err(DbError::QueryBuildError(format!(
                "function `{}` is not supported in memory",
                func.name
            ))),
        }
    }

    /// Three-valued truth: `None` is SQL UNKNOWN.
    pub fn truth(&self, expr: &Expr, row: &RowData) -> Result<Option<bool>, DbError> {
        match expr {
            Expr::BinaryOp(op) => self.truth_of(op, row),
            other => match self.scalar(other, row)? {
                Value::Boolean(b) => Ok(Some(b)),
                Value::Null => Ok(None),
                v => Err(DbError::QueryBuildError(format!(
                    "expected a boolean condition, got {v}"
                ))),
            },
        }
    }

    fn truth_of(&self, op: &BinaryOp, row: &RowData) -> Result<Option<bool>, DbError> {
        match op.op {
            BinaryOperator::And => {
                let (l, r) = (self.truth(&op.left, row)?, self.truth(&op.right, row)?);
                Ok(match (l, r) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                })
            }
            BinaryOperator::Or => {
                let (l, r) = (self.truth(&op.left, row)?, self.truth(&op.right, row)?);
                Ok(match (l, r) {
                    (Some(true), _) | (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                })
            }
            cmp => {
                let left = self.scalar(&op.left, row)?;
                let right = self.scalar(&op.right, row)?;
                if left.is_null() || right.is_null() {
                    return Ok(None);
                }
                let ordering = left.compare(&right).ok_or_else(|| {
                    DbError::QueryBuildError(format!("cannot compare {left} with {right}"))
                })?;
                Ok(Some(matches_ordering(cmp, ordering)))
            }
        }
    }

    /// Row ordering for ORDER BY: NULLs sort as larger than any value, so they
    /// come last ascending and first descending.
    pub fn compare_rows(
        &self,
        order_by: &[(Expr, OrderDir)],
        a: &RowData,
        b: &RowData,
    ) -> Result<Ordering, DbError> {
        for (expr, dir) in order_by {
            let (va, vb) = (self.scalar(expr, a)?, self.scalar(expr, b)?);
            let ordering = match (va.is_null(), vb.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => va.compare(&vb).unwrap_or(Ordering::Equal),
            };
            let ordering = match dir {
                OrderDir::Asc => ordering,
                OrderDir::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }
}

fn matches_ordering(op: BinaryOperator, ordering: Ordering) -> bool {
    match op {
        BinaryOperator::Eq => ordering.is_eq(),
        BinaryOperator::NotEq => ordering.is_ne(),
        BinaryOperator::Lt => ordering.is_lt(),
        BinaryOperator::LtEq => ordering.is_le(),
        BinaryOperator::Gt => ordering.is_gt(),
        BinaryOperator::GtEq => ordering.is_ge(),
        BinaryOperator::And | BinaryOperator::Or => false,
    }
}

fn literal(raw: &str) -> Result<Value, DbError> {
    match raw.to_ascii_uppercase().as_str() {
        "TRUE" => Ok(Value::Boolean(true)),
        "FALSE" => Ok(Value::Boolean(false)),
        "NULL" => Ok(Value::Null),
        _ => Err(DbError::QueryBuildError(format!(
            "literal `{raw}` is not supported in memory"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::{ident, query::value};

    const SCOPE: Scope<'static> = Scope {
        table: "users",
        alias: Some("u"),
    };

    fn row(id: i64, name: Option<&str>) -> RowData {
        RowData::from_pairs(
            "users",
            [
                ("id", Value::Int(id)),
                ("name", name.map(Value::from).unwrap_or(Value::Null)),
            ],
        )
    }

    fn cmp(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
        Expr::binary(left, op, right)
    }

    #[test]
    fn test_comparison_with_null_is_unknown() {
        let expr = cmp(ident!("name"), BinaryOperator::Gt, value(Value::from("a")));
        assert_eq!(SCOPE.truth(&expr, &row(1, None)).unwrap(), None);
        assert_eq!(SCOPE.truth(&expr, &row(1, Some("b"))).unwrap(), Some(true));
    }

    #[test]
    fn test_three_valued_logic() {
        let unknown = cmp(ident!("name"), BinaryOperator::Eq, value(Value::from("x")));
        let yes = cmp(ident!("u", "id"), BinaryOperator::Eq, value(Value::Int(1)));
        let no = cmp(ident!("users", "id"), BinaryOperator::Eq, value(Value::Int(2)));
        let r = row(1, None);

        assert_eq!(SCOPE.truth(&unknown.clone().or(yes.clone()), &r).unwrap(), Some(true));
        assert_eq!(SCOPE.truth(&unknown.clone().and(no.clone()), &r).unwrap(), Some(false));
        assert_eq!(SCOPE.truth(&unknown.clone().and(yes), &r).unwrap(), None);
        assert_eq!(SCOPE.truth(&unknown.or(no), &r).unwrap(), None);
    }

    #[test]
    fn test_unknown_references_fail() {
        let r = row(1, None);
        assert!(SCOPE.scalar(&ident!("missing"), &r).is_err());
        assert!(SCOPE.scalar(&ident!("p", "id"), &r).is_err());
    }

    #[test]
    fn test_nulls_sort_last_ascending_first_descending() {
        let (a, b) = (row(1, None), row(2, Some("x")));
        let asc = [(ident!("name"), OrderDir::Asc)];
        let desc = [(ident!("name"), OrderDir::Desc)];
        assert_eq!(SCOPE.compare_rows(&asc, &a, &b).unwrap(), Ordering::Greater);
        assert_eq!(SCOPE.compare_rows(&desc, &a, &b).unwrap(), Ordering::Less);
    }
}
