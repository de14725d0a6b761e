use crate::query::ast::{common::OrderDir, expr::BinaryOperator};
use model::pagination::request::{BaseOrder, Direction};

/// Derives the SQL ordering and comparison operator for a traversal.
///
/// Backward traversal queries in the opposite order so that the rows nearest
/// the cursor come first; the caller reverses them afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPlanner {
    base: BaseOrder,
    direction: Direction,
}

impl OrderPlanner {
    pub fn new(base: BaseOrder, direction: Direction) -> Self {
        Self { base, direction }
    }

    pub fn effective_order(&self) -> BaseOrder {
        match self.direction {
            Direction::Backward => self.base.flip(),
            Direction::Forward | Direction::None => self.base,
        }
    }

    pub fn order_dir(&self) -> OrderDir {
        match self.effective_order() {
            BaseOrder::Ascending => OrderDir::Asc,
            BaseOrder::Descending => OrderDir::Desc,
        }
    }

    /// `=` is returned when there is no cursor; it is never used to build a
    /// boundary.
    pub fn comparison_operator(&self) -> BinaryOperator {
        match (self.direction, self.base) {
            (Direction::None, _) => BinaryOperator::Eq,
            (Direction::Forward, BaseOrder::Ascending) => BinaryOperator::Gt,
            (Direction::Forward, BaseOrder::Descending) => BinaryOperator::Lt,
            (Direction::Backward, BaseOrder::Ascending) => BinaryOperator::Lt,
            (Direction::Backward, BaseOrder::Descending) => BinaryOperator::Gt,
        }
    }

    /// Whether fetched rows must be reversed to restore the base order.
    pub fn reverses(&self) -> bool {
        self.direction == Direction::Backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_order() {
        let (asc, desc) = (BaseOrder::Ascending, BaseOrder::Descending);
        let cases = [
            (asc, Direction::None, asc),
            (asc, Direction::Forward, asc),
            (asc, Direction::Backward, desc),
            (desc, Direction::None, desc),
            (desc, Direction::Forward, desc),
            (desc, Direction::Backward, asc),
        ];
        for (base, direction, expected) in cases {
            assert_eq!(
                OrderPlanner::new(base, direction).effective_order(),
                expected,
                "{base:?}/{direction:?}"
            );
        }
    }

    #[test]
    fn test_comparison_operator() {
        let cases = [
            (BaseOrder::Ascending, Direction::Forward, BinaryOperator::Gt),
            (BaseOrder::Descending, Direction::Forward, BinaryOperator::Lt),
            (BaseOrder::Ascending, Direction::Backward, BinaryOperator::Lt),
            (BaseOrder::Descending, Direction::Backward, BinaryOperator::Gt),
            (BaseOrder::Ascending, Direction::None, BinaryOperator::Eq),
            (BaseOrder::Descending, Direction::None, BinaryOperator::Eq),
        ];
        for (base, direction, expected) in cases {
            assert_eq!(OrderPlanner::new(base, direction).comparison_operator(), expected);
        }
    }

    #[test]
    fn test_order_dir_and_reversal() {
        let planner = OrderPlanner::new(BaseOrder::Descending, Direction::Backward);
        assert_eq!(planner.order_dir(), OrderDir::Asc);
        assert!(planner.reverses());
        assert!(!OrderPlanner::new(BaseOrder::Descending, Direction::Forward).reverses());
    }
}
