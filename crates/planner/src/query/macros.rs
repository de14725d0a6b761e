#[macro_export]
macro_rules! value {
    ($val:expr) => {
        $crate::query::ast::expr::Expr::Value($val)
    };
}

#[macro_export]
macro_rules! table_ref {
    ($name:expr) => {
        $crate::query::ast::common::TableRef {
            schema: None,
            name: $name.to_string(),
        }
    };
    ($schema:expr, $name:expr) => {
        $crate::query::ast::common::TableRef {
            schema: Some($schema.to_string()),
            name: $name.to_string(),
        }
    };
}

#[macro_export]
macro_rules! ident {
    ($name:expr) => {
        $crate::query::ast::expr::Expr::Identifier($crate::query::ast::expr::Ident {
            qualifier: None,
            name: $name.to_string(),
        })
    };
    ($qualifier:expr, $name:expr) => {
        $crate::query::ast::expr::Expr::Identifier($crate::query::ast::expr::Ident {
            qualifier: Some($qualifier.to_string()),
            name: $name.to_string(),
        })
    };
}

/// `COUNT(*)`, optionally aliased: `count_all!()` or `count_all!("total")`.
#[macro_export]
macro_rules! count_all {
    () => {
        $crate::query::ast::expr::Expr::FunctionCall($crate::query::ast::expr::FunctionCall {
            name: "COUNT".to_string(),
            args: vec![],
            wildcard: true,
        })
    };
    ($alias:expr) => {
        $crate::query::ast::expr::Expr::Alias {
            expr: Box::new($crate::count_all!()),
            alias: $alias.to_string(),
        }
    };
}
