use crate::{error::PaginateError, paginator::Paginator};
use chrono::{Duration, TimeZone, Utc};
use connectors::memory::{MemoryPageQuery, MemoryTable};
use model::{
    core::value::Value,
    pagination::{
        cursor::Cursor,
        error::PaginationError,
        request::{BaseOrder, PageRequest, PaginationKeys},
        result::PageResult,
    },
    records::row::RowData,
};
use planner::{
    ident,
    query::{ast::expr::{BinaryOperator, Expr}, value},
};
use tracing_test::traced_test;

fn numbered_table(n: i64) -> MemoryTable {
    let rows = (1..=n)
        .map(|id| {
            RowData::from_pairs(
                "users",
                [("id", Value::Int(id)), ("name", Value::from(format!("user {id}")))],
            )
        })
        .collect();
    MemoryTable::new("users", rows)
}

/// Rows where `score` repeats so that `id` has to break ties.
fn scored_table() -> MemoryTable {
    let scores = [3, 1, 2, 3, 1, 2, 3, 1, 2, 3, 2];
    let rows = scores
        .iter()
        .zip(1..)
        .map(|(score, id)| {
            RowData::from_pairs("scores", [("score", Value::Int(*score)), ("id", Value::Int(id))])
        })
        .collect();
    MemoryTable::new("scores", rows)
}

fn ids(page: &PageResult) -> Vec<i64> {
    page.items
        .iter()
        .filter_map(|row| row.get_value("id").as_i64())
        .collect()
}

fn request(limit: usize, order: BaseOrder) -> model::pagination::request::PageRequestBuilder {
    PageRequest::builder().limit(limit).order(order)
}

async fn fetch(table: &MemoryTable, request: &PageRequest) -> PageResult {
    Paginator::default()
        .paginate(request, table.query())
        .await
        .unwrap()
}

#[tokio::test]
#[traced_test]
async fn test_symmetry_walk_forward_then_back() {
    let table = numbered_table(10);

    let page1 = fetch(&table, &request(1, BaseOrder::Descending).build().unwrap()).await;
    assert_eq!(ids(&page1), vec![10]);
    assert!(page1.before_cursor.is_none());
    assert!(page1.after_cursor.is_some());

    let page2 = fetch(
        &table,
        &request(1, BaseOrder::Descending)
            .after(page1.after_cursor.clone())
            .build()
            .unwrap(),
    )
    .await;
    assert_eq!(ids(&page2), vec![9]);
    assert!(page2.before_cursor.is_some());
    assert!(page2.after_cursor.is_some());

    let page3 = fetch(
        &table,
        &request(1, BaseOrder::Descending)
            .before(page2.before_cursor.clone())
            .build()
            .unwrap(),
    )
    .await;
    assert_eq!(ids(&page3), vec![10]);
    assert!(page3.before_cursor.is_none());
    assert!(page3.after_cursor.is_some());

    assert!(logs_contain("Fetched page"));
}

#[tokio::test]
async fn test_empty_result_has_no_cursors() {
    let table = MemoryTable::new("users", vec![]);
    let page = fetch(&table, &PageRequest::builder().build().unwrap()).await;
    assert!(page.is_empty());
    assert_eq!(page.after_cursor, None);
    assert_eq!(page.before_cursor, None);
}

#[tokio::test]
async fn test_empty_page_past_the_end() {
    let table = numbered_table(3);
    let keys = PaginationKeys::default();
    let beyond = Paginator::default()
        .codec()
        .encode(&keys, &RowData::from_pairs("users", [("id", Value::Int(1))]))
        .unwrap();

    let page = fetch(
        &table,
        &request(5, BaseOrder::Descending).after(Some(beyond)).build().unwrap(),
    )
    .await;
    assert!(page.is_empty());
    assert_eq!((page.after_cursor, page.before_cursor), (None, None));
}

#[tokio::test]
async fn test_order_toggling() {
    let table = numbered_table(10);

    let asc = fetch(&table, &request(1, BaseOrder::Ascending).build().unwrap()).await;
    assert_eq!(ids(&asc), vec![1]);

    let desc = fetch(&table, &request(1, BaseOrder::Descending).build().unwrap()).await;
    assert_eq!(ids(&desc), vec![10]);
}

#[tokio::test]
async fn test_page_size_and_has_more() {
    let table = numbered_table(7);

    for limit in 1..=9 {
        let page = fetch(&table, &request(limit, BaseOrder::Ascending).build().unwrap()).await;
        assert!(page.len() <= limit);
        assert_eq!(page.len(), limit.min(7));
        assert_eq!(page.after_cursor.is_some(), limit < 7, "limit {limit}");
        assert!(page.before_cursor.is_none());
    }
}

#[tokio::test]
async fn test_forward_walk_visits_every_row_once() {
    let table = numbered_table(10);
    let mut seen = Vec::new();
    let mut after: Option<Cursor> = None;

    loop {
        let page = fetch(
            &table,
            &request(3, BaseOrder::Descending).after(after.clone()).build().unwrap(),
        )
        .await;
        seen.extend(ids(&page));
        match page.after_cursor {
            Some(next) => after = Some(next),
            None => break,
        }
    }

    assert_eq!(seen, (1..=10).rev().collect::<Vec<_>>());
}

#[tokio::test]
#[traced_test]
async fn test_composite_key_ties_forward_and_backward() {
    let table = scored_table();
    let keys = PaginationKeys::parse("score:number,id:number").unwrap();
    let build = |after: Option<Cursor>, before: Option<Cursor>| {
        PageRequest::builder()
            .keys(keys.clone())
            .limit(2)
            .order(BaseOrder::Ascending)
            .after(after)
            .before(before)
            .build()
            .unwrap()
    };

    // score asc, id asc
    let expected = vec![2, 5, 8, 3, 6, 9, 11, 1, 4, 7, 10];

    let mut pages = Vec::new();
    let mut after = None;
    loop {
        let page = fetch(&table, &build(after, None)).await;
        after = page.after_cursor.clone();
        pages.push(page);
        if after.is_none() {
            break;
        }
    }
    let forward: Vec<i64> = pages.iter().flat_map(ids).collect();
    assert_eq!(forward, expected);

    // Walk back from the last page to the start.
    let last = pages.last().unwrap();
    let mut backward = ids(last);
    let mut before = last.before_cursor.clone();
    while let Some(cursor) = before {
        let page = fetch(&table, &build(None, Some(cursor))).await;
        let mut chunk = ids(&page);
        chunk.extend(backward);
        backward = chunk;
        before = page.before_cursor.clone();
    }
    assert_eq!(backward, expected);
}

/// Seven events whose `created_at` values repeat in groups, so `id` breaks ties.
fn events_table() -> MemoryTable {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let rows = (1..=7)
        .map(|id: i64| {
            let created_at = base + Duration::milliseconds((id / 3) * 1_250);
            RowData::from_pairs(
                "events",
                [("created_at", Value::Timestamp(created_at)), ("id", Value::Int(id))],
            )
        })
        .collect();
    MemoryTable::new("events", rows)
}

#[tokio::test]
async fn test_date_and_number_keys_walk_both_ways() {
    let table = events_table();
    let keys = PaginationKeys::parse("created_at:date,id:number").unwrap();
    let build = |after: Option<Cursor>, before: Option<Cursor>| {
        PageRequest::builder()
            .keys(keys.clone())
            .limit(2)
            .order(BaseOrder::Descending)
            .after(after)
            .before(before)
            .build()
            .unwrap()
    };

    let expected: Vec<i64> = (1..=7).rev().collect();

    let mut forward = Vec::new();
    let mut after = None;
    let last = loop {
        let page = fetch(&table, &build(after, None)).await;
        forward.extend(ids(&page));
        after = page.after_cursor.clone();
        if after.is_none() {
            break page;
        }
    };
    assert_eq!(forward, expected);

    let mut backward = ids(&last);
    let mut before = last.before_cursor.clone();
    while let Some(cursor) = before {
        let page = fetch(&table, &build(None, Some(cursor))).await;
        let mut chunk = ids(&page);
        chunk.extend(backward);
        backward = chunk;
        before = page.before_cursor.clone();
    }
    assert_eq!(backward, expected);
}

#[tokio::test]
async fn test_malformed_cursor_is_rejected() {
    let table = numbered_table(3);
    let keys = PaginationKeys::default();
    let bad = Cursor::new("aWQ6dGVu"); // "id:ten"

    let err = Paginator::default()
        .paginate(
            &PageRequest::builder().keys(keys).after(Some(bad)).build().unwrap(),
            table.query(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PaginateError::Pagination(PaginationError::InvalidCursor(_))
    ));
}

#[tokio::test]
async fn test_boolean_key_is_unsupported() {
    let table = numbered_table(3);
    let err = Paginator::default()
        .paginate(
            &PageRequest::builder()
                .keys(PaginationKeys::parse("id:bool").unwrap())
                .build()
                .unwrap(),
            table.query(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PaginateError::Pagination(PaginationError::UnsupportedType { .. })
    ));
}

#[tokio::test]
async fn test_base_filter_alias_and_count() {
    let table = numbered_table(10);
    fn above_two(t: &MemoryTable) -> MemoryPageQuery<'_> {
        t.query().alias("u").filter(Expr::binary(
            ident!("u", "id"),
            BinaryOperator::Gt,
            value(Value::Int(2)),
        ))
    }
    let build = |after: Option<Cursor>| {
        PageRequest::builder()
            .alias("u")
            .limit(4)
            .order(BaseOrder::Ascending)
            .with_count(true)
            .after(after)
            .build()
            .unwrap()
    };

    let paginator = Paginator::default();
    let page1 = paginator.paginate(&build(None), above_two(&table)).await.unwrap();
    assert_eq!(ids(&page1), vec![3, 4, 5, 6]);
    assert_eq!(page1.count, Some(8));

    let page2 = paginator
        .paginate(&build(page1.after_cursor.clone()), above_two(&table))
        .await
        .unwrap();
    assert_eq!(ids(&page2), vec![7, 8, 9, 10]);
    assert_eq!(page2.count, Some(8));
    assert!(page2.after_cursor.is_none());
}

#[tokio::test]
async fn test_string_keys_with_delimiters() {
    let rows = ["a,b", "a:b", "a b", "null", "ä"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| RowData::from_pairs("t", [("name", Value::from(name)), ("id", Value::Int(id))]))
        .collect();
    let table = MemoryTable::new("t", rows);
    let keys = PaginationKeys::parse("name:string,id:number").unwrap();

    let mut seen = Vec::new();
    let mut after = None;
    loop {
        let request = PageRequest::builder()
            .keys(keys.clone())
            .limit(1)
            .order(BaseOrder::Ascending)
            .after(after)
            .build()
            .unwrap();
        let page = fetch(&table, &request).await;
        seen.extend(page.items.iter().map(|r| r.get_value("name")));
        after = page.after_cursor;
        if after.is_none() {
            break;
        }
    }

    let expected: Vec<Value> = ["a b", "a,b", "a:b", "null", "ä"].into_iter().map(Value::from).collect();
    assert_eq!(seen, expected);
}
