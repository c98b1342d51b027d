//! End-to-end row generation with hooks before, inside and after the loop.

use std::time::Duration;

use tokio::time::Instant;

use hookable::prelude::*;

use crate::helpers::{
    MockDirectory, Shared, add_customer, add_pricing, assert_amount, cal_summary,
    fetch_items, fetch_user, row_generator, sample_order,
};

#[tokio::test(start_paused = true)]
async fn test_rows_carry_fields_from_every_hook() {
    let directory = MockDirectory::new();
    let generate = row_generator();
    generate
        .hooks(hook_map! {
            "before" => [fetch_user(directory.clone()), fetch_items(directory.clone())],
            "each_item" => [add_customer(), add_pricing()],
            "after" => cal_summary(),
        })
        .unwrap();

    let started = Instant::now();
    let report = (generate.func())(sample_order()).await.unwrap();

    // Both lookups overlap: 50ms, not 70ms.
    assert!(started.elapsed() < Duration::from_millis(60));
    assert_eq!(directory.user_calls(), 1);
    assert_eq!(directory.item_calls(), 1);

    assert_eq!(report.rows.len(), 2);
    for row in &report.rows {
        assert_eq!(row.customer.as_deref(), Some("Ada"));
        assert!(row.title.is_some());
    }
    assert_amount(report.rows[0].amount, 18.0);
    assert_amount(report.rows[1].amount, 9.0);

    let summary = report.summary.unwrap();
    assert_eq!(
        summary.quantity,
        report.rows.iter().map(|row| row.quantity).sum::<u32>()
    );
    assert_amount(summary.amount, report.rows.iter().map(|row| row.amount).sum());
}

#[tokio::test]
async fn test_rows_without_hooks_are_bare() {
    let report = (row_generator().func())(sample_order()).await.unwrap();

    assert_eq!(report.rows.len(), 2);
    assert!(report.rows.iter().all(|row| row.customer.is_none() && row.amount == 0.0));
    assert!(report.summary.is_none());
}

#[tokio::test]
async fn test_each_item_break_skips_later_transforms() {
    let directory = MockDirectory::new();
    let generate = row_generator();
    generate
        .hook("before", fetch_user(directory))
        .unwrap()
        .hook(
            "each_item",
            Hook::blocking(|shared: &Shared| {
                let context = shared.lock();
                match context.rows.last() {
                    Some(row) if row.sku == "B-2" => HookOutcome::Break,
                    _ => HookOutcome::Continue,
                }
            }),
        )
        .unwrap()
        .hook("each_item", add_customer())
        .unwrap();

    let report = (generate.func())(sample_order()).await.unwrap();
    assert_eq!(report.rows[0].customer.as_deref(), Some("Ada"));
    assert_eq!(report.rows[1].customer, None);
}

#[tokio::test]
async fn test_failing_before_hook_aborts_generation() {
    let generate = row_generator();
    generate
        .hook("before", fetch_user(MockDirectory::new()))
        .unwrap()
        .hook("each_item", add_customer())
        .unwrap();

    let mut order = sample_order();
    order.user_id = 99;

    let err = (generate.func())(order).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::HookFailed);
    assert_eq!(err.message, "No user [99]");
}

#[tokio::test]
async fn test_registering_same_hook_twice_runs_it_once() {
    let directory = MockDirectory::new();
    let lookup = fetch_user(directory.clone());
    let generate = row_generator();
    generate
        .hook("before", lookup.clone())
        .unwrap()
        .hook("before", lookup)
        .unwrap();

    (generate.func())(sample_order()).await.unwrap();
    assert_eq!(directory.user_calls(), 1);
    assert_eq!(generate.hook_store().count("before"), 1);
}

#[tokio::test]
async fn test_blocking_hook_point_rejects_future_hooks() {
    let generate = row_generator();
    generate
        .hook("each_item", fetch_items(MockDirectory::new()))
        .unwrap();

    let err = (generate.func())(sample_order()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::IncompatibleHook);
}
