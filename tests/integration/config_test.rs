//! Hookables configured from TOML documents.

use std::time::Duration;

use tokio::time::Instant;

use hookable::prelude::*;

use crate::helpers::{Generate, MockDirectory, Shared, rows_catalog, rows_factory, sample_order};

fn configured(document: &str) -> (HookableConfig, Hookable<Generate, Shared>) {
    let config = HookableConfig::from_toml(document).expect("parse");
    let generate = Hookable::with_options(
        rows_factory,
        HookableOptions::new().apply_config(&config.invocation),
    );
    (config, generate)
}

const BINDINGS: &str = r#"
[invocation]
parallel_limit = 1

[hooks]
before = ["fetch_user", "fetch_items"]
each_item = ["add_customer", "add_pricing"]
after = "cal_summary"
"#;

#[tokio::test(start_paused = true)]
async fn test_bindings_and_parallel_limit_from_config() {
    let directory = MockDirectory::new();
    let (config, generate) = configured(BINDINGS);
    generate
        .bind(config.hooks.as_ref().unwrap(), &rows_catalog(directory.clone()))
        .unwrap();

    assert_eq!(generate.hook_store().count("before"), 2);
    assert_eq!(generate.hook_store().count("each_item"), 2);
    assert_eq!(generate.hook_store().count("after"), 1);

    let started = Instant::now();
    let report = (generate.func())(sample_order()).await.unwrap();

    // One at a time: 50ms + 20ms.
    assert!(started.elapsed() >= Duration::from_millis(70));
    assert_eq!(directory.user_calls(), 1);
    assert_eq!(directory.item_calls(), 1);
    assert_eq!(report.rows[1].customer.as_deref(), Some("Ada"));
    assert!(report.summary.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_unlimited_parallel_by_default() {
    let directory = MockDirectory::new();
    let (config, generate) = configured(
        r#"
        [hooks]
        before = ["fetch_user", "fetch_items"]
        "#,
    );
    assert_eq!(config.invocation.parallel_limit, None);
    generate
        .bind(config.hooks.as_ref().unwrap(), &rows_catalog(directory))
        .unwrap();

    let started = Instant::now();
    (generate.func())(sample_order()).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(60));
}

#[test]
fn test_malformed_bindings_are_rejected() {
    let directory = MockDirectory::new();

    let (config, generate) = configured(
        r#"
        [hooks]
        before = 3
        "#,
    );
    let err = generate
        .bind(config.hooks.as_ref().unwrap(), &rows_catalog(directory.clone()))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidHookShape);
    assert!(err.message.contains("[before]"));

    let (config, generate) = configured(
        r#"
        [hooks]
        after = ["cal_summary", "cal_average"]
        "#,
    );
    let err = generate
        .bind(config.hooks.as_ref().unwrap(), &rows_catalog(directory))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownHook);
    assert_eq!(err.message, "No hook named [cal_average] in catalog");
}

#[test]
fn test_invocation_flags_from_config() {
    let (_, generate) = configured(
        r#"
        [invocation]
        clone = false
        expose_invoke = true
        "#,
    );
    assert!(generate.invoke_handle().is_some());
    assert_eq!(generate.try_clone().unwrap_err().kind, ErrorKind::CloneDisabled);

    let (_, generate) = configured("");
    assert!(generate.invoke_handle().is_none());
    assert!(generate.try_clone().is_ok());
}

#[tokio::test]
async fn test_exposed_invoke_runs_hooks_outside_the_function() {
    let (config, generate) = configured(
        r#"
        [invocation]
        expose_invoke = true

        [hooks]
        after = "cal_summary"
        "#,
    );
    generate
        .bind(config.hooks.as_ref().unwrap(), &rows_catalog(MockDirectory::new()))
        .unwrap();

    let shared = Shared::default();
    let outcome = generate
        .invoke_handle()
        .unwrap()
        .invoke("after", shared.clone(), "synchronous")
        .await
        .unwrap();
    assert!(outcome.is_some());
    assert_eq!(shared.lock().summary.as_ref().map(|s| s.quantity), Some(0));
}

#[test]
fn test_extender_aliases_keep_file_order() {
    let config = HookableConfig::from_toml(
        r#"
        [extender]
        use = "request"
        mount = "request"
        after_response = "response"
        "#,
    )
    .expect("parse");

    let extender = AliasExtender::from_value(config.extender.as_ref().unwrap()).unwrap();
    assert_eq!(
        extender.type_spec().alias_names(),
        vec!["use", "mount", "after_response"]
    );
}
