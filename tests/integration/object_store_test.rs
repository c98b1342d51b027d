//! Hookables backed by the annotated store: selection by code, bindings
//! with codes and alias registration.

use serde_json::json;

use hookable::prelude::*;

use crate::helpers::{Log, recorder};

type Store = ObjectHookStore<Log>;

fn echo(invoke: Invoke<Log, Store>) -> Invoke<Log, Store> {
    invoke
}

fn annotated() -> Hookable<Invoke<Log, Store>, Log, Store> {
    let hookable = Hookable::with_options(echo, HookableOptions::new().hook_store(Store::new()));
    hookable
        .hooks(hook_map! {
            "step" => [
                ObjectHook::new("A", recorder("A")),
                ObjectHook::new("B", recorder("B")),
                ObjectHook::new("C", recorder("C")),
            ],
            "cleanup" => ObjectHook::new("Z", recorder("Z")),
        })
        .unwrap();
    hookable
}

#[tokio::test]
async fn test_selected_codes_run_in_registration_order() {
    let hookable = annotated();
    let log = Log::default();

    hookable
        .func()
        .invoke(
            HookQuery::select().codes("step", ["C", "A"]),
            log.clone(),
            "synchronous",
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*log.lock(), vec!["A", "C"]);
}

#[tokio::test]
async fn test_selection_spans_hook_types_in_listed_order() {
    let hookable = annotated();
    let log = Log::default();

    let query = HookQuery::from_value(&json!({ "cleanup": "*" }))
        .unwrap()
        .codes("step", ["B"]);
    hookable
        .func()
        .invoke(query, log.clone(), "sequence")
        .await
        .unwrap();
    assert_eq!(*log.lock(), vec!["Z", "B"]);

    log.lock().clear();
    hookable.func().invoke("step", log.clone(), "synchronous").await.unwrap();
    assert_eq!(*log.lock(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_selection_without_matches_skips_invoker() {
    let hookable = annotated();
    let outcome = hookable
        .func()
        .invoke(
            HookQuery::select().codes("step", ["Q"]).all("missing"),
            Log::default(),
            "synchronous",
        )
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[test]
fn test_duplicate_codes_keep_the_first_entry() {
    let hookable = annotated();
    hookable
        .hook("step", ObjectHook::new("A", recorder("A again")))
        .unwrap();
    assert_eq!(hookable.hook_store().count("step"), 3);

    let err = hookable
        .hook("step", ObjectHook::new("  ", recorder("blank")))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidHook);
}

#[tokio::test]
async fn test_bindings_carry_codes() {
    let catalog = HookCatalog::new()
        .with("audit", recorder("audit"))
        .with("notify", recorder("notify"));
    let hookable = Hookable::with_options(echo, HookableOptions::new().hook_store(Store::new()));
    hookable
        .bind(
            &json!({
                "after": [
                    { "code": "audit", "do": "audit" },
                    { "code": "notify", "do": "notify" }
                ],
                "before": { "code": "early-audit", "do": "audit" }
            }),
            &catalog,
        )
        .unwrap();

    let log = Log::default();
    hookable
        .func()
        .invoke(
            HookQuery::select().codes("after", ["notify"]).all("before"),
            log.clone(),
            "synchronous",
        )
        .await
        .unwrap();
    assert_eq!(*log.lock(), vec!["notify", "audit"]);

    let err = hookable
        .bind(&json!({ "after": { "do": "audit" } }), &catalog)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidHook);

    let err = hookable
        .bind(&json!({ "after": "audit" }), &catalog)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidHookShape);
}

#[tokio::test]
async fn test_annotated_hooks_behind_aliases() {
    let hookable = Hookable::with_options(
        echo,
        HookableOptions::new()
            .hook_store(Store::new())
            .extender(create_extender(TypeSpec::aliases([("onSave", "save")]))),
    );
    hookable
        .on("onSave", ObjectHook::new("validate", recorder("validate")))
        .unwrap()
        .on("onSave", ObjectHook::new("persist", recorder("persist")))
        .unwrap();

    let log = Log::default();
    hookable
        .func()
        .invoke(HookQuery::select().codes("save", ["persist"]), log.clone(), "synchronous")
        .await
        .unwrap();
    assert_eq!(*log.lock(), vec!["persist"]);
}

#[tokio::test]
async fn test_parsed_selection_keeps_declared_type_order() {
    let hookable = annotated();
    let log = Log::default();

    let query = HookQuery::from_value(&json!({ "step": ["B"], "cleanup": "*" })).unwrap();
    hookable
        .func()
        .invoke(query, log.clone(), "synchronous")
        .await
        .unwrap();
    assert_eq!(*log.lock(), vec!["B", "Z"]);
}
