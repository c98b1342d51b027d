//! Alias extenders and closure-built extenders.

use serde_json::json;

use hookable::prelude::*;

use crate::helpers::{Log, recorder};

fn echo(invoke: Invoke<Log>) -> Invoke<Log> {
    invoke
}

#[tokio::test]
async fn test_alias_map_registers_under_target_types() {
    let hookable = Hookable::with_options(
        echo,
        HookableOptions::new().extender(
            AliasExtender::from_value(&json!({ "pre": "before", "post": "after" })).unwrap(),
        ),
    );
    hookable
        .on("pre", recorder("pre"))
        .unwrap()
        .on("post", recorder("post"))
        .unwrap();

    let log = Log::default();
    hookable.func().invoke("after", log.clone(), "synchronous").await.unwrap();
    hookable.func().invoke("before", log.clone(), "synchronous").await.unwrap();
    assert_eq!(*log.lock(), vec!["post", "pre"]);
}

#[tokio::test]
async fn test_alias_list_uses_hook_types_as_entry_points() {
    let hookable = Hookable::with_options(
        echo,
        HookableOptions::new().extender(create_extender(TypeSpec::list(["before", "after"]))),
    );
    hookable.on("before", recorder("h1")).unwrap();

    let log = Log::default();
    hookable.func().invoke("before", log.clone(), "sequence").await.unwrap();
    assert_eq!(*log.lock(), vec!["h1"]);
    assert_eq!(hookable.aliases(), vec!["before", "after"]);
}

#[test]
fn test_unknown_alias_and_bad_spec_fail() {
    let hookable = Hookable::with_options(
        echo,
        HookableOptions::new().extender(create_extender(TypeSpec::list(["before"]))),
    );
    let err = hookable.on("after", recorder("h1")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownAlias);

    let err = AliasExtender::from_value(&json!("before")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTypeSpec);
    assert_eq!(
        err.message,
        "Extender expected an array or map of hook types, but received [\"before\"]"
    );
}

/// Namespaced registration: `lifecycle.start(..)` and `lifecycle.stop(..)`.
struct Lifecycle {
    registrar: Registrar<Log, FunctionHookStore<Log>>,
}

impl Lifecycle {
    fn start(&self, hook: Hook<Log>) -> HookResult<&Self> {
        self.registrar.add("lifecycle:start", hook)?;
        Ok(self)
    }

    fn stop(&self, hook: Hook<Log>) -> HookResult<&Self> {
        self.registrar.add("lifecycle:stop", hook)?;
        Ok(self)
    }
}

#[tokio::test]
async fn test_closure_extender_attaches_custom_methods() {
    let hookable = Hookable::with_options(
        echo,
        HookableOptions::new().extender(extender_fn(|registrar| Lifecycle { registrar })),
    );
    hookable
        .start(recorder("boot"))
        .unwrap()
        .stop(recorder("shutdown"))
        .unwrap();

    let log = Log::default();
    hookable.func().invoke("lifecycle:start", log.clone(), "synchronous").await.unwrap();
    hookable.func().invoke("lifecycle:stop", log.clone(), "synchronous").await.unwrap();
    assert_eq!(*log.lock(), vec!["boot", "shutdown"]);

    let copy = hookable.try_clone().unwrap();
    copy.start(recorder("copy")).unwrap();
    assert_eq!(hookable.hook_store().count("lifecycle:start"), 1);
    assert_eq!(copy.hook_store().count("lifecycle:start"), 2);
}
