//! Request pipeline driven by the middleware invoker, registered through
//! configured aliases.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tracing::info;

use hookable::prelude::*;

/// Request and response state shared along the chain.
#[derive(Debug, Default)]
pub struct Exchange {
    pub path: String,
    pub user: Option<String>,
    pub trail: Vec<&'static str>,
}

pub type SharedExchange = Arc<Mutex<Exchange>>;

type Handle = Box<dyn Fn(&str) -> BoxFuture<'static, HookResult<Option<Value>>> + Send + Sync>;

/// Builds the app; handlers register under `request` through the
/// extender's aliases.
pub fn app(
    config: &HookableConfig,
) -> HookResult<Hookable<Handle, SharedExchange, FunctionHookStore<SharedExchange>, AliasExtender>> {
    let extender = match &config.extender {
        Some(spec) => AliasExtender::from_value(spec)?,
        None => create_extender(TypeSpec::aliases([("use", "request")])),
    };

    Ok(Hookable::with_options(
        |invoke: Invoke<SharedExchange>| -> Handle {
            Box::new(move |path: &str| {
                let invoke = invoke.clone();
                let exchange: SharedExchange = Arc::new(Mutex::new(Exchange {
                    path: path.to_string(),
                    ..Exchange::default()
                }));
                async move {
                    let (tx, rx) = oneshot::channel();
                    let options = InvokeOptions::new().on_complete(move |result| {
                        let _ = tx.send(result);
                    });

                    if invoke
                        .invoke_with("request", exchange, "middleware", options)
                        .await?
                        .is_none()
                    {
                        return Ok(None);
                    }

                    rx.await.map_err(|_| {
                        HookError::hook_failed("Middleware chain ended without completing")
                    })?
                }
                .boxed()
            })
        },
        HookableOptions::new()
            .apply_config(&config.invocation)
            .extender(extender),
    ))
}

fn logger() -> Hook<SharedExchange> {
    Hook::middleware(|exchange: SharedExchange, next: Next, _done: Done| {
        let mut exchange = exchange.lock();
        info!(path = %exchange.path, "Request received");
        exchange.trail.push("logger");
        next.proceed();
    })
}

fn auth() -> Hook<SharedExchange> {
    Hook::middleware(|exchange: SharedExchange, next: Next, _done: Done| {
        let mut exchange = exchange.lock();
        exchange.trail.push("auth");
        if exchange.path.starts_with("/admin") {
            next.fail(HookError::hook_failed(format!(
                "Forbidden: [{}] requires an administrator",
                exchange.path
            )));
        } else {
            exchange.user = Some("guest".to_string());
            next.proceed();
        }
    })
}

fn route() -> Hook<SharedExchange> {
    Hook::middleware_async(|exchange: SharedExchange, _next: Next, done: Done| async move {
        tokio::task::yield_now().await;
        let body = {
            let mut exchange = exchange.lock();
            exchange.trail.push("route");
            json!({ "path": exchange.path, "user": exchange.user })
        };
        done.finish(Some(body));
    })
}

/// Registers the pipeline and serves two sample paths.
pub async fn run(config: &HookableConfig) -> HookResult<()> {
    let app = app(config)?;
    let alias = app.aliases().first().map(|alias| alias.to_string()).ok_or_else(|| {
        HookError::configuration("The [extender] section must declare at least one alias")
    })?;

    app.on(&alias, logger())?.on(&alias, auth())?.on(&alias, route())?;

    for path in ["/items", "/admin/users"] {
        match (app.func())(path).await {
            Ok(body) => info!(path, body = ?body, "Request handled"),
            Err(err) => info!(path, error = %err, "Request rejected"),
        }
    }
    Ok(())
}
