//! Order → rows generator with hook points around and inside its loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use serde::Serialize;

use hookable::prelude::*;

/// One purchased line.
#[derive(Debug, Clone)]
pub struct LineItem {
    pub sku: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// An order to turn into rows.
#[derive(Debug, Clone)]
pub struct Order {
    pub customer_id: u32,
    pub items: Vec<LineItem>,
}

/// Generated row; optional fields are filled by hooks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Row {
    pub sku: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub customer: Option<String>,
    pub label: Option<String>,
    pub total: f64,
}

/// Aggregate over all rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub quantity: u32,
    pub total: f64,
}

/// Working state shared with the hooks during one call.
#[derive(Debug, Default)]
pub struct Sheet {
    pub customer_id: u32,
    pub customer: Option<String>,
    pub labels: HashMap<String, String>,
    pub rows: Vec<Row>,
    pub summary: Option<Summary>,
}

pub type SharedSheet = Arc<Mutex<Sheet>>;

/// Rows plus summary returned by the generator.
#[derive(Debug, Serialize)]
pub struct Report {
    pub rows: Vec<Row>,
    pub summary: Option<Summary>,
}

type Generate = Box<dyn Fn(Order) -> BoxFuture<'static, HookResult<Report>> + Send + Sync>;

/// Builds the hookable generator.
pub fn generator(config: &HookableConfig) -> Hookable<Generate, SharedSheet> {
    Hookable::with_options(
        |invoke: Invoke<SharedSheet>| -> Generate {
            Box::new(move |order: Order| {
                let invoke = invoke.clone();
                async move {
                    let sheet: SharedSheet = Arc::new(Mutex::new(Sheet {
                        customer_id: order.customer_id,
                        ..Sheet::default()
                    }));

                    invoke.invoke("before", sheet.clone(), "parallel").await?;
                    for item in &order.items {
                        sheet.lock().rows.push(Row {
                            sku: item.sku.clone(),
                            quantity: item.quantity,
                            unit_price: item.unit_price,
                            ..Row::default()
                        });
                        invoke.invoke_blocking("each_item", &sheet)?;
                    }
                    invoke.invoke("after", sheet.clone(), "synchronous").await?;

                    let mut sheet = sheet.lock();
                    Ok(Report {
                        rows: std::mem::take(&mut sheet.rows),
                        summary: sheet.summary.take(),
                    })
                }
                .boxed()
            })
        },
        HookableOptions::new().apply_config(&config.invocation),
    )
}

/// Named hooks the `[hooks]` section can bind.
pub fn catalog() -> HookCatalog<SharedSheet> {
    HookCatalog::new()
        .with(
            "fetch_customer",
            Hook::future(|sheet: SharedSheet| async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                let id = sheet.lock().customer_id;
                sheet.lock().customer = Some(format!("customer-{id}"));
            }),
        )
        .with(
            "fetch_labels",
            Hook::future(|sheet: SharedSheet| async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                let mut sheet = sheet.lock();
                sheet.labels.insert("A-1".into(), "Anvil".into());
                sheet.labels.insert("B-2".into(), "Bucket".into());
            }),
        )
        .with(
            "add_customer",
            Hook::blocking(|sheet: &SharedSheet| {
                let mut sheet = sheet.lock();
                let customer = sheet.customer.clone();
                if let Some(row) = sheet.rows.last_mut() {
                    row.customer = customer;
                }
            }),
        )
        .with(
            "add_total",
            Hook::blocking(|sheet: &SharedSheet| {
                let mut sheet = sheet.lock();
                let Sheet { labels, rows, .. } = &mut *sheet;
                if let Some(row) = rows.last_mut() {
                    row.total = f64::from(row.quantity) * row.unit_price;
                    row.label = labels.get(&row.sku).cloned();
                }
            }),
        )
        .with(
            "cal_summary",
            Hook::blocking(|sheet: &SharedSheet| {
                let mut sheet = sheet.lock();
                let summary = Summary {
                    rows: sheet.rows.len(),
                    quantity: sheet.rows.iter().map(|row| row.quantity).sum(),
                    total: sheet.rows.iter().map(|row| row.total).sum(),
                };
                sheet.summary = Some(summary);
            }),
        )
}

/// Bindings used when the configuration has no `[hooks]` section.
pub fn default_bindings() -> serde_json::Value {
    serde_json::json!({
        "before": ["fetch_customer", "fetch_labels"],
        "each_item": ["add_customer", "add_total"],
        "after": "cal_summary"
    })
}

/// Builds the generator, binds hooks and renders a sample order.
pub async fn run(config: &HookableConfig) -> HookResult<()> {
    let generate = generator(config);
    let bindings = config.hooks.clone().unwrap_or_else(default_bindings);
    generate.bind(&bindings, &catalog())?;

    let order = Order {
        customer_id: 7,
        items: vec![
            LineItem {
                sku: "A-1".into(),
                quantity: 2,
                unit_price: 9.5,
            },
            LineItem {
                sku: "B-2".into(),
                quantity: 1,
                unit_price: 4.0,
            },
        ],
    };

    let report = (generate.func())(order).await?;
    tracing::info!(report = %serde_json::to_string(&report)?, "Rows generated");

    let plain = generate.try_clone()?;
    let report = (plain.func())(Order {
        customer_id: 8,
        items: Vec::new(),
    })
    .await?;
    tracing::info!(rows = report.rows.len(), "Cloned generator ran");
    Ok(())
}
