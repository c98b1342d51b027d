//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;

use hookable::prelude::*;

/// Ordered record of what ran.
pub type Log = Arc<Mutex<Vec<String>>>;

/// Hook that appends `label` to the log.
pub fn recorder(label: &'static str) -> Hook<Log> {
    Hook::blocking(move |log: &Log| log.lock().push(label.to_string()))
}

/// A customer known to the mock directory.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub discount: f64,
}

/// Catalog data for one SKU.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub sku: String,
    pub title: String,
    pub price: f64,
}

/// In-memory stand-in for the user and item services.
#[derive(Debug)]
pub struct MockDirectory {
    users: HashMap<u32, User>,
    items: HashMap<String, Item>,
    user_calls: AtomicUsize,
    item_calls: AtomicUsize,
}

impl MockDirectory {
    /// Seeds one user and two items.
    pub fn new() -> Arc<Self> {
        let users = HashMap::from([(
            1,
            User {
                id: 1,
                name: "Ada".to_string(),
                discount: 0.1,
            },
        )]);
        let items = HashMap::from([
            (
                "A-1".to_string(),
                Item {
                    sku: "A-1".to_string(),
                    title: "Anvil".to_string(),
                    price: 10.0,
                },
            ),
            (
                "B-2".to_string(),
                Item {
                    sku: "B-2".to_string(),
                    title: "Bucket".to_string(),
                    price: 2.5,
                },
            ),
        ]);

        Arc::new(Self {
            users,
            items,
            user_calls: AtomicUsize::new(0),
            item_calls: AtomicUsize::new(0),
        })
    }

    /// Resolves a user after 50ms.
    pub async fn fetch_user(&self, id: u32) -> HookResult<User> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| HookError::hook_failed(format!("No user [{id}]")))
    }

    /// Resolves items after 20ms.
    pub async fn fetch_items(&self, skus: &[String]) -> HookResult<Vec<Item>> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        skus.iter()
            .map(|sku| {
                self.items
                    .get(sku)
                    .cloned()
                    .ok_or_else(|| HookError::hook_failed(format!("No item [{sku}]")))
            })
            .collect()
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn item_calls(&self) -> usize {
        self.item_calls.load(Ordering::SeqCst)
    }
}

/// One order line.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub sku: String,
    pub quantity: u32,
}

/// Input of the row generator.
#[derive(Debug, Clone)]
pub struct Order {
    pub user_id: u32,
    pub lines: Vec<OrderLine>,
}

/// Two-line sample order for user 1.
pub fn sample_order() -> Order {
    Order {
        user_id: 1,
        lines: vec![
            OrderLine {
                sku: "A-1".to_string(),
                quantity: 2,
            },
            OrderLine {
                sku: "B-2".to_string(),
                quantity: 4,
            },
        ],
    }
}

/// One generated row. Everything past `quantity` comes from hooks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub sku: String,
    pub quantity: u32,
    pub customer: Option<String>,
    pub title: Option<String>,
    pub amount: f64,
}

/// Totals computed by the `after` hook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub quantity: u32,
    pub amount: f64,
}

/// State shared with hooks during one generation.
#[derive(Debug, Default)]
pub struct RowsContext {
    pub order: Option<Order>,
    pub user: Option<User>,
    pub items: HashMap<String, Item>,
    pub rows: Vec<Row>,
    pub summary: Option<Summary>,
}

pub type Shared = Arc<Mutex<RowsContext>>;

/// Rows plus summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub rows: Vec<Row>,
    pub summary: Option<Summary>,
}

pub type Generate = Box<dyn Fn(Order) -> BoxFuture<'static, HookResult<Report>> + Send + Sync>;

/// Factory of the row generator: `before` runs in parallel, `each_item`
/// synchronously per row, `after` synchronously once.
pub fn rows_factory(invoke: Invoke<Shared>) -> Generate {
    Box::new(move |order: Order| {
        let invoke = invoke.clone();
        async move {
            let shared: Shared = Arc::new(Mutex::new(RowsContext {
                order: Some(order.clone()),
                ..RowsContext::default()
            }));

            invoke.invoke("before", shared.clone(), "parallel").await?;
            for line in &order.lines {
                shared.lock().rows.push(Row {
                    sku: line.sku.clone(),
                    quantity: line.quantity,
                    ..Row::default()
                });
                invoke.invoke_blocking("each_item", &shared)?;
            }
            invoke.invoke("after", shared.clone(), "synchronous").await?;

            let mut context = shared.lock();
            Ok(Report {
                rows: std::mem::take(&mut context.rows),
                summary: context.summary.take(),
            })
        }
        .boxed()
    })
}

/// Builds the row generator with default options.
pub fn row_generator() -> Hookable<Generate, Shared> {
    Hookable::new(rows_factory)
}

/// `before`: loads the order's user.
pub fn fetch_user(directory: Arc<MockDirectory>) -> Hook<Shared> {
    Hook::future(move |shared: Shared| {
        let directory = Arc::clone(&directory);
        async move {
            let user_id = shared.lock().order.as_ref().map(|order| order.user_id);
            let Some(user_id) = user_id else {
                return Ok(());
            };
            let user = directory.fetch_user(user_id).await?;
            shared.lock().user = Some(user);
            Ok::<(), HookError>(())
        }
    })
}

/// `before`: loads catalog data for every line.
pub fn fetch_items(directory: Arc<MockDirectory>) -> Hook<Shared> {
    Hook::future(move |shared: Shared| {
        let directory = Arc::clone(&directory);
        async move {
            let skus: Vec<String> = shared
                .lock()
                .order
                .as_ref()
                .map(|order| order.lines.iter().map(|line| line.sku.clone()).collect())
                .unwrap_or_default();
            let items = directory.fetch_items(&skus).await?;
            shared
                .lock()
                .items
                .extend(items.into_iter().map(|item| (item.sku.clone(), item)));
            Ok::<(), HookError>(())
        }
    })
}

/// `each_item`: copies the customer name onto the current row.
pub fn add_customer() -> Hook<Shared> {
    Hook::blocking(|shared: &Shared| {
        let mut context = shared.lock();
        let name = context.user.as_ref().map(|user| user.name.clone());
        if let Some(row) = context.rows.last_mut() {
            row.customer = name;
        }
    })
}

/// `each_item`: prices the current row, applying the user's discount.
pub fn add_pricing() -> Hook<Shared> {
    Hook::blocking(|shared: &Shared| {
        let mut context = shared.lock();
        let RowsContext {
            user, items, rows, ..
        } = &mut *context;
        let discount = user.as_ref().map(|user| user.discount).unwrap_or(0.0);
        if let Some(row) = rows.last_mut() {
            if let Some(item) = items.get(&row.sku) {
                row.title = Some(item.title.clone());
                row.amount = f64::from(row.quantity) * item.price * (1.0 - discount);
            }
        }
    })
}

/// `after`: sums quantities and amounts over all rows.
pub fn cal_summary() -> Hook<Shared> {
    Hook::blocking(|shared: &Shared| {
        let mut context = shared.lock();
        let summary = Summary {
            quantity: context.rows.iter().map(|row| row.quantity).sum(),
            amount: context.rows.iter().map(|row| row.amount).sum(),
        };
        context.summary = Some(summary);
    })
}

/// Catalog naming the hooks above, for binding tests.
pub fn rows_catalog(directory: Arc<MockDirectory>) -> HookCatalog<Shared> {
    HookCatalog::new()
        .with("fetch_user", fetch_user(Arc::clone(&directory)))
        .with("fetch_items", fetch_items(directory))
        .with("add_customer", add_customer())
        .with("add_pricing", add_pricing())
        .with("cal_summary", cal_summary())
}

/// Asserts two amounts are equal to the cent.
pub fn assert_amount(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {expected}, got {actual}"
    );
}
