//! Store for hooks annotated with a stable code.
//!
//! Codes deduplicate entries within a bucket and let a caller pick a subset
//! of hooks per invocation:
//!
//! ```rust,ignore
//! store.add_map(hook_map! { "before" => [hook_a, hook_b, hook_c] })?;
//!
//! store.get(&"before".into());                                  // A, B, C
//! store.get(&HookQuery::select().codes("before", ["A", "C"]));  // A, C
//! ```

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use hookable_core::{HookError, HookResult};

use super::{HookStore, HookType, bindings_map};
use crate::hooks::{Hook, HookArgs, HookCatalog};

/// A hook plus the code identifying it within its bucket.
pub struct ObjectHook<A> {
    code: String,
    hook: Hook<A>,
}

impl<A: HookArgs> ObjectHook<A> {
    /// Annotates `hook` with `code`.
    pub fn new(code: impl Into<String>, hook: Hook<A>) -> Self {
        Self {
            code: code.into(),
            hook,
        }
    }
}

impl<A> ObjectHook<A> {
    /// Returns the identity code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the executable body.
    pub fn hook(&self) -> &Hook<A> {
        &self.hook
    }
}

impl<A> Clone for ObjectHook<A> {
    fn clone(&self) -> Self {
        Self {
            code: self.code.clone(),
            hook: self.hook.clone(),
        }
    }
}

impl<A> fmt::Debug for ObjectHook<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHook")
            .field("code", &self.code)
            .field("hook", &self.hook)
            .finish()
    }
}

/// Which entries of one hook type a query wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every entry, in registration order (`'*'`).
    All,
    /// Entries whose code is listed, in registration order.
    Codes(Vec<String>),
}

impl Selection {
    /// Builds a code selection.
    pub fn codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Codes(codes.into_iter().map(Into::into).collect())
    }

    fn matches(&self, code: &str) -> bool {
        match self {
            Self::All => true,
            Self::Codes(codes) => codes.iter().any(|c| c == code),
        }
    }
}

/// Lookup against an [`ObjectHookStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookQuery {
    /// Every entry of one hook type.
    Type(HookType),
    /// Selected entries across several hook types, in the listed order.
    Select(Vec<(HookType, Selection)>),
}

impl HookQuery {
    /// Starts an empty cross-type selection.
    pub fn select() -> Self {
        Self::Select(Vec::new())
    }

    /// Selects every entry of `hook_type`.
    pub fn all(self, hook_type: impl Into<String>) -> Self {
        self.push(hook_type.into(), Selection::All)
    }

    /// Selects the entries of `hook_type` whose code is in `codes`.
    pub fn codes<I, S>(self, hook_type: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(hook_type.into(), Selection::codes(codes))
    }

    fn push(self, hook_type: HookType, selection: Selection) -> Self {
        let mut selections = match self {
            Self::Type(existing) => vec![(existing, Selection::All)],
            Self::Select(selections) => selections,
        };
        selections.push((hook_type, selection));
        Self::Select(selections)
    }

    /// Parses a query from a value: a hook type string, or a map of
    /// `hook type -> "*" | [codes]`.
    pub fn from_value(value: &Value) -> HookResult<Self> {
        match value {
            Value::String(hook_type) => Ok(Self::Type(hook_type.clone())),
            Value::Object(map) => {
                let mut selections = Vec::with_capacity(map.len());
                for (hook_type, selection) in map {
                    let selection = match selection {
                        Value::String(star) if star == "*" => Selection::All,
                        Value::Array(items) => Selection::Codes(
                            items
                                .iter()
                                .map(|item| {
                                    item.as_str()
                                        .map(str::to_string)
                                        .ok_or_else(|| query_error(value))
                                })
                                .collect::<HookResult<_>>()?,
                        ),
                        _ => return Err(query_error(value)),
                    };
                    selections.push((hook_type.clone(), selection));
                }
                Ok(Self::Select(selections))
            }
            _ => Err(query_error(value)),
        }
    }
}

fn query_error(value: &Value) -> HookError {
    HookError::invalid_hook_shape(format!(
        "Hook query expected a hook type or a map of hook type to '*' or codes, but received [{value}]"
    ))
}

impl From<&str> for HookQuery {
    fn from(hook_type: &str) -> Self {
        Self::Type(hook_type.to_string())
    }
}

impl From<String> for HookQuery {
    fn from(hook_type: String) -> Self {
        Self::Type(hook_type)
    }
}

/// Hook type → ordered annotated hooks.
pub struct ObjectHookStore<A> {
    hooks: HashMap<HookType, Vec<ObjectHook<A>>>,
}

impl<A: HookArgs> ObjectHookStore<A> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    fn validate(hook: &ObjectHook<A>) -> HookResult<()> {
        if hook.code.trim().is_empty() {
            return Err(HookError::invalid_hook(format!(
                "Hook expected a non-empty code and a callable body, but received {hook:?}"
            )));
        }
        Ok(())
    }
}

impl<A: HookArgs> HookStore<A> for ObjectHookStore<A> {
    type Entry = ObjectHook<A>;
    type Query = HookQuery;

    fn add(&mut self, hook_type: &str, entry: ObjectHook<A>) -> HookResult<&mut Self> {
        Self::validate(&entry)?;

        let bucket = self.hooks.entry(hook_type.to_string()).or_default();
        if bucket.iter().any(|existing| existing.code == entry.code) {
            debug!(hook_type = %hook_type, code = %entry.code, "Hook code already registered, skipping");
            return Ok(self);
        }

        debug!(
            hook_type = %hook_type,
            code = %entry.code,
            kind = %entry.hook.kind(),
            "Hook registered"
        );
        bucket.push(entry);
        Ok(self)
    }

    fn add_bindings(
        &mut self,
        bindings: &Value,
        catalog: &HookCatalog<A>,
    ) -> HookResult<&mut Self> {
        for (hook_type, value) in bindings_map(bindings)? {
            let items: Vec<&Value> = match value {
                Value::Object(_) => vec![value],
                Value::Array(items) => items.iter().collect(),
                other => {
                    return Err(HookError::invalid_hook_shape(format!(
                        "Hooks of type [{hook_type}] expected an object or array, but received [{other}]"
                    )));
                }
            };

            for item in items {
                let (code, name) = binding_fields(item)?;
                let hook = catalog.resolve(name)?;
                self.add(hook_type, ObjectHook::new(code, hook))?;
            }
        }
        Ok(self)
    }

    fn get(&self, query: &HookQuery) -> Option<Vec<Hook<A>>> {
        match query {
            HookQuery::Type(hook_type) => self
                .hooks
                .get(hook_type)
                .map(|bucket| bucket.iter().map(|entry| entry.hook.clone()).collect()),
            HookQuery::Select(selections) => {
                let mut hooks = Vec::new();
                for (hook_type, selection) in selections {
                    let Some(bucket) = self.hooks.get(hook_type) else {
                        continue;
                    };
                    hooks.extend(
                        bucket
                            .iter()
                            .filter(|entry| selection.matches(&entry.code))
                            .map(|entry| entry.hook.clone()),
                    );
                }
                if hooks.is_empty() { None } else { Some(hooks) }
            }
        }
    }

    fn hook_types(&self) -> Vec<HookType> {
        self.hooks.keys().cloned().collect()
    }

    fn count(&self, hook_type: &str) -> usize {
        self.hooks.get(hook_type).map(Vec::len).unwrap_or(0)
    }
}

/// Extracts `code` and `do` from a bound annotated hook.
fn binding_fields(item: &Value) -> HookResult<(&str, &str)> {
    let code = item
        .get("code")
        .and_then(Value::as_str)
        .filter(|code| !code.trim().is_empty());
    let name = item.get("do").and_then(Value::as_str);

    match (code, name) {
        (Some(code), Some(name)) => Ok((code, name)),
        _ => Err(HookError::invalid_hook(format!(
            "Hook expected an object with properties code, do, but received [{item}]"
        ))),
    }
}

impl<A: HookArgs> Default for ObjectHookStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for ObjectHookStore<A> {
    fn clone(&self) -> Self {
        Self {
            hooks: self
                .hooks
                .iter()
                .map(|(hook_type, bucket)| (hook_type.clone(), bucket.clone()))
                .collect(),
        }
    }
}

impl<A> fmt::Debug for ObjectHookStore<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: HashMap<&str, Vec<&str>> = self
            .hooks
            .iter()
            .map(|(hook_type, bucket)| {
                (
                    hook_type.as_str(),
                    bucket.iter().map(|entry| entry.code.as_str()).collect(),
                )
            })
            .collect();
        f.debug_struct("ObjectHookStore")
            .field("hooks", &codes)
            .finish()
    }
}
