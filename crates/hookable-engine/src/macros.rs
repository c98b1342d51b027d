//! Convenience macros for hook registration.

/// Builds a [`HookMap`](crate::stores::HookMap) from `hook type => entries`
/// pairs. A bracketed list registers several entries under one type.
///
/// # Example
/// ```rust,ignore
/// hookable.hooks(hook_map! {
///     "before" => [fetch_user, fetch_items],
///     "after" => cal_summary,
/// })?;
/// ```
#[macro_export]
macro_rules! hook_map {
    (@insert $map:ident;) => {};
    (@insert $map:ident; $hook_type:expr => [$($entry:expr),* $(,)?] $(, $($rest:tt)*)?) => {
        $map.insert_many($hook_type, vec![$($entry),*]);
        $crate::hook_map!(@insert $map; $($($rest)*)?);
    };
    (@insert $map:ident; $hook_type:expr => $entry:expr $(, $($rest:tt)*)?) => {
        $map.insert_one($hook_type, $entry);
        $crate::hook_map!(@insert $map; $($($rest)*)?);
    };
    ($($body:tt)*) => {{
        #[allow(unused_mut)]
        let mut map = $crate::stores::HookMap::new();
        $crate::hook_map!(@insert map; $($body)*);
        map
    }};
}
