//! Macros for ergonomic machine construction.

/// Build an [`ActionRegistry`](crate::core::ActionRegistry) from
/// `"name" => callback` pairs.
///
/// # Example
///
/// ```
/// use statehook::actions;
///
/// let registry = actions! {
///     "fadeIn" => |_args| {},
///     "fadeOut" => |args| println!("fading out with {args:?}"),
/// };
///
/// assert_eq!(registry.len(), 2);
/// assert!(registry.contains("fadeIn"));
/// ```
#[macro_export]
macro_rules! actions {
    ($($name:expr => $callback:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut registry = $crate::core::ActionRegistry::new();
        $(
            registry.insert($name, $callback);
        )*
        registry
    }};
}
