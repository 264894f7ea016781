//! `FromRef` plumbing for [`AppState`](crate::state::AppState).

/// Let handlers pull single `AppState` fields with `State<T>`.
///
/// ```ignore
/// impl_from_ref!(CachedCatalog => catalog, Instant => start_time);
/// ```
#[macro_export]
macro_rules! impl_from_ref {
    ($($type:ty => $field:ident),+ $(,)?) => {
        $(
            impl axum::extract::FromRef<$crate::state::AppState> for $type {
                fn from_ref(app: &$crate::state::AppState) -> $type {
                    app.$field.clone()
                }
            }
        )+
    };
}
