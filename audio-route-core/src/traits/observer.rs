use crate::models::warning::RouteWarning;

/// Receives non-fatal routing conditions.
///
/// Called synchronously from the routing call that raised the warning.
pub trait RouteObserver: Send + Sync {
    fn on_warning(&self, warning: &RouteWarning);
}
