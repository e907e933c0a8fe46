/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Settings store and calculator. Blocking DuckDB work is dispatched to
    /// the thread pool by the async wrapper.
    pub sdk: kpure_pricing::AsyncPricingSdk,
}
