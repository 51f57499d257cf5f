use anyhow::Result;

/// Every mutation of the schedule and every redraw happens on one logical
/// thread, so the whole app runs on a current-thread runtime.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
