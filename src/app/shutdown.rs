use tokio::select;
use tokio_util::sync::CancellationToken;

/// Maps ctrl-c onto the app's cancellation token. The menu's Quit entry
/// cancels the same token; cancelling twice is harmless, and this future also
/// resolves then so the join in [start_app](super::start_app) completes.
pub async fn detect_shutdown(cancellation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancellation.cancel();
        },
        _ = cancellation.cancelled() => {},
    };
}
