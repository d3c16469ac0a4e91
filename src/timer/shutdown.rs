use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Stops a running session once the user presses Ctrl-C. Returns early if the session was
/// cancelled some other way.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Received interrupt, stopping session"),
                Err(e) => error!("Failed to listen for interrupt {e:?}"),
            }
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => {}
    };
}
