use std::future::Future;

use crate::error::BootstrapError;
use crate::orchestrator::RunningServices;
use crate::state::{SharedState, Stage};

/// Watch both services after Ready until one of them exits or `shutdown`
/// resolves. Either way both are terminated before returning.
///
/// A service exiting on its own is an error: the instance can no longer
/// serve and the platform should recycle it.
pub async fn supervise<F>(
    mut services: RunningServices,
    state: SharedState,
    shutdown: F,
) -> Result<(), BootstrapError>
where
    F: Future<Output = ()>,
{
    let exited = tokio::select! {
        status = services.inference.wait() => Some((services.inference.name.clone(), status)),
        status = services.ui.wait() => Some((services.ui.name.clone(), status)),
        _ = shutdown => None,
    };

    let result = match exited {
        None => {
            tracing::info!("shutdown requested, stopping services");
            Ok(())
        }
        Some((service, status)) => {
            let status = status
                .map(|s| s.to_string())
                .unwrap_or_else(|e| format!("wait failed: {e}"));
            let err = BootstrapError::ServiceExited {
                stage: Stage::Ready,
                service,
                status,
            };
            tracing::error!(fault=err.kind(), error=%err, "service exited after bootstrap");
            state.write().await.fail(Stage::Ready, err.to_string());
            Err(err)
        }
    };

    services.shutdown().await;
    {
        let mut st = state.write().await;
        st.inference_server_up = false;
        st.ui_server_up = false;
    }
    result
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error=%e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error=%e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
