//! Axum implementation of the portal launcher.

use std::path::PathBuf;

use tokio::net::TcpListener;

use portal_core::session::{BoundPortal, PortalContext, PortalLauncher, SessionControl};
use portal_infra::filesystem::LocalCacheFs;
use portal_infra::tunnel::ListenMode;
use portal_types::error::SessionError;
use portal_types::session::{SessionOutcome, SessionResult};

use crate::http::router::build_router;
use crate::state::{PortalPresentation, PortalState};

pub struct AxumPortalLauncher {
    listen: ListenMode,
    presentation: PortalPresentation,
    static_dir: Option<PathBuf>,
    max_upload_bytes: usize,
    watch_signals: bool,
}

impl AxumPortalLauncher {
    pub fn new(
        listen: ListenMode,
        presentation: PortalPresentation,
        static_dir: Option<PathBuf>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            listen,
            presentation,
            static_dir,
            max_upload_bytes,
            watch_signals: false,
        }
    }

    /// End the session as cancelled on Ctrl+C or SIGTERM.
    pub fn with_signal_handling(mut self) -> Self {
        self.watch_signals = true;
        self
    }
}

impl PortalLauncher<LocalCacheFs> for AxumPortalLauncher {
    async fn launch(self, context: PortalContext<LocalCacheFs>) -> Result<BoundPortal, SessionError> {
        let addr = self.listen.bind_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| SessionError::Listener(format!("unable to bind {addr}: {e}")))?;
        let bound = listener
            .local_addr()
            .map_err(|e| SessionError::Listener(e.to_string()))?;
        let url = self.listen.public_url(bound);

        if self.listen.is_local() {
            tracing::info!(addr = %bound, "Listening locally");
        } else {
            tracing::info!(addr = %bound, url = %url, "Listening for tunnel traffic");
        }

        let shutdown = context.control.shutdown_token();
        if self.watch_signals {
            tokio::spawn(watch_signals(context.control.clone()));
        }

        let state = PortalState::new(context, self.presentation);
        let router = build_router(state, self.static_dir.as_deref(), self.max_upload_bytes);

        let serve = async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
                .map_err(|e| e.to_string())
        };

        Ok(BoundPortal {
            url,
            serve: Box::pin(serve),
        })
    }
}

async fn watch_signals(control: SessionControl) {
    tokio::select! {
        _ = shutdown_signal() => {
            control.finish(SessionResult::new(
                SessionOutcome::Cancelled,
                "The portal was interrupted by a shutdown signal",
            ));
        }
        _ = control.finished() => {}
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Unable to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unable to listen for SIGTERM");
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
