//! Shutdown signalling for a running server.

use std::sync::Arc;

use tokio::sync::watch;

/// Trigger handed to request handlers through [`crate::app_state::AppState`].
#[derive(Debug, Clone)]
pub struct ShutdownHook {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownHook {
    /// Creates a hook and the receiver that observes it.
    #[must_use]
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                sender: Arc::new(sender),
            },
            receiver,
        )
    }

    /// Requests shutdown. Repeated calls are harmless.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

/// Resolves when the hook fires or the process receives ctrl-c.
pub async fn shutdown_signal(mut requested: watch::Receiver<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    let hook = async move {
        // A dropped hook never fires.
        if requested.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("ctrl-c received"),
        () = hook => tracing::info!("shutdown requested"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn trigger_resolves_signal() {
        let (hook, receiver) = ShutdownHook::new();
        let waiter = tokio::spawn(shutdown_signal(receiver));
        hook.trigger();
        let finished = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }

    #[test]
    fn trigger_twice_is_harmless() {
        let (hook, receiver) = ShutdownHook::new();
        hook.trigger();
        hook.trigger();
        assert!(*receiver.borrow());
    }
}
