use anyhow::{Context, Result};
use tokio::{sync::oneshot, task::JoinHandle};

use crate::utils::App;

/// Start/stop wrapper around an [`App`] running on the local task set.
pub struct Lifecycle<T: App> {
    app: Option<T>,
    termination_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<Result<()>>>,
}

impl<T: App + 'static> Lifecycle<T> {
    pub fn new(app: T) -> Self {
        Self {
            app: Some(app),
            termination_tx: None,
            handle: None,
        }
    }

    /// Spawn the app and return its readiness receiver.
    ///
    /// Must be called from within a `tokio::task::LocalSet`.
    pub async fn start(&mut self) -> Result<oneshot::Receiver<()>> {
        let mut app = self.app.take().context("Application has already started")?;

        let (termination_tx, termination_rx) = oneshot::channel();
        let (readiness_tx, readiness_rx) = oneshot::channel();

        let handle =
            tokio::task::spawn_local(async move { app.run(termination_rx, readiness_tx).await });

        self.termination_tx = Some(termination_tx);
        self.handle = Some(handle);

        Ok(readiness_rx)
    }

    /// Signal termination and wait for the app to finish.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(termination_tx) = self.termination_tx.take() {
            let _ = termination_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.await.context("Application task failed to join")??;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::task::LocalSet;

    struct WaitingApp;

    #[async_trait(?Send)]
    impl App for WaitingApp {
        async fn run(
            &mut self,
            termination_receiver: oneshot::Receiver<()>,
            readiness_sender: oneshot::Sender<()>,
        ) -> Result<()> {
            readiness_sender
                .send(())
                .map_err(|_| anyhow::anyhow!("Readiness receiver dropped"))?;
            let _ = termination_receiver.await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn starts_signals_readiness_and_stops() {
        LocalSet::new()
            .run_until(async {
                let mut lifecycle = Lifecycle::new(WaitingApp);
                let readiness = lifecycle.start().await.expect("Failed to start");
                readiness.await.expect("No readiness signal");
                lifecycle.stop().await.expect("Failed to stop");
            })
            .await;
    }

    #[tokio::test]
    async fn second_start_is_an_error() {
        LocalSet::new()
            .run_until(async {
                let mut lifecycle = Lifecycle::new(WaitingApp);
                let _readiness = lifecycle.start().await.expect("Failed to start");
                assert!(lifecycle.start().await.is_err());
                lifecycle.stop().await.expect("Failed to stop");
            })
            .await;
    }
}
