use anyhow::Result;
use async_trait::async_trait;

use tokio::sync::oneshot;

/// A long-running unit driven by [`Lifecycle`](crate::utils::Lifecycle).
///
/// Implementations signal readiness once they are serving and run until the
/// termination signal fires.
#[async_trait(?Send)]
pub trait App {
    async fn run(
        &mut self,
        termination_receiver: oneshot::Receiver<()>,
        readiness_sender: oneshot::Sender<()>,
    ) -> Result<()>;
}
