use crate::core::{TimeT, TimerService};
use crate::utils::{App, Logger};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::{sync::Arc, time::Duration};
use tokio::sync::oneshot;

/// Sleep bound while nothing is scheduled; a wake cuts it short.
const IDLE_SLEEP_MS: TimeT = 60_000;

/// Event-loop driver for a [`TimerService`].
///
/// Sleeps until the next deadline or until the service reports a schedule
/// change, then fires whatever is due. Terminates when the wake stream ends.
pub struct TimerDriver {
    service: TimerService,
    logger: Arc<dyn Logger>,
}

impl TimerDriver {
    pub fn new(service: TimerService, logger: Arc<dyn Logger>) -> Self {
        Self { service, logger }
    }
}

#[async_trait(?Send)]
impl App for TimerDriver {
    async fn run(
        &mut self,
        termination_receiver: oneshot::Receiver<()>,
        readiness_sender: oneshot::Sender<()>,
    ) -> Result<()> {
        let mut wakes = self
            .service
            .take_wakes(termination_receiver)
            .context("Wake stream was already taken")?;

        readiness_sender
            .send(())
            .map_err(|_| anyhow::anyhow!("Failed to send readiness signal"))?;

        loop {
            let delay = self.service.delay_until_due().unwrap_or(IDLE_SLEEP_MS);
            tokio::select! {
                wake = wakes.next() => {
                    match wake {
                        // The schedule changed; recompute the sleep.
                        Some(()) => continue,
                        None => break,
                    }
                }
                _ = tokio::time::sleep(Duration::from_millis(delay as u64)) => {
                    self.service.run_due();
                }
            }
        }

        self.logger.info("Timer driver terminated");
        Ok(())
    }
}
