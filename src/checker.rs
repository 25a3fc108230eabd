use std::collections::BTreeSet;
use std::future::Future;
use std::io::Write;
use std::net::SocketAddrV4;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::Failure;
use crate::prober::{Reachability, tcp_connect};
use crate::report::Reporter;
use crate::target::normalize;

/// Outcome of checking one target, sent by its probe task to the collector.
#[derive(Debug)]
pub struct Response {
    pub target: String,
    pub result: Result<Reachability, Failure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Unique targets in the batch.
    pub checked: usize,
    /// Targets reported as failed, timeouts included.
    pub failed: usize,
    /// The global timeout fired while targets were still outstanding.
    pub timed_out: bool,
}

impl Summary {
    pub fn all_ok(&self) -> bool {
        self.failed == 0 && !self.timed_out
    }

    /// Process exit status for this batch: 0 when every target was reachable.
    pub fn exit_status(&self) -> u8 {
        if self.all_ok() { 0 } else { 1 }
    }
}

pub struct Checker {
    timeout: Duration,
    default_port: u16,
}

impl Checker {
    pub fn new(timeout: Duration, default_port: u16) -> Self {
        Self {
            timeout,
            default_port,
        }
    }

    /// Check every target over TCP, racing the whole batch against the timeout.
    pub async fn run<I, W>(&self, targets: I, reporter: &mut Reporter<W>) -> Result<Summary>
    where
        I: IntoIterator<Item = String>,
        W: Write,
    {
        self.run_with(targets, reporter, tcp_connect::probe_tcp).await
    }

    /// Same as [`Checker::run`] with a caller-supplied probe.
    ///
    /// One task per unique target plus one timer task are spawned up front.
    /// Failures are reported as they arrive. When the timer fires first, every
    /// outstanding target is reported as timed out and the summary is returned
    /// at once; probes still in flight are abandoned.
    pub async fn run_with<I, W, F, Fut>(
        &self,
        targets: I,
        reporter: &mut Reporter<W>,
        probe: F,
    ) -> Result<Summary>
    where
        I: IntoIterator<Item = String>,
        W: Write,
        F: Fn(SocketAddrV4) -> Fut,
        Fut: Future<Output = Result<Reachability, Failure>> + Send + 'static,
    {
        let mut outstanding: BTreeSet<String> = targets.into_iter().collect();
        let mut summary = Summary {
            checked: outstanding.len(),
            ..Summary::default()
        };
        if outstanding.is_empty() {
            return Ok(summary);
        }

        // sized so no probe ever waits on send
        let (tx, mut rx) = mpsc::channel::<Response>(outstanding.len());
        for target in &outstanding {
            let check = normalize(target, self.default_port).map(&probe);
            let target = target.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = match check {
                    Ok(fut) => fut.await,
                    Err(e) => Err(e),
                };
                // receiver is gone once the batch timed out
                let _ = tx.send(Response { target, result }).await;
            });
        }
        drop(tx);

        let (expired_tx, mut expired_rx) = oneshot::channel::<()>();
        let timeout = self.timeout;
        let timer = tokio::spawn(async move {
            sleep(timeout).await;
            let _ = expired_tx.send(());
        });

        while !outstanding.is_empty() {
            tokio::select! {
                biased;

                Some(resp) = rx.recv() => {
                    if !outstanding.remove(&resp.target) {
                        continue;
                    }
                    match resp.result {
                        Ok(reach) => {
                            debug!("{} reachable: {:?}", resp.target, reach);
                            reporter.ok(&resp.target)?;
                        }
                        Err(reason) => {
                            summary.failed += 1;
                            reporter.fail(&resp.target, &reason)?;
                        }
                    }
                }
                _ = &mut expired_rx => {
                    warn!(
                        "timeout after {:?} with {} target(s) outstanding",
                        timeout,
                        outstanding.len()
                    );
                    for target in &outstanding {
                        reporter.fail(target, &Failure::Timeout)?;
                    }
                    summary.failed += outstanding.len();
                    summary.timed_out = true;
                    return Ok(summary);
                }
            }
        }

        timer.abort();
        Ok(summary)
    }
}
