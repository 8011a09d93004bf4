//! Domain supervisor
//!
//! A supervisor receives seeds from the coordinator and crawls them one at a time. Each
//! seed gets a fresh `CrawlSession` and a fresh pool of fetchers, driven through the
//! phases `Dispatching -> WaitingForCompletion -> ... -> Draining -> ShuttingDown ->
//! Done`.

use crate::crawler::fetcher::PageSource;
use crate::crawler::parser::Extractor;
use crate::crawler::pool::WorkerPool;
use crate::crawler::session::{CrawlLimits, CrawlSession};
use crate::crawler::worker::{spawn_fetcher, FetcherContext};
use crate::output::FinishedReport;
use crate::protocol::{
    link, ChannelError, FetcherEvent, FetcherId, Link, SupervisorCommand, SupervisorEvent,
    SupervisorId,
};
use crate::state::SupervisorPhase;
use crate::CrawlError;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared settings for every seed a supervisor crawls
#[derive(Clone)]
pub struct SupervisorContext {
    pub source: Arc<dyn PageSource>,
    pub extractor: Arc<dyn Extractor>,
    pub limits: CrawlLimits,

    /// Fetchers spawned per seed
    pub fetchers: usize,
}

/// Runs a supervisor until the coordinator sends `Terminate`
///
/// A seed whose crawl fails is still answered, with `SupervisorEvent::Failed`, so the
/// coordinator can account for it.
pub async fn run_supervisor(
    id: SupervisorId,
    mut link: Link<SupervisorEvent, SupervisorCommand>,
    ctx: SupervisorContext,
) -> Result<(), ChannelError> {
    let mut handled = 0;

    loop {
        match link.recv().await? {
            SupervisorCommand::Crawl(seed) => {
                tracing::info!("Supervisor {} crawling {}", id, seed);
                let event = match crawl_seed(&seed, &ctx).await {
                    Ok(report) => SupervisorEvent::Finished(report),
                    Err(e) => {
                        tracing::error!("Supervisor {} failed on {}: {}", id, seed, e);
                        SupervisorEvent::Failed {
                            seed,
                            error: e.to_string(),
                        }
                    }
                };
                link.send(event)?;
                handled += 1;
            }
            SupervisorCommand::Terminate => {
                tracing::debug!("Supervisor {} terminating after {} seeds", id, handled);
                return Ok(());
            }
        }
    }
}

/// Spawns a supervisor task and returns the coordinator's end of its link
pub fn spawn_supervisor(
    id: SupervisorId,
    ctx: SupervisorContext,
) -> (
    Link<SupervisorCommand, SupervisorEvent>,
    JoinHandle<Result<(), ChannelError>>,
) {
    let (parent, child) = link();
    let handle = tokio::spawn(run_supervisor(id, child, ctx));
    (parent, handle)
}

/// Crawls one seed with a fresh fetcher pool
pub async fn crawl_seed(seed: &str, ctx: &SupervisorContext) -> crate::Result<FinishedReport> {
    let session = CrawlSession::new(seed, ctx.limits);
    let fetcher_ctx = FetcherContext {
        source: Arc::clone(&ctx.source),
        extractor: Arc::clone(&ctx.extractor),
        scope: session.scope().clone(),
        max_found_urls: ctx.limits.max_found_urls,
    };

    let (links, handles): (Vec<_>, Vec<_>) = (0..ctx.fetchers)
        .map(|id| spawn_fetcher(id, fetcher_ctx.clone()))
        .unzip();

    let run = SeedRun {
        session,
        pool: WorkerPool::new(links),
        phase: SupervisorPhase::Dispatching,
    };
    // Dropping the run closes every fetcher link, so fetchers left waiting after an
    // error exit on their own.
    let result = run.drive().await;

    for handle in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!("Fetcher for {} exited early: {}", seed, e),
            Err(e) => tracing::warn!("Fetcher task for {} failed: {}", seed, e),
        }
    }

    result
}

/// One seed's session, fetcher pool and phase
struct SeedRun {
    session: CrawlSession,
    pool: WorkerPool,
    phase: SupervisorPhase,
}

impl SeedRun {
    async fn drive(mut self) -> crate::Result<FinishedReport> {
        while self.session.has_pending_work(self.pool.busy_count()) {
            self.dispatch()?;
            if self.pool.busy_count() == 0 {
                break;
            }

            self.advance(SupervisorPhase::WaitingForCompletion)?;
            let (id, event) = self.pool.recv_from_busy().await?;
            self.handle(id, event);
            self.advance(SupervisorPhase::Dispatching)?;
        }

        self.advance(SupervisorPhase::Draining)?;
        if self.pool.busy_count() > 0 {
            tracing::debug!(
                "Draining {} in-flight pages for {}",
                self.pool.busy_count(),
                self.session.seed()
            );
        }
        while self.pool.busy_count() > 0 {
            let (id, event) = self.pool.recv_from_busy().await?;
            self.handle(id, event);
        }

        self.advance(SupervisorPhase::ShuttingDown)?;
        self.shutdown().await?;

        self.advance(SupervisorPhase::Done)?;
        Ok(self.session.finish())
    }

    /// Hands frontier URLs to idle fetchers
    fn dispatch(&mut self) -> crate::Result<()> {
        while self.session.can_dispatch() && self.pool.has_idle() {
            let Some(url) = self.session.next_url() else {
                break;
            };
            tracing::trace!("Dispatching {}", url);
            self.pool.dispatch(url)?;
        }
        Ok(())
    }

    fn handle(&mut self, id: FetcherId, event: FetcherEvent) {
        match event {
            FetcherEvent::Analyzed(outcome) if self.phase.accepts_results() => {
                self.session.record(outcome);
            }
            FetcherEvent::Analyzed(outcome) => {
                tracing::debug!(
                    "Ignoring result for {} in phase {}",
                    outcome.analysis.url,
                    self.phase
                );
            }
            FetcherEvent::Idle(_) => {
                if !self.pool.release(id) {
                    tracing::trace!("Ignoring stray idle signal from fetcher {}", id);
                }
            }
            FetcherEvent::ShutdownAck(_) => {
                tracing::debug!("Unexpected shutdown ack from fetcher {}", id);
            }
        }
    }

    /// Terminates every fetcher and waits for each acknowledgement once
    async fn shutdown(&mut self) -> crate::Result<()> {
        self.pool.terminate_all()?;

        let mut acked = HashSet::new();
        while acked.len() < self.pool.size() {
            let (id, event) = self.pool.recv_excluding(&acked).await?;
            match event {
                FetcherEvent::ShutdownAck(_) => {
                    acked.insert(id);
                }
                FetcherEvent::Idle(_) => {
                    tracing::trace!("Ignoring stray idle signal from fetcher {}", id);
                }
                FetcherEvent::Analyzed(outcome) => {
                    tracing::debug!("Ignoring late result for {}", outcome.analysis.url);
                }
            }
        }
        Ok(())
    }

    fn advance(&mut self, next: SupervisorPhase) -> crate::Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("{}: {} -> {}", self.session.seed(), self.phase, next);
        self.phase = next;
        Ok(())
    }
}
