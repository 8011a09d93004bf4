//! Crawler coordinator - distributed crawl orchestration
//!
//! The coordinator owns the whole distributed run:
//! - Spawning the supervisor pool
//! - Assigning seeds round-robin
//! - Collecting finished reports in completion order
//! - Persisting each report and building the run summary

use crate::config::PoolConfig;
use crate::crawler::session::CrawlLimits;
use crate::crawler::supervisor::{spawn_supervisor, SupervisorContext};
use crate::crawler::CrawlContext;
use crate::output::{persist_report, GlobalReport, SeedSummary};
use crate::protocol::{recv_any, SupervisorCommand, SupervisorEvent};
use chrono::Local;

/// Main distributed crawl coordinator
pub struct Coordinator {
    supervisors: usize,
    fetchers_per_supervisor: usize,
    limits: CrawlLimits,
    ctx: CrawlContext,
}

impl Coordinator {
    /// Creates a coordinator for `N` supervisors with `M` fetchers each
    ///
    /// # Arguments
    ///
    /// * `pool` - Pool sizes, already validated to be non-zero
    /// * `limits` - Per-seed crawl caps
    /// * `ctx` - Page source, extractor and report sink shared by every worker
    pub fn new(pool: &PoolConfig, limits: CrawlLimits, ctx: CrawlContext) -> Self {
        Self {
            supervisors: pool.supervisors,
            fetchers_per_supervisor: pool.fetchers_per_supervisor,
            limits,
            ctx,
        }
    }

    /// Runs the crawl over every seed
    ///
    /// Seed `i` goes to supervisor `i mod N`. The same seed listed twice is crawled twice.
    /// Exactly one report or failure is collected per seed, in whatever order the
    /// supervisors finish.
    pub async fn run(&self, seeds: &[String]) -> crate::Result<GlobalReport> {
        let started = Local::now();
        let mut global = GlobalReport::new(started);

        let supervisor_ctx = SupervisorContext {
            source: self.ctx.source.clone(),
            extractor: self.ctx.extractor.clone(),
            limits: self.limits,
            fetchers: self.fetchers_per_supervisor,
        };
        let (mut links, handles): (Vec<_>, Vec<_>) = (0..self.supervisors)
            .map(|id| spawn_supervisor(id, supervisor_ctx.clone()))
            .unzip();

        tracing::info!(
            "Distributing {} seeds across {} supervisors ({} fetchers each)",
            seeds.len(),
            self.supervisors,
            self.fetchers_per_supervisor
        );

        // Seeds still owed by each supervisor
        let mut outstanding = vec![0usize; links.len()];
        for (i, seed) in seeds.iter().enumerate() {
            let target = i % links.len();
            links[target].send(SupervisorCommand::Crawl(seed.clone()))?;
            outstanding[target] += 1;
        }
        for link in &links {
            link.send(SupervisorCommand::Terminate)?;
        }

        if seeds.is_empty() {
            tracing::info!("No URLs to process");
        }

        for _ in 0..seeds.len() {
            let (id, event) = recv_any(
                links
                    .iter_mut()
                    .enumerate()
                    .filter(|(id, _)| outstanding[*id] > 0),
            )
            .await?;
            outstanding[id] -= 1;

            match event {
                SupervisorEvent::Finished(report) => {
                    global.push(persist_report(self.ctx.sink.as_ref(), &report, started));
                }
                SupervisorEvent::Failed { seed, error } => {
                    tracing::warn!("Seed {} failed on supervisor {}: {}", seed, id, error);
                    global.push(SeedSummary::failed(seed, error));
                }
            }
        }

        for handle in handles {
            handle.await??;
        }

        tracing::info!(
            "Crawl complete: {} seeds, {} failures",
            global.len(),
            global.failures()
        );
        Ok(global)
    }
}
