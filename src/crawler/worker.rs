//! Page fetcher worker
//!
//! A fetcher serves one supervisor over one link. For every `Task::Fetch` it answers
//! `Analyzed` then `Idle`; on `Task::Terminate` it answers `ShutdownAck` and exits.

use crate::crawler::fetcher::PageSource;
use crate::crawler::parser::Extractor;
use crate::protocol::{link, ChannelError, FetcherEvent, FetcherId, Link, PageOutcome, Task};
use crate::state::PageAnalysis;
use crate::url::Scope;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Everything a fetcher needs to turn a URL into a `PageAnalysis`
#[derive(Clone)]
pub struct FetcherContext {
    pub source: Arc<dyn PageSource>,
    pub extractor: Arc<dyn Extractor>,
    pub scope: Scope,
    pub max_found_urls: usize,
}

/// Fetches and analyzes one page
///
/// A missing or empty body yields an empty analysis with `fetched == false`. The found
/// URL list is truncated to `max_found_urls`.
pub async fn analyze_page(
    source: &dyn PageSource,
    extractor: &dyn Extractor,
    url: &str,
    scope: &Scope,
    max_found_urls: usize,
) -> (PageAnalysis, bool) {
    let content = match source.fetch(url).await {
        Some(body) if !body.is_empty() => body,
        _ => {
            tracing::warn!("Could not fetch {}", url);
            return (PageAnalysis::empty(url), false);
        }
    };

    let mut analysis = extractor.analyze(url, &content, scope);
    let dropped = analysis.cap_found_urls(max_found_urls);
    if dropped > 0 {
        tracing::debug!(
            "Limiting found URLs on {} to {} ({} dropped)",
            url,
            max_found_urls,
            dropped
        );
    }

    (analysis, true)
}

/// Runs a fetcher until it is told to terminate
///
/// Returns an error if the supervisor end of the link is gone.
pub async fn run_fetcher(
    id: FetcherId,
    mut link: Link<FetcherEvent, Task>,
    ctx: FetcherContext,
) -> Result<(), ChannelError> {
    loop {
        match link.recv().await? {
            Task::Fetch(url) => {
                tracing::debug!("Fetcher {} processing {}", id, url);
                let (analysis, fetched) = analyze_page(
                    ctx.source.as_ref(),
                    ctx.extractor.as_ref(),
                    &url,
                    &ctx.scope,
                    ctx.max_found_urls,
                )
                .await;

                link.send(FetcherEvent::Analyzed(PageOutcome {
                    fetcher: id,
                    analysis,
                    fetched,
                }))?;
                link.send(FetcherEvent::Idle(id))?;
            }
            Task::Terminate => {
                tracing::trace!("Fetcher {} terminating", id);
                link.send(FetcherEvent::ShutdownAck(id))?;
                return Ok(());
            }
        }
    }
}

/// Spawns a fetcher task and returns the supervisor's end of its link
pub fn spawn_fetcher(
    id: FetcherId,
    ctx: FetcherContext,
) -> (
    Link<Task, FetcherEvent>,
    JoinHandle<Result<(), ChannelError>>,
) {
    let (parent, child) = link();
    let handle = tokio::spawn(run_fetcher(id, child, ctx));
    (parent, handle)
}
