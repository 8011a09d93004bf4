//! Fetcher pool owned by a domain supervisor
//!
//! Every fetcher link is either idle or busy, never both, so
//! `idle_count() + busy_count() == size()` holds after every operation.

use crate::protocol::{recv_any, ChannelError, FetcherEvent, FetcherId, Link, Task};
use std::collections::{HashSet, VecDeque};

/// Supervisor end of a fetcher link
pub type FetcherLink = Link<Task, FetcherEvent>;

/// Fixed set of fetcher links partitioned into idle and busy
pub struct WorkerPool {
    links: Vec<FetcherLink>,
    idle: VecDeque<FetcherId>,
    busy: HashSet<FetcherId>,
}

impl WorkerPool {
    /// Creates a pool with every fetcher idle
    ///
    /// A fetcher's identity is its position in `links`.
    pub fn new(links: Vec<FetcherLink>) -> Self {
        let idle = (0..links.len()).collect();
        Self {
            links,
            idle,
            busy: HashSet::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.links.len()
    }

    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    pub fn busy_count(&self) -> usize {
        self.busy.len()
    }

    pub fn has_idle(&self) -> bool {
        !self.idle.is_empty()
    }

    /// Hands a task to the longest-idle fetcher and marks it busy
    ///
    /// Returns `Ok(None)` if no fetcher is idle.
    pub fn dispatch(&mut self, url: String) -> Result<Option<FetcherId>, ChannelError> {
        let Some(id) = self.idle.pop_front() else {
            return Ok(None);
        };

        if let Err(e) = self.links[id].send(Task::Fetch(url)) {
            self.idle.push_front(id);
            return Err(e);
        }

        self.busy.insert(id);
        debug_assert_eq!(self.idle.len() + self.busy.len(), self.links.len());
        Ok(Some(id))
    }

    /// Moves a busy fetcher back to idle
    ///
    /// Returns false if the fetcher was not busy, in which case nothing changes.
    pub fn release(&mut self, id: FetcherId) -> bool {
        if !self.busy.remove(&id) {
            return false;
        }
        self.idle.push_back(id);
        debug_assert_eq!(self.idle.len() + self.busy.len(), self.links.len());
        true
    }

    /// Waits for the next event from any busy fetcher
    pub async fn recv_from_busy(&mut self) -> Result<(FetcherId, FetcherEvent), ChannelError> {
        let busy = &self.busy;
        recv_any(
            self.links
                .iter_mut()
                .enumerate()
                .filter(|(id, _)| busy.contains(id)),
        )
        .await
    }

    /// Waits for the next event from any fetcher not in `exclude`
    pub async fn recv_excluding(
        &mut self,
        exclude: &HashSet<FetcherId>,
    ) -> Result<(FetcherId, FetcherEvent), ChannelError> {
        recv_any(
            self.links
                .iter_mut()
                .enumerate()
                .filter(|(id, _)| !exclude.contains(id)),
        )
        .await
    }

    /// Sends `Task::Terminate` to every fetcher
    pub fn terminate_all(&self) -> Result<(), ChannelError> {
        for link in &self.links {
            link.send(Task::Terminate)?;
        }
        Ok(())
    }
}
