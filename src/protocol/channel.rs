//! Typed point-to-point links between a parent and one child
//!
//! Each parent/child pair owns one `Link` at each end. A link is reliable and FIFO in
//! each direction. `recv_any` lets a parent wait on a chosen subset of its links and
//! serve whichever child answers first.

use futures::future::select_all;
use thiserror::Error;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Errors raised by link operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("peer endpoint closed")]
    Closed,

    #[error("no links to receive from")]
    NoLinks,
}

/// One end of a parent/child link: sends `Out`, receives `In`
pub struct Link<Out, In> {
    tx: UnboundedSender<Out>,
    rx: UnboundedReceiver<In>,
}

/// Creates a connected pair of link endpoints
///
/// The first endpoint sends `A` and receives `B`; the second is its mirror.
///
/// # Example
///
/// ```
/// use hive_crawl::protocol::link;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (parent, mut child) = link::<String, u32>();
/// parent.send("hello".to_string()).unwrap();
/// assert_eq!(child.recv().await.unwrap(), "hello");
/// # }
/// ```
pub fn link<A, B>() -> (Link<A, B>, Link<B, A>) {
    let (a_tx, a_rx) = unbounded_channel::<A>();
    let (b_tx, b_rx) = unbounded_channel::<B>();
    (Link { tx: a_tx, rx: b_rx }, Link { tx: b_tx, rx: a_rx })
}

impl<Out, In> Link<Out, In> {
    /// Sends a message to the peer without waiting
    pub fn send(&self, msg: Out) -> Result<(), ChannelError> {
        self.tx.send(msg).map_err(|_| ChannelError::Closed)
    }

    /// Waits for the next message from the peer
    pub async fn recv(&mut self) -> Result<In, ChannelError> {
        self.rx.recv().await.ok_or(ChannelError::Closed)
    }
}

/// Waits for the first message from any of the given links
///
/// Each link is paired with the identity reported back alongside its message. Losing
/// links are left untouched: a pending receive on a tokio channel is cancel safe, so no
/// message is consumed from them.
pub async fn recv_any<'a, Out, In, I>(links: I) -> Result<(usize, In), ChannelError>
where
    I: IntoIterator<Item = (usize, &'a mut Link<Out, In>)>,
    Out: 'a,
    In: 'a,
{
    let pending: Vec<_> = links
        .into_iter()
        .map(|(id, link)| Box::pin(async move { (id, link.rx.recv().await) }))
        .collect();

    if pending.is_empty() {
        return Err(ChannelError::NoLinks);
    }

    let ((id, msg), _, _) = select_all(pending).await;
    msg.map(|m| (id, m)).ok_or(ChannelError::Closed)
}
