//! Message protocol shared by every parent/child pair
//!
//! This module contains:
//! - Typed links with a "receive from any" primitive
//! - The task, result and signal messages that flow over them

mod channel;
mod messages;

pub use channel::{link, recv_any, ChannelError, Link};
pub use messages::{
    FetcherEvent, FetcherId, PageOutcome, SupervisorCommand, SupervisorEvent, SupervisorId, Task,
};
