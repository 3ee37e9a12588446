//! Worker runtime shared by engine sessions.
//!
//! Every session runs its pipe writer and pipe drains as tasks on one small,
//! fixed, process-wide tokio runtime, so a wedged child process can only tie
//! up tasks, never the caller's thread. Waits on those tasks are bounded by
//! [`bounded`].

mod class;
mod spawn;
mod token;
mod wait;

pub use class::TaskClass;
pub use spawn::{WORKER_THREADS, block_on, handle, spawn};
pub use token::SequenceClock;
pub use tokio_util::sync::CancellationToken;
pub use wait::{WaitAborted, bounded};
