//! Drives an external numeric engine as a co-process.
//!
//! The engine reads commands on stdin and prints on stdout and stderr. Each
//! command is followed by a freshly generated marker the engine echoes back;
//! seeing the marker means everything before it ran. Values cross the
//! boundary in the engine's text save format through `octlink-codec`.
//!
//! ```no_run
//! # async fn demo() -> octlink_session::Result<()> {
//! use octlink_session::{Session, SessionConfig, Value};
//!
//! let session = Session::open(SessionConfig::new("octave-cli").stdout(std::io::stdout())).await?;
//! session.put("a", &Value::scalar(2.0)).await?;
//! session.eval("b = a * 21;").await?;
//! assert_eq!(session.get("b").await?, Some(Value::scalar(42.0)));
//! session.close().await
//! # }
//! ```

mod blocking;
mod config;
mod engine;
mod error;
mod io;
mod output;
mod sentinel;
mod session;
mod state;

pub use blocking::BlockingSession;
pub use config::{BusyPolicy, DEFAULT_ARGS, DEFAULT_CLOSE_TIMEOUT, DEFAULT_ERROR_PREFIX, DEFAULT_STARTUP, SessionConfig, Sink};
pub use error::{Error, Result};
pub use octlink_primitives::{NamedValue, Value};
pub use octlink_worker::CancellationToken;
pub use session::Session;
pub use state::SessionState;
