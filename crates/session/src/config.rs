//! Configuration for starting an engine session.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use octlink_codec::CodecRegistry;
use serde::{Deserialize, Deserializer};

use crate::Result;

/// Destination for text the engine prints.
pub type Sink = Box<dyn Write + Send>;

/// Arguments that keep the engine quiet and free of user configuration.
pub const DEFAULT_ARGS: [&str; 5] = [
	"--no-history",
	"--no-init-file",
	"--no-line-editing",
	"--no-site-file",
	"--silent",
];

/// Commands run once after spawning. Paging would block on a pipe.
pub const DEFAULT_STARTUP: [&str; 1] = ["more off"];

pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Prefix of the first line of an error report on stderr.
pub const DEFAULT_ERROR_PREFIX: &str = "error: ";

/// What a command does when another one is already in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyPolicy {
	/// Wait for the running command to finish.
	#[default]
	Queue,
	/// Fail immediately with [`Error::Busy`](crate::Error::Busy).
	Reject,
}

/// Configuration for starting an engine session.
///
/// Loadable from TOML; the sinks and the codec registry can only be set in
/// code.
///
/// ```toml
/// program = "/usr/bin/octave-cli"
/// cwd = "/srv/models"
/// eval_timeout = 30
/// busy = "reject"
///
/// [env]
/// OCTAVE_HISTFILE = "/dev/null"
/// ```
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
	/// Engine executable.
	pub program: PathBuf,
	pub args: Vec<String>,
	/// Variables set on top of the inherited environment.
	pub env: HashMap<String, String>,
	pub cwd: Option<PathBuf>,
	pub startup_commands: Vec<String>,
	/// Upper bound for one command, in seconds in TOML. Unbounded when unset.
	#[serde(deserialize_with = "optional_secs")]
	pub eval_timeout: Option<Duration>,
	/// How long `close` waits for the engine to exit before killing it.
	#[serde(deserialize_with = "secs")]
	pub close_timeout: Duration,
	pub busy: BusyPolicy,
	pub error_prefix: String,
	/// Receives what commands print on stdout. Discarded when unset.
	#[serde(skip)]
	pub stdout: Option<Sink>,
	/// Receives what commands print on stderr. Discarded when unset.
	#[serde(skip)]
	pub stderr: Option<Sink>,
	/// Codecs used by `put` and `get`. The global registry when unset.
	#[serde(skip)]
	pub registry: Option<Arc<CodecRegistry>>,
}

impl SessionConfig {
	pub fn new(program: impl Into<PathBuf>) -> Self {
		Self {
			program: program.into(),
			..Self::default()
		}
	}

	/// Parses a TOML document. Missing keys take their defaults.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let text = std::fs::read_to_string(path.as_ref())?;
		Self::from_toml_str(&text)
	}

	/// Replaces the argument list.
	pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.args = args.into_iter().map(Into::into).collect();
		self
	}

	/// Sets an environment variable for the engine.
	pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.env.insert(key.into(), value.into());
		self
	}

	pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
		self.cwd = Some(dir.into());
		self
	}

	/// Replaces the startup commands.
	pub fn startup_commands(mut self, commands: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.startup_commands = commands.into_iter().map(Into::into).collect();
		self
	}

	pub fn eval_timeout(mut self, timeout: Duration) -> Self {
		self.eval_timeout = Some(timeout);
		self
	}

	pub fn close_timeout(mut self, timeout: Duration) -> Self {
		self.close_timeout = timeout;
		self
	}

	pub fn busy(mut self, policy: BusyPolicy) -> Self {
		self.busy = policy;
		self
	}

	pub fn error_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.error_prefix = prefix.into();
		self
	}

	pub fn stdout(mut self, sink: impl Write + Send + 'static) -> Self {
		self.stdout = Some(Box::new(sink));
		self
	}

	pub fn stderr(mut self, sink: impl Write + Send + 'static) -> Self {
		self.stderr = Some(Box::new(sink));
		self
	}

	pub fn registry(mut self, registry: Arc<CodecRegistry>) -> Self {
		self.registry = Some(registry);
		self
	}
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			program: PathBuf::from("octave"),
			args: DEFAULT_ARGS.map(String::from).to_vec(),
			env: HashMap::new(),
			cwd: None,
			startup_commands: DEFAULT_STARTUP.map(String::from).to_vec(),
			eval_timeout: None,
			close_timeout: DEFAULT_CLOSE_TIMEOUT,
			busy: BusyPolicy::default(),
			error_prefix: DEFAULT_ERROR_PREFIX.to_owned(),
			stdout: None,
			stderr: None,
			registry: None,
		}
	}
}

impl fmt::Debug for SessionConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionConfig")
			.field("program", &self.program)
			.field("args", &self.args)
			.field("env", &self.env)
			.field("cwd", &self.cwd)
			.field("startup_commands", &self.startup_commands)
			.field("eval_timeout", &self.eval_timeout)
			.field("close_timeout", &self.close_timeout)
			.field("busy", &self.busy)
			.field("error_prefix", &self.error_prefix)
			.field("stdout", &self.stdout.is_some())
			.field("stderr", &self.stderr.is_some())
			.field("registry", &self.registry.is_some())
			.finish()
	}
}

fn secs<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Duration, D::Error> {
	let secs = f64::deserialize(de)?;
	Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}

fn optional_secs<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<Duration>, D::Error> {
	secs(de).map(Some)
}
