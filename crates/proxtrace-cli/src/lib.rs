//! Command-line front end for proxtrace.
//!
//! Wraps [`proxtrace_core`] with the pieces a real process needs: the system
//! clock and OS RNG ([`SystemEnv`]), text key files ([`keyfile`]) and the
//! command implementations behind the `proxtrace` binary ([`commands`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod commands;
mod error;
pub mod keyfile;
mod system_env;

pub use commands::Schedule;
pub use error::CliError;
pub use system_env::SystemEnv;
