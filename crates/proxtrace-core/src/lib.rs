//! Proxtrace Core
//!
//! The device side and the matching side of the proximity tracing protocol.
//!
//! - [`TracingState`] owns a device secret and keeps the current daily key
//!   and rolling identifier in step with the clock. A beacon driver calls
//!   [`TracingState::sync_to_now`] periodically and broadcasts the identifier.
//! - [`find_matches`] takes the identifiers this device observed and the
//!   daily keys others disclosed, and reports every (day, interval) at which
//!   an observation is consistent with a disclosure.
//!
//! Everything here is synchronous and I/O free. Time and randomness come from
//! an [`Environment`], so the whole state machine runs deterministically under
//! test. Diagnostics are emitted as `tracing` events; the embedding binary
//! decides where they go.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod container;
pub mod env;
pub mod error;
pub mod matching;
pub mod state;

pub use container::{DisclosedKeys, KeyContainer, MatchList, MatchRecord, ObservedIdentifiers};
pub use env::{EntropyError, Environment};
pub use error::{ErrorCategory, TracingError};
pub use matching::{MatchSummary, find_matches};
pub use state::{StateKind, SyncOutcome, TracingState};
