// SPDX-License-Identifier: GPL-3.0

//! Run-level error types.

use crate::error::ConnectionError;
use thiserror::Error;

/// Errors that abort a whole harness run.
#[derive(Debug, Error)]
pub enum HarnessError {
	/// No connection could be acquired after exhausting every attempt.
	#[error("Node at {endpoint} unavailable after {attempts} attempts: {source}")]
	ConnectionUnavailable {
		/// The endpoint that was tried.
		endpoint: String,
		/// How many connection attempts were made.
		attempts: u32,
		/// The error from the last attempt.
		#[source]
		source: ConnectionError,
	},
}
