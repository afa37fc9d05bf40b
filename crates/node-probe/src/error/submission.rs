// SPDX-License-Identifier: GPL-3.0

//! Extrinsic submission error types.

use crate::error::ConnectionError;
use thiserror::Error;

/// Errors that can occur when building, signing or submitting an extrinsic.
#[derive(Debug, Error)]
pub enum SubmissionError {
	/// The chain client could not be set up against the node.
	#[error("Failed to set up chain client for {endpoint}: {message}")]
	ClientSetup {
		/// The node endpoint.
		endpoint: String,
		/// The error message describing the failure.
		message: String,
	},
	/// None of the candidate call paths exist in the node's call table.
	#[error("Unsupported call: none of {candidates} exist in the runtime")]
	UnsupportedCall {
		/// The call paths that were tried, in order.
		candidates: String,
	},
	/// The secret URI could not be turned into a keypair.
	#[error("Invalid signer: {0}")]
	InvalidSigner(String),
	/// The destination address could not be parsed.
	#[error("Invalid address `{address}`: {message}")]
	InvalidAddress {
		/// The rejected address.
		address: String,
		/// The parse error.
		message: String,
	},
	/// The node rejected the extrinsic or the submission failed.
	#[error("Extrinsic submission failed: {0}")]
	Rejected(String),
	/// The extrinsic left the pool without being finalized.
	#[error("Extrinsic was not finalized: {0}")]
	NotFinalized(String),
	/// The connection is not usable.
	#[error(transparent)]
	Connection(#[from] ConnectionError),
}
