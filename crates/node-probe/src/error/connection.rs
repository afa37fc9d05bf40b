// SPDX-License-Identifier: GPL-3.0

//! Transport error types.

use thiserror::Error;

/// Errors that can occur when opening or using the WebSocket connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
	/// The endpoint is not a WebSocket URL.
	#[error("Invalid endpoint {endpoint}: expected a ws:// or wss:// URL")]
	InvalidEndpoint {
		/// The rejected endpoint.
		endpoint: String,
	},
	/// Failed to connect to the RPC endpoint.
	#[error("Failed to connect to {endpoint}: {message}")]
	ConnectionFailed {
		/// The endpoint URL that failed to connect.
		endpoint: String,
		/// The error message describing the failure.
		message: String,
	},
	/// The connection has already been closed.
	#[error("Connection to {endpoint} is closed")]
	Closed {
		/// The endpoint the connection pointed at.
		endpoint: String,
	},
}
