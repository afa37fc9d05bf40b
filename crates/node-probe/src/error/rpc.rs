// SPDX-License-Identifier: GPL-3.0

//! RPC call error types.

use crate::error::ConnectionError;
use jsonrpsee::core::ClientError;
use thiserror::Error;

/// Errors that can occur when calling a node RPC method.
#[derive(Debug, Error)]
pub enum RpcError {
	/// The node answered with a JSON-RPC error frame.
	#[error("RPC request `{method}` failed with code {code}: {message}")]
	Node {
		/// The RPC method that was called.
		method: &'static str,
		/// The JSON-RPC error code.
		code: i32,
		/// The error message returned by the node.
		message: String,
	},
	/// No response arrived within the request deadline.
	#[error("RPC request `{method}` timed out")]
	Timeout {
		/// The RPC method that was called.
		method: &'static str,
	},
	/// The response could not be decoded or was unexpectedly empty.
	#[error("Invalid response to `{method}`: {message}")]
	InvalidResponse {
		/// The RPC method that was called.
		method: &'static str,
		/// What was wrong with the response.
		message: String,
	},
	/// The request could not be delivered.
	#[error("RPC request `{method}` failed: {message}")]
	Transport {
		/// The RPC method that was called.
		method: &'static str,
		/// The error message describing the failure.
		message: String,
	},
	/// The connection is not usable.
	#[error(transparent)]
	Connection(#[from] ConnectionError),
}

impl RpcError {
	/// Classify a jsonrpsee client error raised while calling `method`.
	pub(crate) fn from_client(method: &'static str, error: ClientError) -> Self {
		match error {
			ClientError::Call(e) =>
				RpcError::Node { method, code: e.code(), message: e.message().to_string() },
			ClientError::RequestTimeout => RpcError::Timeout { method },
			ClientError::ParseError(e) =>
				RpcError::InvalidResponse { method, message: e.to_string() },
			other => RpcError::Transport { method, message: other.to_string() },
		}
	}

	/// The node returned `null` where a value was required.
	pub(crate) fn missing(method: &'static str, what: impl std::fmt::Display) -> Self {
		RpcError::InvalidResponse { method, message: format!("no {what} returned") }
	}

	/// Whether the error was caused by the request deadline elapsing.
	pub fn is_timeout(&self) -> bool {
		matches!(self, RpcError::Timeout { .. })
	}
}
