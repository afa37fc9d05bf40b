// SPDX-License-Identifier: GPL-3.0

//! WebSocket transport to a node's JSON-RPC endpoint.
//!
//! A [`Connection`] owns exactly one [`WsClient`] session. It performs no retries: acquiring a
//! connection with backoff is the runner's job. The future returned by [`Connection::connect`]
//! resolving is the readiness signal, there is nothing to poll.

use crate::{ChainApi, config::DEFAULT_REQUEST_TIMEOUT, error::ConnectionError};
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use std::time::Duration;
use url::Url;

/// Lifecycle of a [`Connection`].
///
/// [`Connection::state`] reports `Ready`, `Closed` or `Failed`. `Connecting` only names the
/// handshake: a [`Connection`] exists once [`Connection::connect`] has resolved, so no caller can
/// observe it. The runner reports the handshake as
/// [`RunnerState::AcquiringConnection`](crate::RunnerState::AcquiringConnection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
	/// The handshake is in progress. Never returned by [`Connection::state`].
	Connecting,
	/// The session is open and accepts requests.
	Ready,
	/// The session was closed locally.
	Closed,
	/// The session was lost, e.g. the node went away.
	Failed,
}

/// A single WebSocket session with a node.
///
/// Dropping the connection closes the session.
#[derive(Debug)]
pub struct Connection {
	endpoint: Url,
	request_timeout: Duration,
	client: Option<WsClient>,
}

impl Connection {
	/// Connect to a node using the default request deadline.
	///
	/// # Arguments
	/// * `endpoint` - WebSocket URL of the node's RPC endpoint (e.g., `ws://127.0.0.1:8546`)
	pub async fn connect(endpoint: &Url) -> Result<Self, ConnectionError> {
		Self::connect_with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT).await
	}

	/// Connect to a node, failing any later request that takes longer than `request_timeout`.
	///
	/// The same deadline bounds the WebSocket handshake.
	pub async fn connect_with_timeout(
		endpoint: &Url,
		request_timeout: Duration,
	) -> Result<Self, ConnectionError> {
		if !matches!(endpoint.scheme(), "ws" | "wss") {
			return Err(ConnectionError::InvalidEndpoint { endpoint: endpoint.to_string() });
		}

		log::debug!("Connecting to {endpoint}");
		let client = WsClientBuilder::default()
			.request_timeout(request_timeout)
			.connection_timeout(request_timeout)
			.build(endpoint.as_str())
			.await
			.map_err(|e| ConnectionError::ConnectionFailed {
				endpoint: endpoint.to_string(),
				message: e.to_string(),
			})?;
		log::info!("Connected to {endpoint}");

		Ok(Self { endpoint: endpoint.clone(), request_timeout, client: Some(client) })
	}

	/// Get the endpoint URL this connection points at.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Deadline applied to every request on this connection.
	pub fn request_timeout(&self) -> Duration {
		self.request_timeout
	}

	/// Whether the session is open and accepts requests.
	pub fn is_ready(&self) -> bool {
		self.state() == ConnectionState::Ready
	}

	/// Current lifecycle state: `Ready`, `Closed` or `Failed`.
	pub fn state(&self) -> ConnectionState {
		match &self.client {
			None => ConnectionState::Closed,
			Some(client) if client.is_connected() => ConnectionState::Ready,
			Some(_) => ConnectionState::Failed,
		}
	}

	/// Close the session and release the socket. Calling it again has no effect.
	pub fn close(&mut self) {
		if self.client.take().is_some() {
			log::info!("Closed connection to {}", self.endpoint);
		}
	}

	/// Typed RPC methods over this connection.
	pub fn api(&self) -> ChainApi<'_> {
		ChainApi::new(self)
	}

	/// The underlying client, or an error once the connection is closed.
	pub(crate) fn client(&self) -> Result<&WsClient, ConnectionError> {
		self.client
			.as_ref()
			.ok_or_else(|| ConnectionError::Closed { endpoint: self.endpoint.to_string() })
	}
}

impl Drop for Connection {
	fn drop(&mut self) {
		self.close();
	}
}
