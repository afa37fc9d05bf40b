// SPDX-License-Identifier: GPL-3.0

use std::time::Duration;
use url::Url;

/// Default node endpoint.
pub(crate) const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8546";
/// Default deadline for a single RPC request.
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Default number of retries after the first connection attempt fails.
const DEFAULT_CONNECTION_RETRIES: u32 = 2;
/// Default wait between connection attempts.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
/// Default upper bound for a single case.
const DEFAULT_CASE_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for a harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
	/// WebSocket endpoint of the node under test.
	pub endpoint: Url,
	/// Deadline for each RPC request.
	pub request_timeout: Duration,
	/// Retries after the first failed connection attempt.
	pub connection_retries: u32,
	/// Wait between connection attempts.
	pub retry_delay: Duration,
	/// Upper bound for a single case, including any subscription or finality wait.
	pub case_timeout: Duration,
}

impl HarnessConfig {
	/// Create a configuration for `endpoint` with default timings.
	pub fn new(endpoint: Url) -> Self {
		Self { endpoint, ..Default::default() }
	}

	/// Total number of connection attempts, including the first one.
	pub fn connection_attempts(&self) -> u32 {
		self.connection_retries.saturating_add(1)
	}
}

impl Default for HarnessConfig {
	fn default() -> Self {
		Self {
			endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			connection_retries: DEFAULT_CONNECTION_RETRIES,
			retry_delay: DEFAULT_RETRY_DELAY,
			case_timeout: DEFAULT_CASE_TIMEOUT,
		}
	}
}
