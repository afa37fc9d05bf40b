// SPDX-License-Identifier: GPL-3.0

use crate::{output::OutputMode, style, suite::SuiteOptions};
use clap::Parser;
use node_probe::HarnessConfig;
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Bob's development account.
const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

/// Run the conformance suite against a node's JSON-RPC endpoint.
#[derive(Parser, Debug)]
#[command(author, version, about, styles = style::get_styles())]
pub(crate) struct Cli {
	/// WebSocket endpoint of the node under test.
	#[arg(short, long, env = "NODE_PROBE_ENDPOINT", default_value = "ws://127.0.0.1:8546")]
	pub(crate) endpoint: Url,

	/// Deadline for a single RPC request, in seconds.
	#[arg(long, default_value_t = 5)]
	pub(crate) timeout: u64,

	/// Connection retries after the first failed attempt.
	#[arg(long, default_value_t = 2)]
	pub(crate) retries: u32,

	/// Wait between connection attempts, in seconds.
	#[arg(long, default_value_t = 2)]
	pub(crate) retry_delay: u64,

	/// Upper bound for a single case, in seconds.
	#[arg(long, default_value_t = 120)]
	pub(crate) case_timeout: u64,

	/// Secret URI of the account signing extrinsics.
	#[arg(long, default_value = "//Alice")]
	pub(crate) suri: String,

	/// Destination of the transfer case.
	#[arg(long, default_value = BOB)]
	pub(crate) dest: String,

	/// Amount transferred by the transfer case.
	#[arg(long, default_value_t = 12345)]
	pub(crate) amount: u128,

	/// WASM runtime used by the upgrade case. The case is skipped when the file is missing.
	#[arg(long, default_value = "node_runtime.compact.wasm")]
	pub(crate) runtime: PathBuf,

	/// Expected runtime spec name (substring match).
	#[arg(long, default_value = "westend")]
	pub(crate) expect_spec_name: String,

	/// Expected chain name (substring match).
	#[arg(long, default_value = "Westend")]
	pub(crate) expect_chain: String,

	/// Minimum number of runtime APIs.
	#[arg(long, default_value_t = 11)]
	pub(crate) min_apis: usize,

	/// Skip cases by name, group or `group::name`. Repeatable or comma separated.
	#[arg(long, value_delimiter = ',')]
	pub(crate) skip: Vec<String>,

	/// List the cases and exit.
	#[arg(long)]
	pub(crate) list: bool,

	/// Print the report as JSON.
	#[arg(long)]
	pub(crate) json: bool,
}

impl Cli {
	pub(crate) fn output_mode(&self) -> OutputMode {
		if self.json { OutputMode::Json } else { OutputMode::Human }
	}

	pub(crate) fn harness_config(&self) -> HarnessConfig {
		HarnessConfig {
			endpoint: self.endpoint.clone(),
			request_timeout: Duration::from_secs(self.timeout),
			connection_retries: self.retries,
			retry_delay: Duration::from_secs(self.retry_delay),
			case_timeout: Duration::from_secs(self.case_timeout),
		}
	}

	pub(crate) fn suite_options(&self) -> SuiteOptions {
		SuiteOptions {
			suri: self.suri.clone(),
			dest: self.dest.clone(),
			amount: self.amount,
			runtime: self.runtime.clone(),
			expect_spec_name: self.expect_spec_name.clone(),
			expect_chain: self.expect_chain.clone(),
			min_apis: self.min_apis,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_local_westend_node() {
		let cli = Cli::try_parse_from(["node-probe"]).unwrap();
		let config = cli.harness_config();
		assert_eq!(config.request_timeout, Duration::from_secs(5));
		assert_eq!(config.connection_attempts(), 3);
		assert_eq!(config.retry_delay, Duration::from_secs(2));
		let options = cli.suite_options();
		assert_eq!(options.suri, "//Alice");
		assert_eq!(options.dest, BOB);
		assert_eq!(options.amount, 12345);
		assert_eq!(options.min_apis, 11);
		assert!(cli.skip.is_empty());
		assert_eq!(cli.output_mode(), OutputMode::Human);
	}

	#[test]
	fn parses_overrides() {
		let cli = Cli::try_parse_from([
			"node-probe",
			"-e",
			"wss://westend-rpc.polkadot.io",
			"--retries",
			"0",
			"--skip",
			"tx,upgrade",
			"--skip",
			"chain::block",
		])
		.unwrap();
		assert_eq!(cli.endpoint.as_str(), "wss://westend-rpc.polkadot.io/");
		assert_eq!(cli.harness_config().connection_attempts(), 1);
		assert_eq!(cli.skip, vec!["tx", "upgrade", "chain::block"]);
	}

	#[test]
	fn rejects_malformed_endpoint() {
		assert!(Cli::try_parse_from(["node-probe", "--endpoint", "not a url"]).is_err());
	}
}
