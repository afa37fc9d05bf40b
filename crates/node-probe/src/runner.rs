// SPDX-License-Identifier: GPL-3.0

//! Sequential case runner with bounded connection acquisition.
//!
//! A run moves through [`RunnerState`]:
//!
//! ```text
//! Init → AcquiringConnection → Ready → TestsRunning → TearingDown → Done
//!                  │
//!                  └──(attempts exhausted)──→ Failed
//! ```
//!
//! The connection is acquired once, shared by every case through a [`HarnessContext`], and closed
//! when the context is torn down after the last case. No case runs when acquisition fails.
//!
//! Cases receive suite-specific data of type `S` through [`HarnessContext::suite`].

use crate::{ChainApi, Connection, HarnessConfig, error::HarnessError};
use futures::{FutureExt, future::BoxFuture};
use std::{
	any::Any,
	fmt,
	panic::AssertUnwindSafe,
	time::{Duration, Instant},
};
use thiserror::Error;

/// Future returned by a case body.
pub type CaseFuture<'a> = BoxFuture<'a, anyhow::Result<()>>;

/// State of a [`Runner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
	/// Nothing happened yet.
	Init,
	/// Connecting to the node, possibly retrying.
	AcquiringConnection,
	/// Connected, no case started.
	Ready,
	/// Running cases.
	TestsRunning,
	/// Closing the connection.
	TearingDown,
	/// Every case ran and the connection is closed.
	Done,
	/// No connection could be acquired.
	Failed,
}

/// A named conformance case.
pub struct TestCase<S = ()> {
	/// Group the case belongs to, e.g. `chain`.
	pub group: &'static str,
	/// Case name, unique within the group.
	pub name: &'static str,
	/// The case body.
	pub run: for<'a> fn(&'a HarnessContext<S>) -> CaseFuture<'a>,
}

impl<S> Clone for TestCase<S> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<S> Copy for TestCase<S> {}

impl<S> TestCase<S> {
	/// Create a case.
	pub const fn new(
		group: &'static str,
		name: &'static str,
		run: for<'a> fn(&'a HarnessContext<S>) -> CaseFuture<'a>,
	) -> Self {
		Self { group, name, run }
	}

	/// Whether `filter` names this case, its group, or `group::name`.
	pub fn matches(&self, filter: &str) -> bool {
		filter == self.name ||
			filter == self.group ||
			filter.split_once("::") == Some((self.group, self.name))
	}
}

impl<S> fmt::Display for TestCase<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{}", self.group, self.name)
	}
}

impl<S> fmt::Debug for TestCase<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TestCase({self})")
	}
}

/// Returned by a case body to mark the case as skipped instead of failed.
///
/// ```ignore
/// return Err(Skip("runtime file not found".into()).into());
/// ```
#[derive(Debug, Error)]
#[error("{0}")]
pub struct Skip(pub String);

/// Result of a single case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// Every expectation held.
	Passed,
	/// The case returned an error or timed out.
	Failed(String),
	/// The case did not run to completion on purpose.
	Skipped(String),
}

/// Outcome of one case together with its timing.
#[derive(Debug, Clone)]
pub struct CaseReport {
	/// Group of the case.
	pub group: &'static str,
	/// Name of the case.
	pub name: &'static str,
	/// What happened.
	pub outcome: Outcome,
	/// Wall-clock time spent in the case.
	pub duration: Duration,
}

/// Outcomes of a whole run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct Report {
	/// One entry per case.
	pub cases: Vec<CaseReport>,
}

impl Report {
	fn count(&self, f: impl Fn(&Outcome) -> bool) -> usize {
		self.cases.iter().filter(|case| f(&case.outcome)).count()
	}

	/// Number of passed cases.
	pub fn passed(&self) -> usize {
		self.count(|outcome| matches!(outcome, Outcome::Passed))
	}

	/// Number of failed cases.
	pub fn failed(&self) -> usize {
		self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
	}

	/// Number of skipped cases.
	pub fn skipped(&self) -> usize {
		self.count(|outcome| matches!(outcome, Outcome::Skipped(_)))
	}

	/// Whether no case failed.
	pub fn is_success(&self) -> bool {
		self.failed() == 0
	}
}

/// Shared state handed to every case.
#[derive(Debug)]
pub struct HarnessContext<S = ()> {
	connection: Connection,
	config: HarnessConfig,
	suite: S,
}

impl<S> HarnessContext<S> {
	/// Typed RPC methods over the shared connection.
	pub fn api(&self) -> ChainApi<'_> {
		self.connection.api()
	}

	/// The shared connection.
	pub fn connection(&self) -> &Connection {
		&self.connection
	}

	/// Configuration of the run.
	pub fn config(&self) -> &HarnessConfig {
		&self.config
	}

	/// Suite-specific data.
	pub fn suite(&self) -> &S {
		&self.suite
	}

	fn tear_down(mut self) {
		self.connection.close();
	}
}

/// Runs cases in order against a single connection.
#[derive(Debug)]
pub struct Runner {
	config: HarnessConfig,
	skip: Vec<String>,
	state: RunnerState,
}

impl Runner {
	/// Create a runner for `config`.
	pub fn new(config: HarnessConfig) -> Self {
		Self { config, skip: Vec::new(), state: RunnerState::Init }
	}

	/// Skip every case matching one of `filters` (case name, group, or `group::name`).
	pub fn with_skipped<S: Into<String>>(mut self, filters: impl IntoIterator<Item = S>) -> Self {
		self.skip.extend(filters.into_iter().map(Into::into));
		self
	}

	/// Current state.
	pub fn state(&self) -> RunnerState {
		self.state
	}

	/// Configuration of this runner.
	pub fn config(&self) -> &HarnessConfig {
		&self.config
	}

	fn transition(&mut self, next: RunnerState) {
		log::debug!("Runner {:?} -> {next:?}", self.state);
		self.state = next;
	}

	/// Connect, retrying up to the configured number of times.
	async fn acquire_connection(&mut self) -> Result<Connection, HarnessError> {
		self.transition(RunnerState::AcquiringConnection);
		let endpoint = &self.config.endpoint;
		let attempts = self.config.connection_attempts();
		let mut attempt = 1;
		loop {
			match Connection::connect_with_timeout(endpoint, self.config.request_timeout).await {
				Ok(connection) => return Ok(connection),
				Err(e) if attempt < attempts => {
					log::warn!(
						"Connection attempt {attempt}/{attempts} failed: {e}. Retrying in {:?}",
						self.config.retry_delay
					);
					tokio::time::sleep(self.config.retry_delay).await;
					attempt += 1;
				},
				Err(e) =>
					return Err(HarnessError::ConnectionUnavailable {
						endpoint: endpoint.to_string(),
						attempts,
						source: e,
					}),
			}
		}
	}

	/// Run `cases` in order with `suite` data and tear down.
	///
	/// Fails only when no connection can be acquired, in which case no case runs. Failing cases
	/// are recorded in the report and do not stop the run.
	pub async fn run<S>(&mut self, cases: &[TestCase<S>], suite: S) -> Result<Report, HarnessError> {
		self.state = RunnerState::Init;
		let connection = match self.acquire_connection().await {
			Ok(connection) => connection,
			Err(e) => {
				self.transition(RunnerState::Failed);
				log::error!("{e}");
				return Err(e);
			},
		};
		self.transition(RunnerState::Ready);
		let context = HarnessContext { connection, config: self.config.clone(), suite };

		self.transition(RunnerState::TestsRunning);
		let mut report = Report::default();
		for case in cases {
			let start = Instant::now();
			let outcome = if self.skip.iter().any(|filter| case.matches(filter)) {
				Outcome::Skipped("excluded by filter".to_string())
			} else {
				self.run_case(case, &context).await
			};
			match &outcome {
				Outcome::Passed => log::info!("{case} passed"),
				Outcome::Failed(reason) => log::warn!("{case} failed: {reason}"),
				Outcome::Skipped(reason) => log::info!("{case} skipped: {reason}"),
			}
			report.cases.push(CaseReport {
				group: case.group,
				name: case.name,
				outcome,
				duration: start.elapsed(),
			});
		}

		self.transition(RunnerState::TearingDown);
		context.tear_down();
		self.transition(RunnerState::Done);
		Ok(report)
	}

	async fn run_case<S>(&self, case: &TestCase<S>, context: &HarnessContext<S>) -> Outcome {
		log::debug!("Running {case}");
		// A panicking case fails on its own instead of ending the run.
		let body = AssertUnwindSafe((case.run)(context)).catch_unwind();
		match tokio::time::timeout(self.config.case_timeout, body).await {
			Ok(Ok(Ok(()))) => Outcome::Passed,
			Ok(Ok(Err(e))) => match e.downcast_ref::<Skip>() {
				Some(skip) => Outcome::Skipped(skip.0.clone()),
				None => Outcome::Failed(format!("{e:#}")),
			},
			Ok(Err(panic)) => Outcome::Failed(format!("panicked: {}", panic_message(&*panic))),
			Err(_) => Outcome::Failed(format!("timed out after {:?}", self.config.case_timeout)),
		}
	}
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
	match panic.downcast_ref::<&'static str>() {
		Some(message) => message,
		None => panic.downcast_ref::<String>().map(String::as_str).unwrap_or("unknown cause"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{MockNode, unused_endpoint};
	use anyhow::{anyhow, ensure};
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn fast_config(endpoint: url::Url) -> HarnessConfig {
		HarnessConfig {
			request_timeout: Duration::from_secs(1),
			retry_delay: Duration::from_millis(50),
			..HarnessConfig::new(endpoint)
		}
	}

	fn chain_name(ctx: &HarnessContext) -> CaseFuture<'_> {
		Box::pin(async move {
			let chain = ctx.api().system_chain().await?;
			ensure!(chain.contains("Westend"), "unexpected chain {chain}");
			Ok(())
		})
	}

	fn failing(_: &HarnessContext) -> CaseFuture<'_> {
		Box::pin(async move { Err(anyhow!("expected 1, got 2")) })
	}

	fn skipping(_: &HarnessContext) -> CaseFuture<'_> {
		Box::pin(async move { Err(Skip("not applicable".into()).into()) })
	}

	fn connection_is_ready(ctx: &HarnessContext) -> CaseFuture<'_> {
		Box::pin(async move {
			ensure!(ctx.connection().is_ready(), "connection not ready");
			ensure!(ctx.config().connection_attempts() == 3, "unexpected config");
			Ok(())
		})
	}

	fn slow(_: &HarnessContext) -> CaseFuture<'_> {
		Box::pin(async move {
			tokio::time::sleep(Duration::from_secs(5)).await;
			Ok(())
		})
	}

	fn panicking(_: &HarnessContext) -> CaseFuture<'_> {
		Box::pin(async move {
			let numbers: Vec<u32> = Vec::new();
			ensure!(numbers[3] > 0, "unreachable");
			Ok(())
		})
	}

	static NEVER_RUN: AtomicUsize = AtomicUsize::new(0);

	fn counting(_: &HarnessContext) -> CaseFuture<'_> {
		Box::pin(async move {
			NEVER_RUN.fetch_add(1, Ordering::SeqCst);
			Ok(())
		})
	}

	#[tokio::test]
	async fn unreachable_node_fails_after_three_attempts() {
		let config = fast_config(unused_endpoint().await);
		let mut runner = Runner::new(config);
		let start = Instant::now();

		let err = runner.run(&[TestCase::new("test", "counting", counting)], ()).await.unwrap_err();

		let HarnessError::ConnectionUnavailable { attempts, .. } = err;
		assert_eq!(attempts, 3);
		// Two waits between three attempts.
		assert!(start.elapsed() >= Duration::from_millis(100));
		assert_eq!(runner.state(), RunnerState::Failed);
		assert_eq!(NEVER_RUN.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn failing_case_does_not_stop_the_run() {
		let node = MockNode::start().await;
		let mut runner = Runner::new(fast_config(node.endpoint()));
		let cases = [
			TestCase::new("system", "chain", chain_name),
			TestCase::new("system", "failing", failing),
			TestCase::new("system", "skipping", skipping),
			TestCase::new("system", "ready", connection_is_ready),
		];

		let report = runner.run(&cases, ()).await.unwrap();

		assert_eq!(runner.state(), RunnerState::Done);
		let outcomes: Vec<_> = report.cases.iter().map(|c| c.outcome.clone()).collect();
		assert_eq!(outcomes, vec![
			Outcome::Passed,
			Outcome::Failed("expected 1, got 2".to_string()),
			Outcome::Skipped("not applicable".to_string()),
			Outcome::Passed,
		]);
		assert_eq!((report.passed(), report.failed(), report.skipped()), (2, 1, 1));
		assert!(!report.is_success());
	}

	#[tokio::test]
	async fn filtered_cases_are_skipped() {
		let node = MockNode::start().await;
		let mut runner =
			Runner::new(fast_config(node.endpoint())).with_skipped(["failing", "other::chain"]);
		let cases = [
			TestCase::new("system", "chain", chain_name),
			TestCase::new("system", "failing", failing),
		];

		let report = runner.run(&cases, ()).await.unwrap();

		assert_eq!(report.cases[0].outcome, Outcome::Passed);
		assert!(matches!(report.cases[1].outcome, Outcome::Skipped(_)));
		assert!(report.is_success());
	}

	#[tokio::test]
	async fn slow_case_times_out() {
		let node = MockNode::start().await;
		let config =
			HarnessConfig { case_timeout: Duration::from_millis(50), ..fast_config(node.endpoint()) };
		let mut runner = Runner::new(config);

		let report = runner.run(&[TestCase::new("test", "slow", slow)], ()).await.unwrap();

		match &report.cases[0].outcome {
			Outcome::Failed(reason) => assert!(reason.contains("timed out")),
			other => panic!("Expected timeout failure, got: {other:?}"),
		}
	}

	#[tokio::test]
	async fn panicking_case_fails_and_the_run_continues() {
		let node = MockNode::start().await;
		let mut runner = Runner::new(fast_config(node.endpoint()));
		let cases = [
			TestCase::new("test", "panicking", panicking),
			TestCase::new("system", "chain", chain_name),
		];

		let report = runner.run(&cases, ()).await.unwrap();

		assert_eq!(runner.state(), RunnerState::Done);
		match &report.cases[0].outcome {
			Outcome::Failed(reason) => {
				assert!(reason.starts_with("panicked: index out of bounds"), "got: {reason}")
			},
			other => panic!("Expected panic failure, got: {other:?}"),
		}
		assert_eq!(report.cases[1].outcome, Outcome::Passed);
	}

	#[test]
	fn case_matches_name_group_and_path() {
		let case = TestCase::new("chain", "header", failing);
		assert!(case.matches("header"));
		assert!(case.matches("chain"));
		assert!(case.matches("chain::header"));
		assert!(!case.matches("state::header"));
		assert_eq!(case.to_string(), "chain::header");
	}
}
