// SPDX-License-Identifier: GPL-3.0

use anyhow::Result;
use assert_cmd::Command;
use node_probe::testing::{MockNode, unused_endpoint};
use serde_json::Value;
use std::process::Output;

/// Runs the binary off the async runtime so an in-process mock node keeps serving.
async fn node_probe<const N: usize>(args: [String; N]) -> Result<Output> {
	tokio::task::spawn_blocking(move || {
		let output =
			Command::cargo_bin("node-probe")?.env_remove("NODE_PROBE_ENDPOINT").args(args).output()?;
		Ok(output)
	})
	.await?
}

#[test]
fn list_prints_every_case_in_order() {
	let assert = Command::cargo_bin("node-probe").unwrap().arg("--list").assert().success();
	let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
	let lines: Vec<_> = stdout.lines().collect();
	assert_eq!(lines.first(), Some(&"constants::genesis_hash"));
	assert_eq!(lines.last(), Some(&"upgrade::set_code"));
	assert!(lines.contains(&"tx::transfer"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_node_exits_with_one() -> Result<()> {
	let endpoint = unused_endpoint().await;
	let output = node_probe([
		"--endpoint".into(),
		endpoint.to_string(),
		"--retries".into(),
		"0".into(),
		"--retry-delay".into(),
		"0".into(),
	])
	.await?;
	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8(output.stderr)?.contains("unavailable after 1 attempts"));
	Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn json_report_against_mock_node() -> Result<()> {
	let node = MockNode::start().await;
	let temp = tempfile::tempdir()?;
	let output = node_probe([
		"--endpoint".into(),
		node.endpoint().to_string(),
		"--skip".into(),
		"tx".into(),
		"--runtime".into(),
		temp.path().join("missing.wasm").display().to_string(),
		"--json".into(),
	])
	.await?;
	assert_eq!(output.status.code(), Some(0));

	let report: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(report["schema_version"], 1);
	assert_eq!(report["success"], true);
	assert_eq!(report["failed"], 0);
	assert_eq!(report["skipped"], 2);
	node.stop().await;
	Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_case_exits_with_two() -> Result<()> {
	let node = MockNode::start().await;
	let temp = tempfile::tempdir()?;
	let output = node_probe([
		"--endpoint".into(),
		node.endpoint().to_string(),
		"--skip".into(),
		"tx".into(),
		"--runtime".into(),
		temp.path().join("missing.wasm").display().to_string(),
		"--expect-chain".into(),
		"Kusama".into(),
	])
	.await?;
	assert_eq!(output.status.code(), Some(2));
	let stdout = String::from_utf8(output.stdout)?;
	assert!(stdout.contains("system::chain"));
	assert!(stdout.contains("1 failed"));
	node.stop().await;
	Ok(())
}
