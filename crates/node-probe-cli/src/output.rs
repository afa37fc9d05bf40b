// SPDX-License-Identifier: GPL-3.0

use crate::style::style;
use node_probe::{Outcome, Report};
use serde::Serialize;

/// Determines how the report is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum OutputMode {
	#[default]
	Human,
	Json,
}

/// JSON rendering of a [`Report`].
#[derive(Debug, Serialize)]
pub(crate) struct JsonReport<'a> {
	schema_version: u32,
	success: bool,
	passed: usize,
	failed: usize,
	skipped: usize,
	cases: Vec<JsonCase<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonCase<'a> {
	group: &'a str,
	name: &'a str,
	outcome: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	reason: Option<&'a str>,
	duration_ms: u64,
}

impl<'a> From<&'a Report> for JsonReport<'a> {
	fn from(report: &'a Report) -> Self {
		let cases = report
			.cases
			.iter()
			.map(|case| {
				let (outcome, reason) = match &case.outcome {
					Outcome::Passed => ("passed", None),
					Outcome::Failed(reason) => ("failed", Some(reason.as_str())),
					Outcome::Skipped(reason) => ("skipped", Some(reason.as_str())),
				};
				JsonCase {
					group: case.group,
					name: case.name,
					outcome,
					reason,
					duration_ms: u64::try_from(case.duration.as_millis()).unwrap_or(u64::MAX),
				}
			})
			.collect();
		Self {
			schema_version: 1,
			success: report.is_success(),
			passed: report.passed(),
			failed: report.failed(),
			skipped: report.skipped(),
			cases,
		}
	}
}

/// Render the report as one line per case followed by a summary.
pub(crate) fn render_human(report: &Report) -> String {
	let mut out = String::new();
	for case in &report.cases {
		let id = format!("{}::{}", case.group, case.name);
		let line = match &case.outcome {
			Outcome::Passed => format!(
				"{} {id} {}\n",
				style("✔").green(),
				style(format!("({} ms)", case.duration.as_millis())).dim()
			),
			Outcome::Failed(reason) =>
				format!("{} {id}\n    {}\n", style("✘").red(), style(reason).red()),
			Outcome::Skipped(reason) =>
				format!("{} {id} {}\n", style("-").yellow(), style(reason).dim()),
		};
		out.push_str(&line);
	}
	let summary = format!(
		"{} passed, {} failed, {} skipped",
		report.passed(),
		report.failed(),
		report.skipped()
	);
	let summary = if report.is_success() {
		style(summary).green().bold()
	} else {
		style(summary).red().bold()
	};
	out.push_str(&format!("\n{summary}\n"));
	out
}

/// Print the report to stdout in the requested mode.
pub(crate) fn print_report(report: &Report, mode: OutputMode) {
	match mode {
		OutputMode::Human => print!("{}", render_human(report)),
		OutputMode::Json => match serde_json::to_string(&JsonReport::from(report)) {
			Ok(json) => println!("{json}"),
			Err(e) => eprintln!("fatal: failed to serialize JSON report: {e}"),
		},
	}
}
