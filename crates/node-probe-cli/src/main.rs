// SPDX-License-Identifier: GPL-3.0

mod cli;
mod output;
mod style;
mod suite;

use clap::Parser;
use cli::Cli;
use node_probe::{LIBRARY_INFO, Runner};
use std::process::ExitCode;
use style::{format_endpoint, style};

/// Every case passed or was skipped.
const EXIT_SUCCESS: u8 = 0;
/// The node could not be reached.
const EXIT_UNREACHABLE: u8 = 1;
/// At least one case failed.
const EXIT_FAILED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let cli = Cli::parse();

	let cases = suite::cases();
	if cli.list {
		for case in &cases {
			println!("{case}");
		}
		return ExitCode::from(EXIT_SUCCESS);
	}

	let mode = cli.output_mode();
	if mode == output::OutputMode::Human {
		println!(
			"{} {LIBRARY_INFO} against {}\n",
			style("node-probe").bold(),
			format_endpoint(cli.endpoint.as_str())
		);
	}

	let mut runner = Runner::new(cli.harness_config()).with_skipped(cli.skip.clone());
	match runner.run(&cases, cli.suite_options()).await {
		Ok(report) => {
			output::print_report(&report, mode);
			if report.is_success() {
				ExitCode::from(EXIT_SUCCESS)
			} else {
				ExitCode::from(EXIT_FAILED)
			}
		},
		Err(e) => {
			eprintln!("{} {e:#}", style("fatal:").red().bold());
			ExitCode::from(EXIT_UNREACHABLE)
		},
	}
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	Cli::command().debug_assert()
}
