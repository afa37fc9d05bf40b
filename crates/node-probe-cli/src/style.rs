// SPDX-License-Identifier: GPL-3.0

pub(crate) use console::style;

pub(crate) fn get_styles() -> clap::builder::Styles {
	use clap::builder::styling::{AnsiColor, Color, Style};
	clap::builder::Styles::styled()
		.usage(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::BrightCyan))))
		.header(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::BrightCyan))))
		.literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightMagenta))))
		.invalid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
		.error(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

/// Formats an endpoint with bold and underlined style.
pub(crate) fn format_endpoint(endpoint: &str) -> String {
	format!("{}", style(endpoint).bold().underlined())
}
