//! Help output colors.

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;

/// Headers and usage in bold yellow, literals and placeholders in blue.
pub fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default().bold())
		.usage(AnsiColor::Yellow.on_default().bold())
		.literal(AnsiColor::Blue.on_default())
		.placeholder(AnsiColor::Blue.on_default().dimmed())
		.error(AnsiColor::Red.on_default().bold())
}
