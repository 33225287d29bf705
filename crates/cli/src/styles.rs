//! Help colors for `rc --help`.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Style};

const HEADING: Style = AnsiColor::Green.on_default().bold();
const LITERAL: Style = AnsiColor::Cyan.on_default();
const ERROR: Style = AnsiColor::Red.on_default().bold();

/// Cargo's palette, plus red for usage errors such as an unknown
/// `--default-target`.
pub fn cli_styles() -> Styles {
	Styles::styled()
		.header(HEADING)
		.usage(HEADING)
		.literal(LITERAL)
		.placeholder(LITERAL)
		.valid(LITERAL)
		.error(ERROR)
		.invalid(AnsiColor::Yellow.on_default().bold())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn errors_stand_out_from_headings() {
		let styles = cli_styles();
		assert_eq!(styles.get_header(), &HEADING);
		assert_eq!(styles.get_error(), &ERROR);
		assert_ne!(styles.get_invalid(), styles.get_valid());
	}
}
