use crate::config;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is
/// one, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),
        Error::MalformedConfigLink { link } => render_malformed_config_link(link),
        Error::ParseFailed { file, reason } => format!("\
# Error: Parse Failed

Could not parse `{}`: {reason}
", file.display()),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Correct `{}` and run the command again.
", config::CONFIG_FILE),
        Error::UnknownPrefix { name } => render_unknown_prefix(name),
        Error::UnknownRule { name } => format!("\
# Error: Unknown Core Rule

The pipeline has no rule named `{name}` to insert after.
"),
        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
    }
}

fn render_malformed_config_link(link: &str) -> String {
    format!(
        "\
# Error: Malformed Config Link

`{link}` uses a prefix with `format = \"config\"`, but config links must
look like `config2:<setting>` or `config3:<setting>`.

## Fix

Register the prefix with another format, or rewrite the link.
"
    )
}

fn render_unknown_prefix(name: &str) -> String {
    format!(
        "\
# Error: Unknown Prefix

Prefix `{name}` is not registered.

## Fix

Add it to `{}`:

    [prefixes.{name}]
    base = \"https://example.com/docs/\"
    format = \"internal\"

Or run:

    anchor-prefixes prefixes add {name} https://example.com/docs/ --format internal
",
        config::CONFIG_FILE
    )
}
