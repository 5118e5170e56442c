use std::path::PathBuf;

use serde::Serialize;

use crate::config;

/// Output the comprehensive anchor-prefixes reference document.
pub fn run(json: bool) {
    let root = PathBuf::from(".");
    let state = gather_state(&root);

    if json {
        print_json(&state);
    } else {
        print_markdown(&state);
    }
}

// ── State gathering ───────────────────────────────────────────────────

/// Snapshot of the working directory's configuration.
struct CurrentState {
    /// Whether `.anchor-prefixes.toml` exists.
    config_found: bool,
    /// Registered prefixes as `(name, base, format)`, sorted by name.
    prefixes: Vec<(String, String, Option<String>)>,
}

/// Load whatever config is present; a broken config reads as empty.
fn gather_state(root: &std::path::Path) -> CurrentState {
    let config_found = root.join(config::CONFIG_FILE).exists();

    let prefixes = config::Config::load(root)
        .ok()
        .map(|c| {
            return c
                .prefixes
                .sorted()
                .into_iter()
                .map(|(name, rule)| return (name.to_string(), rule.base.clone(), rule.format.clone()))
                .collect();
        })
        .unwrap_or_default();

    return CurrentState { config_found, prefixes };
}

// ── Markdown output ───────────────────────────────────────────────────

fn print_markdown(state: &CurrentState) {
    let version = env!("CARGO_PKG_VERSION");
    print_markdown_header(version);
    print_markdown_state(state);
    println!();
    print_markdown_exit_codes();
}

fn print_markdown_header(version: &str) {
    print!(
        "\
# anchor-prefixes {version}

Rewrites prefixed shorthand links in markdown docs into full API reference URLs.

## Link Syntax

    [text](prefix:Class)                   class page
    [text](prefix:ns\\Class::method())      method anchor
    [text](prefix:ns\\Class::$property)     property anchor
    [text](prefix:Class::EVENT_NAME)       event constant anchor
    [text](prefix:Class#anchor)            explicit anchor
    [text](config3:settingName)            config setting
    [text](prefix:any/path)                generic substitution

Link text that starts with the same prefix loses it when the link is rewritten.

## Formats

| Format   | Result |
|----------|--------|
| internal | {{base}}ns-class.html#method-name / #property-name / #event-name |
| yii      | {{base}}ns-class#name()-detail / #$name-detail (base with 1.1: Class#name-detail) |
| config   | {{base}}settingname |
| generic  | prefix: replaced by {{base}} |

## Commands

    anchor-prefixes resolve <link>           Print the URL a link resolves to
    anchor-prefixes render <file.md>...      Render markdown to HTML with links rewritten
    anchor-prefixes scan                     List prefixed links and how they resolve
    anchor-prefixes prefixes list            Show registered prefixes
    anchor-prefixes prefixes add <name> <base> --format <format>
    anchor-prefixes prefixes remove <name>

## Configuration (.anchor-prefixes.toml)

    include = [\"docs/\"]                 # only scan these paths
    exclude = [\"docs/archive/\"]         # skip these paths

    [prefixes.yii2]
    base = \"https://www.yiiframework.com/doc/api/2.0/\"
    format = \"yii\"

## Current State

"
    );
}

fn print_markdown_state(state: &CurrentState) {
    if state.config_found {
        println!("Config:   .anchor-prefixes.toml (found)");
    } else {
        println!("Config:   .anchor-prefixes.toml (not found)");
    }

    if state.prefixes.is_empty() {
        println!("Prefixes: (none)");
        return;
    }

    println!("Prefixes:");
    for (name, base, format) in &state.prefixes {
        let format = format.as_deref().unwrap_or("(none)");
        println!("  {name}: -> {base} [{format}]");
    }
}

fn print_markdown_exit_codes() {
    print!(
        "\
## Exit Codes

| Code | Meaning |
|------|---------|
| 0    | Success / all links resolved |
| 1    | Link not rewritten / unresolved links found |
| 3    | Runtime error |
"
    );
}

// ── JSON output ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct InfoJson {
    current_state: StateJson,
    exit_codes: Vec<ExitCodeInfo>,
    formats: Vec<&'static str>,
    version: String,
}

#[derive(Serialize)]
struct ExitCodeInfo {
    code: u8,
    meaning: String,
}

#[derive(Serialize)]
struct StateJson {
    config_found: bool,
    prefixes: Vec<PrefixJson>,
}

#[derive(Serialize)]
struct PrefixJson {
    base: String,
    format: Option<String>,
    name: String,
}

fn print_json(state: &CurrentState) {
    let info = InfoJson {
        current_state: StateJson {
            config_found: state.config_found,
            prefixes: state
                .prefixes
                .iter()
                .map(|(name, base, format)| {
                    return PrefixJson {
                        base: base.clone(),
                        format: format.clone(),
                        name: name.clone(),
                    };
                })
                .collect(),
        },
        exit_codes: vec![
            ExitCodeInfo { code: 0, meaning: "Success / all links resolved".to_string() },
            ExitCodeInfo { code: 1, meaning: "Link not rewritten / unresolved links found".to_string() },
            ExitCodeInfo { code: 3, meaning: "Runtime error".to_string() },
        ],
        formats: vec![
            config::Format::Internal.as_str(),
            config::Format::Yii.as_str(),
            config::Format::Config.as_str(),
            config::Format::Generic.as_str(),
        ],
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // serde_json::to_string_pretty won't fail on this structure.
    let json = serde_json::to_string_pretty(&info).unwrap_or_default();
    println!("{json}");
}
