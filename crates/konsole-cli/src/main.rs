//! konsole CLI - Emit konsole-formatted log lines from shell scripts.
//!
//! ```text
//! konsole --level error --detail path=/tmp/x "open failed"
//! [ERROR] open failed:
//!     path = /tmp/x
//! ```
//!
//! Output goes to stderr, like every other konsole record.

#![forbid(unsafe_code)]

use std::process::ExitCode;

use clap::{ArgAction, Parser};

use konsole::{Config, Detail, Severity};

/// konsole - Print a log line the way konsole formats it.
#[derive(Parser, Debug)]
#[command(name = "konsole")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Severity of the message (debug, info, warning, error, critical).
    #[arg(long, short = 'l', default_value = "info")]
    level: Severity,

    /// Raise the volume; repeat for more (-vv shows debug).
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Lower the volume; repeat for less (-qq shows only critical).
    #[arg(long, short = 'q', action = ArgAction::Count)]
    quiet: u8,

    /// When to emit color (auto, always, never).
    #[arg(long, default_value = "auto")]
    color: ColorChoice,

    /// Minimum severity rendered; -v/-q take priority.
    #[arg(long)]
    threshold: Option<Severity>,

    /// Detail entry (KEY=VALUE), repeatable; rendered as aligned pairs.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    #[arg(conflicts_with_all = ["item", "text"])]
    detail: Vec<(String, String)>,

    /// Detail item, repeatable; rendered one per line.
    #[arg(long, value_name = "VALUE", conflicts_with = "text")]
    item: Vec<String>,

    /// Detail text; rendered one line per source line.
    #[arg(long)]
    text: Option<String>,

    /// The message; words are joined with spaces.
    #[arg(required = true)]
    message: Vec<String>,
}

/// Color selection for the `--color` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(format!("Unknown color choice: {s}. Expected: auto, always, never")),
        }
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Invalid detail format (expected KEY=VALUE): {s}")),
    }
}

impl Cli {
    fn volume(&self) -> Option<i32> {
        if self.verbose == 0 && self.quiet == 0 {
            None
        } else {
            Some(i32::from(self.verbose) - i32::from(self.quiet))
        }
    }

    fn config(&self) -> Config {
        let mut config = Config::new();
        if let Some(threshold) = self.threshold {
            config = config.with_level(threshold);
        }
        if let Some(volume) = self.volume() {
            config = config.with_volume(volume);
        }
        match self.color {
            ColorChoice::Auto => config,
            ColorChoice::Always => config.with_color(true),
            ColorChoice::Never => config.plain(),
        }
    }

    fn detail(&self) -> Option<Detail> {
        if self.detail.is_empty() && self.item.is_empty() {
            return self.text.as_deref().map(Detail::from);
        }
        if self.item.is_empty() {
            Some(Detail::mapping(self.detail.iter().map(|(k, v)| (k, v))))
        } else {
            Some(Detail::sequence(&self.item))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> konsole::Result<()> {
    // Malformed KONSOLE_LEVEL or KONSOLE_VOLUME values fail the run.
    let env = Config::try_from_env()?;
    konsole::try_init()?;
    konsole::config(&env);
    konsole::config(&cli.config());

    let logger = konsole::logger();
    let message = cli.message.join(" ");
    match cli.detail() {
        Some(detail) => logger.log_detail(cli.level, format_args!("{message}"), detail),
        None => logger.log(cli.level, format_args!("{message}")),
    }
    log::logger().flush();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("konsole").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["hello"]);
        assert_eq!(cli.level, Severity::Info);
        assert_eq!(cli.color, ColorChoice::Auto);
        assert_eq!(cli.volume(), None);
        assert_eq!(cli.config(), Config::new());
        assert!(cli.detail().is_none());
    }

    #[test]
    fn test_volume_counts_flags() {
        assert_eq!(parse(&["-vv", "x"]).volume(), Some(2));
        assert_eq!(parse(&["-q", "x"]).volume(), Some(-1));
        assert_eq!(parse(&["-v", "-qqq", "x"]).volume(), Some(-2));
    }

    #[test]
    fn test_volume_wins_over_threshold() {
        let cli = parse(&["--threshold", "critical", "-vv", "x"]);
        assert_eq!(cli.config().resolve_threshold(), Some(Severity::Debug));
    }

    #[test]
    fn test_color_choice() {
        assert_eq!(parse(&["--color", "never", "x"]).config().color, Some(false));
        assert_eq!(parse(&["--color", "ALWAYS", "x"]).config().color, Some(true));
        assert!(Cli::try_parse_from(["konsole", "--color", "sometimes", "x"]).is_err());
    }

    #[test]
    fn test_detail_shapes() {
        let cli = parse(&["--detail", "path=/tmp/x", "--detail", "mode=a=b", "x"]);
        assert_eq!(
            cli.detail(),
            Some(Detail::mapping([("path", "/tmp/x"), ("mode", "a=b")]))
        );
        let cli = parse(&["--item", "one", "--item", "two", "x"]);
        assert_eq!(cli.detail(), Some(Detail::sequence(["one", "two"])));
        let cli = parse(&["--text", "broken!", "x"]);
        assert_eq!(cli.detail(), Some(Detail::from("broken!")));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Cli::try_parse_from(["konsole", "--detail", "novalue", "x"]).is_err());
        assert!(Cli::try_parse_from(["konsole", "--detail", "a=1", "--item", "b", "x"]).is_err());
        assert!(Cli::try_parse_from(["konsole", "--level", "loud", "x"]).is_err());
        assert!(Cli::try_parse_from(["konsole"]).is_err());
    }

    #[test]
    fn test_message_words_are_joined() {
        assert_eq!(parse(&["disk", "at", "91%"]).message.join(" "), "disk at 91%");
    }
}
