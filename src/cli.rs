use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

/// Top-level CLI entry point.
#[derive(Debug, Default, Parser)]
#[command(
    name = "menu-recognizer",
    version,
    about = "Reads weekly cafeteria menu photos into a weekday → food map"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Increase logging verbosity (-v, -vv).
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Level used when `RUST_LOG` is unset and `-v` was given.
    pub fn log_level(&self) -> Option<LevelFilter> {
        match self.verbose {
            0 => None,
            1 => Some(LevelFilter::DEBUG),
            _ => Some(LevelFilter::TRACE),
        }
    }
}

/// Supported subcommands. No subcommand means `serve`.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server receiving upload notifications.
    Serve(ServeArgs),
    /// Recognize a single menu photo and print the menu as JSON.
    Recognize(RecognizeArgs),
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides `PORT`).
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Args)]
pub struct RecognizeArgs {
    /// Menu photo (PNG, JPEG or TIFF).
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,
    /// Menu language (overrides `MENU_LANGUAGE`).
    #[arg(long)]
    pub lang: Option<String>,
    /// Print the unfiltered OCR text instead of the menu.
    #[arg(long)]
    pub raw: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["menu-recognizer"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level(), None);
    }

    #[test]
    fn serve_with_port() {
        let cli = Cli::try_parse_from(["menu-recognizer", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => assert_eq!(args.port, Some(9000)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn recognize_with_language() {
        let cli = Cli::try_parse_from(["menu-recognizer", "-vv", "recognize", "kw12.jpg", "--lang", "en"])
            .unwrap();
        assert_eq!(cli.log_level(), Some(LevelFilter::TRACE));
        match cli.command {
            Some(Commands::Recognize(args)) => {
                assert_eq!(args.image, PathBuf::from("kw12.jpg"));
                assert_eq!(args.lang.as_deref(), Some("en"));
                assert!(!args.raw);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn recognize_requires_image() {
        assert!(Cli::try_parse_from(["menu-recognizer", "recognize"]).is_err());
    }
}
