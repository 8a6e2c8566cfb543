//! CLI parser.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dbot")]
#[command(about = "Dialog bot CLI: run the demo dialog on Telegram, render its graph", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the demo dialog on Telegram (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Write the demo dialog's transition graph as Graphviz DOT.
    Render {
        #[arg(short, long, default_value = "dialog.dot")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_token() {
        let cli = Cli::try_parse_from(["dbot", "run", "--token", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::Run { token: Some(t) } if t == "abc"));
    }

    #[test]
    fn test_parse_render_default_output() {
        let cli = Cli::try_parse_from(["dbot", "render"]).unwrap();
        assert!(matches!(cli.command, Commands::Render { output } if output == PathBuf::from("dialog.dot")));
    }
}
