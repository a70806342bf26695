use clap::{Parser, Subcommand};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tianqi", version, about = "Realtime weather and forecast viewer")]
pub struct Cli {
    /// Defaults to `serve` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the proxy gateway and static file server.
    Serve,

    /// Show weather in the terminal; each line typed on stdin searches a new city.
    Client {
        /// City to show first; defaults to the configured default city.
        #[arg(long)]
        city: Option<String>,

        /// Refresh once and exit.
        #[arg(long)]
        once: bool,

        /// Print the view model as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["tianqi"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_client_flags() {
        let cli = Cli::try_parse_from(["tianqi", "client", "--city", "厦门", "--once"]).unwrap();
        match cli.command {
            Some(Command::Client { city, once, json }) => {
                assert_eq!(city.as_deref(), Some("厦门"));
                assert!(once);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
