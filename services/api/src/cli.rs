use crate::demo::{run_demo, run_quote, run_score, DemoArgs, QuoteArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use trust_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Trust Score",
    about = "Score UPI transaction histories and price loan eligibility",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a transaction export for one subject
    Score(ScoreArgs),
    /// Quote a loan against a known score
    Quote(QuoteArgs),
    /// Score the bundled sample statement and print a full report
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Quote(args) => run_quote(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn quote_rejects_out_of_range_scores() {
        let parsed = Cli::try_parse_from([
            "trust-score-api",
            "quote",
            "--score",
            "950",
            "--amount",
            "10000",
            "--term",
            "12",
            "--purpose",
            "education",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["trust-score-api"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
