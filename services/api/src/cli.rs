use crate::demo::{run_demo, run_nearby, run_score, DemoArgs, NearbyArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use couplefit::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "couplefit",
    about = "Run the couples fitness API or score challenges from the command line",
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
    /// Judge two participants from raw analysis and progress numbers
    Score(ScoreArgs),
    /// Rank places from a CSV catalogue by distance
    Nearby(NearbyArgs),
    /// Walk through a challenge and a date-night search with sample data
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
        Command::Nearby(args) => run_nearby(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use couplefit::workflows::challenge::InputPolicy;

    #[test]
    fn score_command_parses_both_participants() {
        let cli = Cli::try_parse_from([
            "couplefit",
            "score",
            "--score-a",
            "80",
            "--quality-a",
            "8",
            "--points-a",
            "30",
            "--score-b",
            "70",
            "--quality-b",
            "9",
            "--total-days",
            "30",
            "--policy",
            "reject",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.points_a, 30);
                assert_eq!(args.days_b, 0);
                assert_eq!(args.policy, Some(InputPolicy::Reject));
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn nearby_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "couplefit",
            "nearby",
            "--catalogue",
            "places.csv",
            "--lat",
            "-33.86",
            "--lon",
            "151.2",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Nearby(args)) => {
                assert_eq!(args.lat, -33.86);
                assert!(args.radius_km.is_none());
            }
            other => panic!("expected nearby command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["couplefit"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = Cli::try_parse_from([
            "couplefit",
            "score",
            "--score-a",
            "1",
            "--quality-a",
            "1",
            "--score-b",
            "1",
            "--quality-b",
            "1",
            "--total-days",
            "1",
            "--policy",
            "lenient",
        ]);
        assert!(result.is_err());
    }
}
