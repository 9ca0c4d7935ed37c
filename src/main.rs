use slack_member_comparer::commands::{self, Cli};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // A missing .env is fine; SLACK_TOKEN may come from the real environment
    let _ = dotenvy::dotenv();

    let default_filter = if cli.verbose() {
        "slack_member_comparer=debug"
    } else {
        "slack_member_comparer=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ Error: {}", err);
            if matches!(err, commands::CliError::Config(_)) {
                eprintln!("   Set SLACK_TOKEN in your environment or a .env file");
            }
            ExitCode::FAILURE
        }
    }
}
