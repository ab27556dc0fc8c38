use clang_builtin_gen::cli::Cli;
use clang_builtin_gen_core::error::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the user-facing lines.
    // RUST_LOG takes precedence over -v/-q.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting clang builtin wrapper generation");

    match clang_builtin_gen::run(&cli) {
        Ok(report) => {
            for file in &report.files {
                println!("{} saved to {}", file.kind.description(), file.path.display());
            }
            info!(
                "Generated {} wrappers from {} declared builtins",
                report.wrappers_generated, report.builtins_scanned
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_user_facing() => {
            println!("{}", e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            Err(e)
        }
    }
}
