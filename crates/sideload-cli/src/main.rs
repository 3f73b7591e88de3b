use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod orchestrator;
mod output;
mod progress;
mod ui;

/// Exit status after Ctrl-C, as a shell reports SIGINT.
const INTERRUPTED: i32 = 130;

/// How the command ended.
#[derive(Debug)]
enum Outcome {
    Finished(anyhow::Result<()>),
    Interrupted,
}

impl Outcome {
    const fn exit_code(&self) -> i32 {
        match self {
            Self::Finished(Ok(())) => 0,
            Self::Finished(Err(_)) => 1,
            Self::Interrupted => INTERRUPTED,
        }
    }
}

/// Run `work` until it finishes or `interrupt` fires, whichever is first.
async fn race(
    work: impl Future<Output = anyhow::Result<()>>,
    interrupt: impl Future<Output = ()>,
) -> Outcome {
    tokio::select! {
        result = work => Outcome::Finished(result),
        () = interrupt => Outcome::Interrupted,
    }
}

async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

// Exits without returning: dropping the runtime would wait for blocking
// tasks such as the password prompt.
#[tokio::main]
async fn main() {
    let outcome = race(run(), ctrl_c()).await;
    match &outcome {
        Outcome::Finished(Ok(())) => {}
        Outcome::Finished(Err(error)) => eprintln!("sideload error: {error:#}"),
        Outcome::Interrupted => eprintln!("sideload: interrupted"),
    }
    std::process::exit(outcome.exit_code());
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    commands::dispatch::dispatch(cli.command, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SIDELOAD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
