use std::io;

use clap::Parser;

use threecol::config::ChannelConfig;
use threecol::signals::SignalStop;
use threecol::supervisor::{Supervisor, SupervisorOutcome};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "supervisor")]
#[command(about = "Collect conflict reports from generators and print each improvement")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {}

fn run() -> threecol::Result<()> {
    let stop = SignalStop::install()?;
    let config = ChannelConfig::from_env();
    let mut supervisor = Supervisor::create(&config)?;

    let stdout = io::stdout();
    let outcome = supervisor.run(&stop, &mut stdout.lock())?;
    match &outcome {
        SupervisorOutcome::Colorable => tracing::info!("found a valid 3-coloring"),
        SupervisorOutcome::Stopped { best: Some(best) } => {
            tracing::info!("stopped with {} conflicting edges at best", best.count())
        }
        SupervisorOutcome::Stopped { best: None } => tracing::info!("stopped before any report"),
    }

    let stats = supervisor.shutdown();
    tracing::debug!("elapsed: {:?}", stats.elapsed_time);
    Ok(())
}

fn main() {
    let Args {} = Args::parse();
    threecol::logging::init();

    if let Err(e) = run() {
        eprintln!("supervisor [{}]: {}", std::process::id(), e);
        std::process::exit(1);
    }
}
