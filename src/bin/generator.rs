use clap::Parser;

use threecol::config::{ChannelConfig, GeneratorConfig};
use threecol::generator::{seeded_rng, Generator};
use threecol::graph::{parse_edge, Edge, Graph};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "generator")]
#[command(about = "Color a graph at random and report conflicts to the supervisor")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Graph edges, each written as U-V with non-negative integer nodes
    #[arg(value_name = "EDGE", required = true, value_parser = parse_edge)]
    edges: Vec<Edge>,
}

fn run(graph: &Graph) -> threecol::Result<()> {
    let pid = std::process::id();
    let rng = seeded_rng(&GeneratorConfig::from_env(), pid);
    let mut generator = Generator::attach(&ChannelConfig::from_env(), graph, rng)?;
    generator.run()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    threecol::logging::init();

    let graph = Graph::new(args.edges);
    if let Err(e) = run(&graph) {
        eprintln!("generator [{}]: {}", std::process::id(), e);
        std::process::exit(1);
    }
}
