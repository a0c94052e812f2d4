use std::path::PathBuf;

use clap::Parser;
use equilibria::{equilibrium::Equilibrium, session::Session};
use tracing_subscriber::EnvFilter;

/// Compare how selfish and coordinated traffic settle on a network
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Weighted digraph file, one `source target a b` edge per line
    #[arg(default_value = "testdata/braess.txt")]
    network: PathBuf,

    /// Volume of flow routed from the source to the destination
    #[arg(default_value_t = 4000.0)]
    volume: f64,

    /// Vertex the flow starts from
    #[arg(default_value_t = 0)]
    source: u32,

    /// Vertex the flow ends at
    #[arg(default_value_t = 3)]
    destination: u32,

    /// Afterwards, split the network into this many components by edge betweenness
    #[arg(long, value_name = "COUNT")]
    components: Option<usize>,
}

fn print_split(title: &str, equilibrium: &Equilibrium<u32>) {
    println!("\n{title} (total travel time {:.2})", equilibrium.total_time);

    for entry in equilibrium.flows.iter() {
        println!(
            "  {:<20} flow {:>10.3}  time {:>10.3}",
            entry.path.to_string(),
            entry.flow,
            entry.travel_time
        );
    }
}

fn main() -> equilibria::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut session: Session<u32> = Session::default();
    let network = session.load_network_file(&args.network)?;
    println!(
        "Loaded {}: {} vertices, {} edges",
        args.network.display(),
        network.vertex_count(),
        network.edge_count()
    );

    let comparison = session.solve_traffic(args.volume, args.source, args.destination)?;

    print_split("Nash equilibrium", &comparison.nash);
    print_split("Social optimum", &comparison.social);
    println!("\nPrice of anarchy: {:.4}", comparison.price_of_anarchy());

    if let Some(count) = args.components {
        let partition = session.partition_network(count)?;

        println!("\nRemoved {} edges", partition.removed.len());
        for edge in &partition.removed {
            println!("  {edge}");
        }
        for component in &partition.components {
            println!("  component {component:?}");
        }
    }

    Ok(())
}
