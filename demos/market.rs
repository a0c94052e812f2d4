use std::path::PathBuf;

use clap::Parser;
use equilibria::session::Session;
use tracing_subscriber::EnvFilter;

/// Clear a market by raising contested prices and print the preferred-seller graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Market file: a `size prices` header, then one line of valuations per buyer
    #[arg(default_value = "testdata/market.txt")]
    market: PathBuf,
}

fn main() -> equilibria::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut session: Session<u32> = Session::default();
    let market = session.load_market_file(&args.market)?;
    println!(
        "Loaded {}: {} buyers and sellers",
        args.market.display(),
        market.size()
    );
    println!("Valuations:{}", market.valuations());

    let clearing = session.clear_market()?;
    println!("Cleared after {} rounds", clearing.rounds);

    let graph = session.preferred_seller_graph()?;
    for seller in graph.sellers() {
        println!("  seller {} priced at {}", seller.vertex, seller.price);
    }
    for edge in graph.edges() {
        println!("  buyer {} -> seller {} ({})", edge.buyer, edge.seller, edge.label());
    }

    Ok(())
}
