//! Builds the sample 25-key input and prints the implicit array.
//!
//! Usage: `implicit_btree_demo [B]` (default 3), built with `--features demo`.
//! Set `RUST_LOG=implicit_btree=debug` to see the trailing repair decisions.

use implicit_btree::{ImplicitTreeError, TreeBuilder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SAMPLE_KEYS: [u32; 25] = [
    1, 3, 4, 5, 6, 9, 10, 2, 7, 8, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25,
];

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "implicit_btree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let branching = match std::env::args().nth(1).map(|arg| arg.parse::<usize>()) {
        None => 3,
        Some(Ok(branching)) => branching,
        Some(Err(e)) => {
            tracing::error!("Invalid branching factor argument: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(branching) {
        tracing::error!("Build failed: {e}");
        std::process::exit(1);
    }
}

fn run(branching: usize) -> Result<(), ImplicitTreeError> {
    let builder = TreeBuilder::new(branching)?;
    let tree = builder.sort_and_build(SAMPLE_KEYS.to_vec())?;
    tree.validate()?;

    let stats = tree.stats();
    tracing::info!(
        branching,
        height = stats.height,
        nodes = tree.node_count(),
        "built implicit tree"
    );

    println!("{}", tree);
    println!("Nodes per level: {:?}", stats.nodes_per_level);
    println!(
        "Slots: {} used of {} ({} holes), fill ratio {:.2}",
        stats.slots.occupied, stats.slots.span, stats.slots.holes, stats.fill_ratio
    );
    Ok(())
}
