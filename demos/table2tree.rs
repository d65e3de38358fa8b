use std::path::PathBuf;

use clap::Parser;
use log::info;

use ruletree::emulate::{build_tree, tree_name};
use ruletree::table::RuleTable;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Path to the `.table` file.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Directory for the generated `.tree` file.
    #[clap(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Print coverage statistics before writing.
    #[clap(long)]
    stats: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    info!("args = {:?}", args);

    let table = RuleTable::read(&args.input)?;
    info!(
        "Read {} transitions ({} states, {}, symmetries: {})",
        table.transitions.len(),
        table.num_states,
        table.neighborhood,
        table.symmetry
    );

    let mut tree = build_tree(&table)?;
    info!("tree = {:?}", tree);

    if args.stats {
        let coverage = tree.coverage();
        for (state, count) in coverage.per_state.iter().enumerate() {
            println!("state {}: {} inputs", state, count);
        }
        println!("undecided: {} inputs", coverage.undefined);
    }

    let stem = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rule".to_string());
    let name = tree_name(&stem, table.neighborhood);
    let path = args.out_dir.join(format!("{}.tree", name));
    tree.write(&path)?;
    info!("Wrote {} nodes to {}", tree.num_nodes(), path.display());

    let file = tree.to_tree_file();
    if !file.is_golly_compatible() {
        log::warn!(
            "{} states with {} neighbors is outside what Golly can load",
            file.num_states(),
            file.num_neighbors()
        );
    }

    println!("Created {} in {:.3}s", name, time_total.elapsed().as_secs_f64());
    Ok(())
}
