use clap::Parser;
use log::info;

use ruletree::function::build_from_fn;
use ruletree::tree::RuleTree;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Use the von Neumann neighborhood instead of Moore.
    #[clap(long)]
    von_neumann: bool,

    /// Where to write the tree (printed to stdout if omitted).
    #[clap(long, value_name = "FILE")]
    output: Option<std::path::PathBuf>,
}

/// B3/S23 over any number of neighbors.
fn life(inputs: &[u32]) -> u32 {
    let n: u32 = inputs[1..].iter().sum();
    (n == 3 || (n == 2 && inputs[0] == 1)) as u32
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    let num_neighbors = if args.von_neumann { 4 } else { 8 };
    let num_params = num_neighbors + 1;

    // From the transition function, in one walk.
    let time = std::time::Instant::now();
    let from_fn = build_from_fn(2, num_neighbors, life)?;
    info!("build_from_fn: {} nodes in {:?}", from_fn.num_nodes(), time.elapsed());

    // Rule by rule, one rule per input combination.
    let time = std::time::Instant::now();
    let mut tree = RuleTree::new(2, num_neighbors)?;
    for bits in 0u32..(1 << num_params) {
        let inputs: Vec<u32> = (0..num_params).map(|i| (bits >> i) & 1).collect();
        let sets: Vec<Vec<u32>> = inputs.iter().map(|&s| vec![s]).collect();
        tree.add_rule(sets, life(&inputs))?;
    }
    let from_rules = tree.to_tree_file();
    info!("add_rule: {} nodes in {:?}", from_rules.num_nodes(), time.elapsed());

    assert_eq!(from_fn, from_rules, "both constructions must agree");

    match args.output {
        Some(path) => tree.write(&path)?,
        None => print!("{}", from_fn),
    }
    Ok(())
}
