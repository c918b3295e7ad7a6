use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use treelift::{LcaEngine, Strategy};

#[derive(Parser, Debug)]
#[command(name = "treelift", about = "LCA queries over a rooted tree, with compressed persistence")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one LCA query against a tree read from an edge list.
    Query {
        /// Edge list file (`<u> <v>` per line, node 1 is the root).
        edges: PathBuf,
        /// First query node.
        u: usize,
        /// Second query node.
        v: usize,
        /// Algorithm: binary-lifting, naive, or tarjan-offline.
        #[arg(long, default_value = "binary-lifting")]
        strategy: Strategy,
    },
    /// Answer a batch of queries offline with Tarjan's algorithm.
    Batch {
        /// Edge list file (`<u> <v>` per line, node 1 is the root).
        edges: PathBuf,
        /// Query file (`<u> <v>` per line).
        pairs: PathBuf,
    },
    /// Compress a tree definition into a .huff artifact.
    Save {
        /// Edge list file (`<u> <v>` per line, node 1 is the root).
        edges: PathBuf,
        /// Output artifact path.
        output: PathBuf,
    },
    /// Load a .huff artifact and print the tree it contains.
    Load {
        /// Artifact path.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Query {
            edges,
            u,
            v,
            strategy,
        } => run_query(edges, strategy, u, v)?,
        Commands::Batch { edges, pairs } => run_batch(edges, pairs)?,
        Commands::Save { edges, output } => run_save(edges, output)?,
        Commands::Load { input } => run_load(input)?,
    }
    Ok(())
}

fn run_query(edges_path: PathBuf, strategy: Strategy, u: usize, v: usize) -> Result<()> {
    let engine = engine_from_edge_file(&edges_path)?;
    let answer = engine
        .lca(strategy, u, v)
        .with_context(|| format!("query ({u}, {v}) failed"))?;
    println!("lca({u}, {v}) = {answer}\t[{strategy}]");
    Ok(())
}

fn run_batch(edges_path: PathBuf, pairs_path: PathBuf) -> Result<()> {
    let engine = engine_from_edge_file(&edges_path)?;
    let pairs = read_pair_file(&pairs_path)
        .with_context(|| format!("failed to read queries from {}", pairs_path.display()))?;
    if pairs.is_empty() {
        bail!("query file {} contains no pairs", pairs_path.display());
    }
    let answers = engine
        .lca_batch(&pairs)
        .context("offline batch failed")?;
    for pair in &pairs {
        if let Some(answer) = answers.get(pair) {
            println!("lca({}, {}) = {answer}", pair.0, pair.1);
        }
    }
    Ok(())
}

fn run_save(edges_path: PathBuf, output: PathBuf) -> Result<()> {
    let engine = engine_from_edge_file(&edges_path)?;
    let artifact = engine.save().context("failed to serialize the tree")?;
    fs::write(&output, &artifact)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "saved {} nodes, {} edges -> {} ({} bytes)",
        engine.store().node_count(),
        engine.store().edges().len(),
        output.display(),
        artifact.len()
    );
    Ok(())
}

fn run_load(input: PathBuf) -> Result<()> {
    let bytes = fs::read(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let engine = LcaEngine::load(&bytes)
        .with_context(|| format!("{} is not a valid artifact", input.display()))?;
    let store = engine.store();
    println!("{} nodes, root depth 1", store.node_count());
    for &(u, v) in store.edges() {
        println!("{u} {v}");
    }
    Ok(())
}

/// Build an engine from a `<u> <v>`-per-line edge file. The node count is
/// the largest id mentioned.
fn engine_from_edge_file(path: &Path) -> Result<LcaEngine> {
    let edges = read_pair_file(path)
        .with_context(|| format!("failed to read edges from {}", path.display()))?;
    let n = edges
        .iter()
        .flat_map(|&(u, v)| [u, v])
        .max()
        .with_context(|| format!("edge file {} is empty", path.display()))?;
    LcaEngine::build(n, &edges)
        .with_context(|| format!("edge file {} does not describe a tree", path.display()))
}

fn read_pair_file(path: &Path) -> Result<Vec<(usize, usize)>> {
    let reader = BufReader::new(File::open(path)?);
    let mut pairs = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let (Some(u), Some(v)) = (fields.next(), fields.next()) else {
            bail!("line {}: expected `<u> <v>`", line_no + 1);
        };
        pairs.push((
            u.parse().with_context(|| format!("line {}: bad node id", line_no + 1))?,
            v.parse().with_context(|| format!("line {}: bad node id", line_no + 1))?,
        ));
    }
    Ok(pairs)
}
