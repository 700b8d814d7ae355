//! dialgrid-bench - run a MovingAI scenario through the bucket search.
//!
//! ```bash
//! dialgrid-bench maps/arena.map maps/arena.map.scen --queue tree --check
//! RUST_LOG=debug dialgrid-bench arena.map arena.map.scen --summary summary.json
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dialgrid_bench::{Runner, Scenario, Summary, load_map, load_scenario};
use dialgrid_core::{BitGrid, ByteGrid, GridBackend, GridMap};
use dialgrid_paths::{BucketQueue, HeapQueue, Search, TreeQueue};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QueueKind {
    /// Hash map of buckets plus a binary heap of keys
    Heap,
    /// Balanced tree keyed by f
    Tree,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendKind {
    /// One bit per cell
    Bit,
    /// One byte per cell
    Byte,
}

#[derive(Parser, Debug)]
#[command(name = "dialgrid-bench")]
#[command(about = "Run MovingAI scenarios through the octile bucket search")]
struct Args {
    /// Map file (.map)
    map: PathBuf,

    /// Scenario file (.scen)
    scen: PathBuf,

    /// Bucket queue implementation
    #[arg(long, value_enum, default_value_t = QueueKind::Heap)]
    queue: QueueKind,

    /// Grid storage
    #[arg(long, value_enum, default_value_t = BackendKind::Bit)]
    backend: BackendKind,

    /// Validate every path and print one line per query to stdout
    #[arg(long)]
    check: bool,

    /// Also run the reference A* and warn when path lengths differ
    #[arg(long)]
    reference: bool,

    /// CSV output file
    #[arg(short, long, default_value = "result.csv")]
    output: PathBuf,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let map = load_map(&args.map).with_context(|| format!("loading map {}", args.map.display()))?;
    let scenario = load_scenario(&args.scen)
        .with_context(|| format!("loading scenario {}", args.scen.display()))?;
    log::info!(
        "{}: {}x{} map, {} queries, {:?} queue on {:?} grid",
        args.map.display(),
        map.width(),
        map.height(),
        scenario.len(),
        args.queue,
        args.backend
    );
    if let Some(e) = scenario
        .experiments()
        .iter()
        .find(|e| e.map_size.is_some_and(|s| s != (map.width(), map.height())))
    {
        log::warn!(
            "scenario lists map size {:?}, map is {}x{}",
            e.map_size,
            map.width(),
            map.height()
        );
    }

    let summary = match (args.backend, args.queue) {
        (BackendKind::Bit, QueueKind::Heap) => run::<BitGrid, HeapQueue>(&args, &map, &scenario),
        (BackendKind::Bit, QueueKind::Tree) => run::<BitGrid, TreeQueue>(&args, &map, &scenario),
        (BackendKind::Byte, QueueKind::Heap) => run::<ByteGrid, HeapQueue>(&args, &map, &scenario),
        (BackendKind::Byte, QueueKind::Tree) => run::<ByteGrid, TreeQueue>(&args, &map, &scenario),
    }?;

    if summary.skipped > 0 || summary.invalid > 0 || summary.reference_mismatches > 0 {
        log::warn!(
            "{} skipped, {} invalid, {} reference mismatches",
            summary.skipped,
            summary.invalid,
            summary.reference_mismatches
        );
    }
    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing summary {}", path.display()))?;
    }
    Ok(())
}

fn run<G: GridBackend, Q: BucketQueue>(
    args: &Args,
    map: &GridMap,
    scenario: &Scenario,
) -> Result<Summary> {
    let grid: Arc<G> = Arc::new(map.to_grid().context("building grid")?);
    let mut search: Search<G, Q> = Search::new(grid.clone());
    let mut runner = Runner::new(
        grid,
        args.map.display().to_string(),
        args.scen.display().to_string(),
    )
    .with_check(args.check)
    .with_reference(args.reference);

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut csv = BufWriter::new(file);
    let mut stdout = io::stdout().lock();
    let summary = runner
        .run(&mut search, scenario.experiments(), &mut csv, &mut stdout)
        .context("writing results")?;
    csv.flush()
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(summary)
}
