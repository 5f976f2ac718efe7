//! Buffer Demo - halo exchange over a synthetic layer
//!
//! Builds a grid of tiles whose cells hold their layer-wide pixel index,
//! buffers it, and prints the stitched tiles.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --package halo-playground --bin buffer-demo -- uniform --border 1
//! cargo run --package halo-playground --bin buffer-demo -- --config halo.toml per-key
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::info;

use common_config::HaloConfig;
use common_error::HaloResult;
use halo_buffer::BufferTiles;
use halo_collection::{PartitionedCollection, PartitioningSpec};
use halo_core::{ArrayTile, BufferedTile, GridBounds, SpatialKey};

use halo_playground::{
    format_tile, print_divider, print_header, stepped_borders, summarize, synthetic_layer,
};

/// Buffer Demo CLI.
#[derive(Parser, Debug)]
#[command(name = "buffer-demo")]
#[command(about = "Buffer a synthetic tile layer with its neighbors' cells")]
#[command(version)]
struct Args {
    /// Configuration file (.toml, .yaml, .yml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Partitions the synthetic layer starts in (placement unknown to the exchange)
    #[arg(short, long, global = true, default_value_t = 2)]
    partitions: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs, Debug, Clone, Copy)]
struct Layout {
    /// Tiles per layer row
    #[arg(long, default_value_t = 3)]
    layout_cols: i32,

    /// Tiles per layer column
    #[arg(long, default_value_t = 3)]
    layout_rows: i32,

    /// Columns per tile
    #[arg(long, default_value_t = 4)]
    tile_cols: usize,

    /// Rows per tile
    #[arg(long, default_value_t = 4)]
    tile_rows: usize,

    /// Only print the tile for this column (with --row)
    #[arg(long, requires = "row")]
    col: Option<i32>,

    /// Only print the tile for this row (with --col)
    #[arg(long, requires = "col")]
    row: Option<i32>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Same border on every side of every tile
    Uniform {
        #[command(flatten)]
        layout: Layout,

        /// Border thickness
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        border: i64,

        /// Restrict the layer to keys in col_min,row_min,col_max,row_max
        #[arg(long, value_delimiter = ',', num_args = 4, allow_negative_numbers = true)]
        bounds: Option<Vec<i32>>,
    },

    /// Per-key borders alternating between `base` and `base + 1`
    PerKey {
        #[command(flatten)]
        layout: Layout,

        /// Smallest border
        #[arg(short, long, default_value_t = 1)]
        base: usize,
    },

    /// Show which directions each key receives, without stitching
    Neighbors {
        #[command(flatten)]
        layout: Layout,

        #[arg(short, long, default_value_t = 1)]
        border: i64,
    },
}

fn main() -> HaloResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => HaloConfig::load(path)?,
        None => HaloConfig::default(),
    };
    info!("using {config:?}");
    let buffer = BufferTiles::new(config)?;

    match args.command {
        Commands::Uniform {
            layout,
            border,
            bounds,
        } => {
            let bounds = bounds.map(|b| GridBounds::new(b[0], b[1], b[2], b[3]));
            let tiles = load_layer(&layout, args.partitions)?;
            let buffered = buffer.uniform(tiles, border, bounds)?;
            print_buffered(&layout, buffered.collect_sorted());
        }
        Commands::PerKey { layout, base } => {
            let tiles = load_layer(&layout, args.partitions)?;
            let max = layout.tile_cols.min(layout.tile_rows);
            let keys: Vec<SpatialKey> = tiles.iter().map(|(k, _)| *k).collect();
            let borders = PartitionedCollection::from_records(
                stepped_borders(keys, base, max),
                PartitioningSpec::unknown(args.partitions),
            )?;
            let buffered = buffer.per_key(tiles, borders, None)?;
            print_buffered(&layout, buffered.collect_sorted());
        }
        Commands::Neighbors { layout, border } => {
            let tiles = load_layer(&layout, args.partitions)?;
            let bounds = GridBounds::new(0, 0, layout.layout_cols - 1, layout.layout_rows - 1);
            let slices = buffer
                .with_neighbors(tiles, border, Some(bounds))?
                .collect_sorted();

            print_header("Received slices");
            for (key, received) in slices {
                let directions: Vec<String> =
                    received.iter().map(|(d, _)| d.to_string()).collect();
                println!("{key}: {}", directions.join(", "));
            }
        }
    }

    Ok(())
}

fn load_layer(
    layout: &Layout,
    partitions: usize,
) -> HaloResult<PartitionedCollection<SpatialKey, ArrayTile<i32>>> {
    let records = synthetic_layer(
        layout.layout_cols,
        layout.layout_rows,
        layout.tile_cols,
        layout.tile_rows,
    );
    info!(
        "generated {} tiles of {}x{}",
        records.len(),
        layout.tile_cols,
        layout.tile_rows
    );
    PartitionedCollection::from_records(records, PartitioningSpec::unknown(partitions))
}

fn print_buffered(layout: &Layout, records: Vec<(SpatialKey, BufferedTile<ArrayTile<i32>>)>) {
    let only = layout.col.zip(layout.row).map(|(c, r)| SpatialKey::new(c, r));

    print_header("Buffered tiles");
    for (key, buffered) in records {
        if only.is_some_and(|k| k != key) {
            continue;
        }
        println!("{key}: {}", summarize(&buffered));
        print!("{}", format_tile(&buffered.tile, Some(&buffered.interior)));
        print_divider();
    }
}
