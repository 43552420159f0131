//! Command-line interface for building a mosaic from a projection file

use crate::algorithm::executor::{BuildOutput, MosaicPipeline};
use crate::io::configuration::{
    CELL_RATIOS, CELL_SIDE, DEFAULT_GRID_COLUMNS, DEFAULT_SEED, DEFAULT_TILE_PREFIX,
    MosaicConfig, OUTPUT_ASPECT, PLACEHOLDER_ASSET, SOURCE_IMAGE_SIZE, TILE_SIZE,
    cell_resolution_for, stagger_padding,
};
use crate::io::error::Result;
use crate::io::image::open_image;
use crate::io::image_store::DirectoryImageStore;
use crate::io::input::read_projection;
use crate::io::progress::ProgressManager;
use crate::spatial::grid::GridSpec;
use crate::spatial::layout::Layout;
use clap::Parser;
use tracing::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mosaicmap")]
#[command(
    author,
    version,
    about = "Arrange projected photos on a grid and cut the mosaic into map tiles"
)]
/// Command-line arguments for a mosaic build
// Each flag toggles an independent build option
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// JSON file with item ids, image references and 2D coordinates
    #[arg(value_name = "PROJECTION_JSON")]
    pub projection: PathBuf,

    /// Directory image references are resolved against
    #[arg(short, long, value_name = "DIR")]
    pub images: PathBuf,

    /// Image drawn on cells without a picture [default: DIR/empty-space.png]
    #[arg(short, long, value_name = "FILE")]
    pub placeholder: Option<PathBuf>,

    /// Directory receiving canvas.png, manifest.json and the tile tree
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Number of grid columns
    #[arg(short, long, default_value_t = DEFAULT_GRID_COLUMNS)]
    pub columns: usize,

    /// Number of grid rows (derived from the output aspect when omitted)
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// Longer side of a cell in pixels
    #[arg(long, default_value_t = CELL_SIDE)]
    pub cell_side: u32,

    /// Seed for the decorative cell rotations
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Edge length of pyramid tiles in pixels
    #[arg(short, long, default_value_t = TILE_SIZE)]
    pub tile_size: u32,

    /// Tile tree prefix below the tiles directory
    #[arg(long, default_value = DEFAULT_TILE_PREFIX)]
    pub prefix: String,

    /// Place every column at the same height
    #[arg(long)]
    pub no_stagger: bool,

    /// Fail instead of dropping items that do not fit on the grid
    #[arg(long)]
    pub no_truncate: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Placeholder image, falling back to the well-known asset in the image directory
    pub fn placeholder_path(&self) -> PathBuf {
        self.placeholder
            .clone()
            .unwrap_or_else(|| self.images.join(PLACEHOLDER_ASSET))
    }

    /// Grid from the explicit row count or the output aspect
    ///
    /// # Errors
    ///
    /// Returns `InvalidGridSpec` if either dimension is zero
    pub fn grid(&self) -> Result<GridSpec> {
        match self.rows {
            Some(rows) => GridSpec::new(self.columns, rows),
            None => GridSpec::fitting_aspect(
                self.columns,
                SOURCE_IMAGE_SIZE,
                CELL_RATIOS,
                OUTPUT_ASPECT,
            ),
        }
    }

    /// Build configuration from the arguments
    ///
    /// # Errors
    ///
    /// Returns `InvalidGridSpec` if the grid is empty
    pub fn config(&self) -> Result<MosaicConfig> {
        let mut config = MosaicConfig::new(self.grid()?);
        config.cell_resolution =
            cell_resolution_for(SOURCE_IMAGE_SIZE, CELL_RATIOS, self.cell_side);
        config.layout = if self.no_stagger {
            Layout::default()
        } else {
            Layout::staggered_columns(stagger_padding(self.cell_side))
        };
        config.seed = self.seed;
        config.tile_size = self.tile_size;
        config.tile_prefix.clone_from(&self.prefix);
        config.truncate_surplus = !self.no_truncate;
        Ok(config)
    }
}

/// Runs one build as described by the command line
pub struct MosaicRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl MosaicRunner {
    /// Create a runner for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Read the inputs, build the mosaic and write it to the output directory
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be read or any build stage fails
    pub fn run(&self) -> Result<BuildOutput> {
        let config = self.cli.config()?;
        let input = read_projection(&self.cli.projection)?;
        let placeholder = open_image(&self.cli.placeholder_path())?;
        let store = DirectoryImageStore::new(&self.cli.images);
        info!(
            items = input.len(),
            columns = config.grid.width(),
            rows = config.grid.height(),
            capacity = config.item_capacity(),
            "Starting build"
        );

        let mut pipeline = MosaicPipeline::new(config, &store, &placeholder)?;
        if let Some(ref pm) = self.progress_manager {
            pipeline = pipeline.with_progress(pm);
        }
        let output = pipeline.build_to_directory(&input, &self.cli.output);

        if let Some(ref pm) = self.progress_manager {
            pm.clear();
        }
        output
    }
}
