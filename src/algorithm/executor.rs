//! End-to-end mosaic build: assign, composite, tile, export

use crate::algorithm::solver::GridAssignmentSolver;
use crate::io::configuration::{CANVAS_FILE, MANIFEST_FILE, MosaicConfig};
use crate::io::error::{Result, file_system_error};
use crate::io::image::save_png;
use crate::io::image_store::ImageStore;
use crate::io::manifest::{Manifest, PyramidInfo};
use crate::io::progress::{ProgressSink, SilentProgress};
use crate::io::tiles::{FileTileWriter, TileSink};
use crate::render::cell::CellImageRenderer;
use crate::render::compositor::{Canvas, CanvasCompositor, CompositeOutput};
use crate::render::pyramid::{TilePyramid, TilePyramidBuilder};
use crate::spatial::grid::Assignment;
use crate::spatial::projection::ProjectionInput;
use image::DynamicImage;
use tracing::info;
use std::path::Path;

static SILENT: SilentProgress = SilentProgress;

/// Everything one build produced
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Cell each item was placed on
    pub assignment: Assignment,
    /// Composed mosaic
    pub canvas: Canvas,
    /// Per-cell provenance, including the pyramid description
    pub manifest: Manifest,
    /// Generated zoom levels
    pub pyramid: TilePyramid,
}

/// A configured mosaic build bound to an image store
///
/// The pipeline holds no global state; several pipelines with different
/// configurations may run concurrently.
pub struct MosaicPipeline<'a> {
    config: MosaicConfig,
    renderer: CellImageRenderer<'a>,
    pyramid: TilePyramidBuilder,
    progress: &'a dyn ProgressSink,
}

impl<'a> MosaicPipeline<'a> {
    /// Validate `config` and prepare rendering from `store`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration cannot produce a valid
    /// build
    pub fn new(
        config: MosaicConfig,
        store: &'a dyn ImageStore,
        placeholder: &DynamicImage,
    ) -> Result<Self> {
        config.validate()?;
        let renderer = CellImageRenderer::new(
            store,
            placeholder,
            config.cell_resolution,
            config.inner_resolution(),
        )?;
        let pyramid = TilePyramidBuilder::new(config.tile_size, config.top_zoom)?;

        Ok(Self {
            config,
            renderer,
            pyramid,
            progress: &SILENT,
        })
    }

    /// Report stage progress to `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Configuration of this build
    pub const fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Place the items of `input` on the grid
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput`, `SurplusItems` or `AssignmentSolver` as
    /// [`GridAssignmentSolver::solve`]
    pub fn assign(&self, input: &ProjectionInput) -> Result<Assignment> {
        let assignment = GridAssignmentSolver::new(self.config.grid)
            .with_truncation(self.config.truncate_surplus)
            .solve(input.points())?;
        info!(
            items = input.len(),
            filled = assignment.filled(),
            empty = self.config.grid.cell_count() - assignment.filled(),
            "Assigned items to grid"
        );
        Ok(assignment)
    }

    /// Render and compose the canvas for an assignment
    ///
    /// # Errors
    ///
    /// Returns layout or rendering errors as [`CanvasCompositor::compose`]
    pub fn composite(
        &self,
        assignment: &Assignment,
        input: &ProjectionInput,
    ) -> Result<CompositeOutput> {
        let output = CanvasCompositor::new(
            &self.renderer,
            &self.config.layout,
            self.config.seed,
            self.config.max_rotation_degrees,
        )
        .compose(assignment, input, self.progress)?;
        info!(
            width = output.canvas.width(),
            height = output.canvas.height(),
            "Composed canvas"
        );
        Ok(output)
    }

    /// Cut the tile pyramid of a canvas into `sink`
    ///
    /// # Errors
    ///
    /// Returns planning or sink errors as [`TilePyramidBuilder::build`]
    pub fn tiles(&self, canvas: &Canvas, sink: &dyn TileSink) -> Result<TilePyramid> {
        let pyramid = self.pyramid.build(canvas.image(), sink, self.progress)?;
        info!(
            min_zoom = pyramid.min_zoom,
            max_zoom = pyramid.max_zoom,
            tiles = pyramid.tile_count(),
            "Generated tile pyramid"
        );
        Ok(pyramid)
    }

    /// Run assignment, composition and tiling, handing tiles to `sink`
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage
    pub fn build(&self, input: &ProjectionInput, sink: &dyn TileSink) -> Result<BuildOutput> {
        let assignment = self.assign(input)?;
        let CompositeOutput {
            canvas,
            mut manifest,
        } = self.composite(&assignment, input)?;
        let pyramid = self.tiles(&canvas, sink)?;
        manifest.pyramid = Some(PyramidInfo {
            min_zoom: pyramid.min_zoom,
            max_zoom: pyramid.max_zoom,
            tile_size: pyramid.tile_size,
            prefix: self.config.tile_prefix.clone(),
        });

        Ok(BuildOutput {
            assignment,
            canvas,
            manifest,
            pyramid,
        })
    }

    /// Build into `output_dir`: `canvas.png`, `manifest.json` and the tile tree
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage, including failures to create or
    /// write the output files
    pub fn build_to_directory(
        &self,
        input: &ProjectionInput,
        output_dir: &Path,
    ) -> Result<BuildOutput> {
        std::fs::create_dir_all(output_dir)
            .map_err(file_system_error(output_dir, "create directory"))?;
        let sink = FileTileWriter::new(
            output_dir,
            &self.config.tile_prefix,
            self.config.tile_compression,
        );

        let output = self.build(input, &sink)?;
        save_png(
            output.canvas.image(),
            &output_dir.join(CANVAS_FILE),
            self.config.canvas_compression,
        )?;
        output.manifest.write_json(&output_dir.join(MANIFEST_FILE))?;
        info!(output = %output_dir.display(), "Wrote mosaic");

        Ok(output)
    }
}
