//! Composition of rendered cells into the full mosaic canvas

use crate::io::error::{Result, computation_error};
use crate::io::manifest::Manifest;
use crate::io::progress::ProgressSink;
use crate::render::cell::{CellImageRenderer, WHITE};
use crate::render::rotation::RotationSource;
use crate::spatial::grid::{Assignment, CellCoord};
use crate::spatial::layout::Layout;
use crate::spatial::projection::ProjectionInput;
use image::RgbImage;
use image::imageops;
use rayon::prelude::*;
use tracing::{debug, warn};

/// The composed mosaic image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Blank white canvas
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the pixels
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Take the pixels
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// Canvas plus the record of what was drawn where
#[derive(Debug, Clone)]
pub struct CompositeOutput {
    /// Composed image
    pub canvas: Canvas,
    /// Per-cell provenance
    pub manifest: Manifest,
}

struct RenderedCell {
    coord: CellCoord,
    origin: (u32, u32),
    image: RgbImage,
    degraded: bool,
}

/// Renders every cell of an assignment and pastes it at its layout position
pub struct CanvasCompositor<'a> {
    renderer: &'a CellImageRenderer<'a>,
    layout: &'a Layout,
    seed: u64,
    max_rotation_degrees: u32,
}

impl<'a> CanvasCompositor<'a> {
    /// Compositor drawing cells with `renderer` at positions from `layout`
    pub const fn new(
        renderer: &'a CellImageRenderer<'a>,
        layout: &'a Layout,
        seed: u64,
        max_rotation_degrees: u32,
    ) -> Self {
        Self {
            renderer,
            layout,
            seed,
            max_rotation_degrees,
        }
    }

    /// Compose the canvas for an assignment of `input`'s items
    ///
    /// Cells whose picture cannot be loaded fall back to the placeholder and
    /// are marked as degraded in the manifest; every other failure aborts.
    ///
    /// # Errors
    ///
    /// Returns `OffsetOutOfBounds` before any rendering if a cell offset
    /// leaves its reserved padding, `CellOverflow` if a rotated picture does
    /// not fit its cell, or an invalid parameter error if the canvas size
    /// overflows
    pub fn compose(
        &self,
        assignment: &Assignment,
        input: &ProjectionInput,
        progress: &dyn ProgressSink,
    ) -> Result<CompositeOutput> {
        let grid = assignment.grid();
        let resolution = self.renderer.cell_size();
        let (width, height) = self.layout.canvas_size(grid, resolution)?;

        let origins = grid
            .cells()
            .map(|coord| self.layout.cell_origin(coord, resolution))
            .collect::<Result<Vec<_>>>()?;
        let rotations =
            RotationSource::new(self.seed, self.max_rotation_degrees).draw(grid.cell_count());

        debug!(
            width,
            height,
            cells = grid.cell_count(),
            "Composing canvas"
        );

        let mut canvas = Canvas::blank(width, height);
        let mut manifest = Manifest::new(grid);
        let jobs: Vec<(CellCoord, (u32, u32), i32)> = grid
            .cells()
            .zip(origins)
            .zip(rotations)
            .map(|((coord, origin), degrees)| (coord, origin, degrees))
            .collect();

        progress.begin("cells", grid.cell_count() as u64);
        // One grid row at a time bounds memory; blits stay in row-major order
        for row in jobs.chunks(grid.width()) {
            let rendered = row
                .par_iter()
                .map(|&(coord, origin, degrees)| {
                    let item = assignment.item_at(coord);
                    let reference = item.and_then(|index| input.image_of(index));
                    let (image, degraded) = self.render_cell(coord, reference, degrees)?;
                    progress.advance("cells", 1);
                    Ok(RenderedCell {
                        coord,
                        origin,
                        image,
                        degraded,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            for cell in rendered {
                imageops::replace(
                    &mut canvas.image,
                    &cell.image,
                    i64::from(cell.origin.0),
                    i64::from(cell.origin.1),
                );
                let item = assignment
                    .item_at(cell.coord)
                    .map(|index| {
                        input.items().get(index).ok_or_else(|| {
                            computation_error(&format!("assigned item {index} is not in the input"))
                        })
                    })
                    .transpose()?;
                manifest.record(cell.coord, item, cell.degraded);
            }
        }
        progress.finish("cells");

        Ok(CompositeOutput { canvas, manifest })
    }

    fn render_cell(
        &self,
        coord: CellCoord,
        reference: Option<&str>,
        degrees: i32,
    ) -> Result<(RgbImage, bool)> {
        match self.renderer.render(reference, degrees) {
            Ok(image) => Ok((image, false)),
            Err(error) if error.is_per_cell() => {
                warn!(x = coord.x, y = coord.y, %error, "Drawing placeholder instead");
                Ok((self.renderer.render(None, degrees)?, true))
            }
            Err(error) => Err(error),
        }
    }
}

impl From<Canvas> for RgbImage {
    fn from(canvas: Canvas) -> Self {
        canvas.image
    }
}
