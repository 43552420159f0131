//! Rendering of a single grid cell: framed, rotated picture on white
//!
//! A cell is `cell` pixels; its picture occupies a smaller `inner` rectangle
//! so a white frame remains around it. Source pictures are cover-fitted into
//! the inner rectangle; empty cells show a placeholder instead. The picture is
//! then rotated (growing its bounds) and centered on the white cell.

use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::image::decode_image;
use crate::io::image_store::ImageStore;
use crate::math::geometry::{centered_origin, cover_fit_size};
use crate::render::rotation::rotate_expand;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use image::imageops::{self, FilterType};

/// Background and fill colour of every cell
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Composite an image over white, dropping any transparency
pub fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let mut background = RgbaImage::from_pixel(image.width(), image.height(), Rgba([255; 4]));
    imageops::overlay(&mut background, &image.to_rgba8(), 0, 0);
    DynamicImage::ImageRgba8(background).to_rgb8()
}

/// Scale uniformly to cover `target`, then crop the center to exactly `target`
pub fn cover_crop(image: &RgbImage, target: (u32, u32)) -> RgbImage {
    let scaled_size = cover_fit_size(image.dimensions(), target);
    let scaled = imageops::resize(image, scaled_size.0, scaled_size.1, FilterType::Lanczos3);
    let (left, top) = centered_origin(scaled_size, target);
    imageops::crop_imm(&scaled, left, top, target.0, target.1).to_image()
}

/// Center `picture` on a white canvas of `cell` size
///
/// # Errors
///
/// Returns `CellOverflow` if the picture is larger than the cell on either axis
pub fn place_centered(picture: &RgbImage, cell: (u32, u32)) -> Result<RgbImage> {
    let size = picture.dimensions();
    if size.0 > cell.0 || size.1 > cell.1 {
        return Err(MosaicError::CellOverflow {
            rotated: size,
            cell,
        });
    }
    let mut canvas = RgbImage::from_pixel(cell.0, cell.1, WHITE);
    let (left, top) = centered_origin(cell, size);
    imageops::replace(&mut canvas, picture, i64::from(left), i64::from(top));
    Ok(canvas)
}

/// Renders cells from an image store, falling back to a placeholder
pub struct CellImageRenderer<'a> {
    store: &'a dyn ImageStore,
    placeholder: RgbImage,
    cell: (u32, u32),
    inner: (u32, u32),
}

impl<'a> CellImageRenderer<'a> {
    /// Create a renderer for cells of `cell` pixels with an `inner` picture area
    ///
    /// The placeholder is flattened and resized once here and reused for
    /// every empty cell.
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if either size is zero or the inner
    /// area is larger than the cell
    pub fn new(
        store: &'a dyn ImageStore,
        placeholder: &DynamicImage,
        cell: (u32, u32),
        inner: (u32, u32),
    ) -> Result<Self> {
        if cell.0 == 0 || cell.1 == 0 || inner.0 == 0 || inner.1 == 0 {
            return Err(invalid_parameter(
                "cell_resolution",
                &format!("{}x{} / {}x{}", cell.0, cell.1, inner.0, inner.1),
                &"cell and inner sizes must be positive",
            ));
        }
        if inner.0 > cell.0 || inner.1 > cell.1 {
            return Err(invalid_parameter(
                "cell_ratios",
                &format!("{}x{}", inner.0, inner.1),
                &format!("inner picture larger than the {}x{} cell", cell.0, cell.1),
            ));
        }

        let placeholder = imageops::resize(
            &flatten_on_white(placeholder),
            inner.0,
            inner.1,
            FilterType::Lanczos3,
        );

        Ok(Self {
            store,
            placeholder,
            cell,
            inner,
        })
    }

    /// Size of a rendered cell
    pub const fn cell_size(&self) -> (u32, u32) {
        self.cell
    }

    /// Size of the picture area inside the frame
    pub const fn inner_size(&self) -> (u32, u32) {
        self.inner
    }

    /// Load a picture from the store and cover-fit it to the inner area
    ///
    /// # Errors
    ///
    /// Returns `ImageNotFound` or `ImageLoad` if the store lookup or decoding fails
    pub fn load_picture(&self, reference: &str) -> Result<RgbImage> {
        let bytes = self.store.read(reference)?;
        let image = decode_image(&bytes, reference)?;
        Ok(cover_crop(&flatten_on_white(&image), self.inner))
    }

    /// Render one cell
    ///
    /// `None` renders the placeholder.
    ///
    /// # Errors
    ///
    /// Returns a load error for a failed picture, or `CellOverflow` if the
    /// rotated picture does not fit the cell
    pub fn render(&self, reference: Option<&str>, degrees: i32) -> Result<RgbImage> {
        let rotated = match reference {
            Some(reference) => rotate_expand(&self.load_picture(reference)?, degrees, WHITE),
            None => rotate_expand(&self.placeholder, degrees, WHITE),
        };
        place_centered(&rotated, self.cell)
    }
}
