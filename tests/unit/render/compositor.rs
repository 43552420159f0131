//! Tests for canvas composition, cell placement and manifest recording

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Rgb, RgbImage};
    use mosaicmap::MosaicError;
    use mosaicmap::algorithm::solver::GridAssignmentSolver;
    use mosaicmap::io::image::{PngCompression, encode_png};
    use mosaicmap::io::image_store::MemoryImageStore;
    use mosaicmap::io::progress::SilentProgress;
    use mosaicmap::render::cell::{CellImageRenderer, WHITE};
    use mosaicmap::render::compositor::CanvasCompositor;
    use mosaicmap::spatial::{
        CellCoord, GridSpec, Item, Layout, OffsetStrategy, ProjectedPoint, ProjectionInput,
    };

    const GREY: Rgb<u8> = Rgb([128, 128, 128]);
    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    fn store() -> MemoryImageStore {
        let mut store = MemoryImageStore::new();
        for (name, color) in [("red.png", RED), ("blue.png", BLUE)] {
            let bytes = encode_png(&RgbImage::from_pixel(16, 16, color), PngCompression::Fast);
            store.insert(name, bytes.unwrap());
        }
        store
    }

    fn placeholder() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, GREY))
    }

    fn diagonal_input() -> ProjectionInput {
        ProjectionInput::new(
            vec![Item::new("r", "red.png"), Item::new("b", "blue.png")],
            vec![ProjectedPoint::new(0.0, 0.0), ProjectedPoint::new(1.0, 1.0)],
        )
        .unwrap()
    }

    // Tests assigned pictures and placeholders land at their cell positions
    // Verified by blitting cells in reverse order
    #[test]
    fn test_compose_places_cells() {
        let store = store();
        let renderer = CellImageRenderer::new(&store, &placeholder(), (40, 40), (20, 20)).unwrap();
        let layout = Layout::default();
        let input = diagonal_input();
        let grid = GridSpec::new(2, 2).unwrap();
        let assignment = GridAssignmentSolver::new(grid).solve(input.points()).unwrap();

        let output = CanvasCompositor::new(&renderer, &layout, 1, 0)
            .compose(&assignment, &input, &SilentProgress)
            .unwrap();
        let image = output.canvas.image();

        assert_eq!(image.dimensions(), (80, 80));
        assert_eq!(image.get_pixel(20, 20), &RED);
        assert_eq!(image.get_pixel(60, 60), &BLUE);
        assert_eq!(image.get_pixel(60, 20), &GREY);
        assert_eq!(image.get_pixel(20, 60), &GREY);
        assert_eq!(image.get_pixel(1, 1), &WHITE);
    }

    // Tests the manifest lists every cell in row-major order
    // Verified by recording cells in render completion order
    #[test]
    fn test_manifest_row_major() {
        let store = store();
        let renderer = CellImageRenderer::new(&store, &placeholder(), (40, 40), (20, 20)).unwrap();
        let layout = Layout::default();
        let input = diagonal_input();
        let grid = GridSpec::new(2, 2).unwrap();
        let assignment = GridAssignmentSolver::new(grid).solve(input.points()).unwrap();

        let manifest = CanvasCompositor::new(&renderer, &layout, 1, 0)
            .compose(&assignment, &input, &SilentProgress)
            .unwrap()
            .manifest;

        let positions: Vec<_> = manifest.grid.iter().map(|cell| cell.pos).collect();
        assert_eq!(
            positions,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
            ]
        );
        let items: Vec<_> = manifest.grid.iter().map(|cell| cell.item.as_deref()).collect();
        assert_eq!(items, vec![Some("r"), None, None, Some("b")]);
        assert_eq!(manifest.grid[3].image.as_deref(), Some("blue.png"));
    }

    // Tests staggered columns shift odd columns down inside the padding
    // Verified by applying the offset to even columns
    #[test]
    fn test_staggered_layout() {
        let store = store();
        let renderer = CellImageRenderer::new(&store, &placeholder(), (40, 40), (20, 20)).unwrap();
        let layout = Layout::staggered_columns(10);
        let grid = GridSpec::new(2, 1).unwrap();
        let input = ProjectionInput::new(
            diagonal_input().items().to_vec(),
            vec![ProjectedPoint::new(0.0, 0.0), ProjectedPoint::new(1.0, 0.0)],
        )
        .unwrap();
        let assignment = GridAssignmentSolver::new(grid).solve(input.points()).unwrap();

        let output = CanvasCompositor::new(&renderer, &layout, 1, 0)
            .compose(&assignment, &input, &SilentProgress)
            .unwrap();
        let image = output.canvas.into_image();

        assert_eq!(image.dimensions(), (80, 50));
        // Red spans rows 10..30 in column 0, blue spans rows 20..40 in column 1
        assert_eq!(image.get_pixel(20, 12), &RED);
        assert_eq!(image.get_pixel(60, 12), &WHITE);
        assert_eq!(image.get_pixel(60, 35), &BLUE);
        assert_eq!(image.get_pixel(20, 35), &WHITE);
    }

    // Tests offsets beyond the reserved padding fail before rendering
    // Verified by clipping cells at the canvas edge
    #[test]
    fn test_offset_out_of_bounds() {
        let store = store();
        let renderer = CellImageRenderer::new(&store, &placeholder(), (40, 40), (20, 20)).unwrap();
        let layout = Layout::new(OffsetStrategy::Fixed(0), OffsetStrategy::Fixed(5), (0, 2));
        let input = diagonal_input();
        let assignment = GridAssignmentSolver::new(GridSpec::new(2, 2).unwrap())
            .solve(input.points())
            .unwrap();

        let result = CanvasCompositor::new(&renderer, &layout, 1, 0).compose(
            &assignment,
            &input,
            &SilentProgress,
        );
        assert!(matches!(
            result,
            Err(MosaicError::OffsetOutOfBounds { .. })
        ));
    }

    // Tests an unreadable picture is replaced by the placeholder and flagged
    // Verified by leaving the degraded flag unset
    #[test]
    fn test_missing_picture_degrades() {
        let store = store();
        let renderer = CellImageRenderer::new(&store, &placeholder(), (40, 40), (20, 20)).unwrap();
        let layout = Layout::default();
        let input = ProjectionInput::new(
            vec![Item::new("lost", "nowhere.png")],
            vec![ProjectedPoint::new(0.0, 0.0)],
        )
        .unwrap();
        let assignment = GridAssignmentSolver::new(GridSpec::new(1, 1).unwrap())
            .solve(input.points())
            .unwrap();

        let output = CanvasCompositor::new(&renderer, &layout, 1, 0)
            .compose(&assignment, &input, &SilentProgress)
            .unwrap();
        assert_eq!(output.canvas.image().get_pixel(20, 20), &GREY);
        assert!(output.manifest.grid[0].degraded);
        assert_eq!(output.manifest.grid[0].item.as_deref(), Some("lost"));
    }
}
