//! Tests for pyramid planning, tile extraction and level generation

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use mosaicmap::MosaicError;
    use mosaicmap::io::progress::{ProgressSink, SilentProgress};
    use mosaicmap::io::tiles::{MemoryTileSink, TileKey, TileSink};
    use mosaicmap::render::cell::WHITE;
    use mosaicmap::render::pyramid::{PyramidLevel, TilePyramidBuilder, extract_tile, halve};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn patterned(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 251) as u8, (y % 241) as u8, ((x + y) % 7) as u8])
        })
    }

    #[derive(Default)]
    struct CountingProgress {
        total: AtomicU64,
        done: AtomicU64,
    }

    impl ProgressSink for CountingProgress {
        fn begin(&self, _stage: &'static str, total: u64) {
            self.total.store(total, Ordering::SeqCst);
        }

        fn advance(&self, _stage: &'static str, units: u64) {
            self.done.fetch_add(units, Ordering::SeqCst);
        }

        fn finish(&self, _stage: &'static str) {}
    }

    struct RejectingSink {
        reject_zoom: u32,
        accepted: AtomicU64,
    }

    impl TileSink for RejectingSink {
        fn write_tile(&self, key: TileKey, _tile: &RgbImage) -> mosaicmap::Result<()> {
            if key.zoom == self.reject_zoom {
                return Err(MosaicError::FileSystem {
                    path: PathBuf::from(format!("{}/{}/{}.png", key.zoom, key.x, key.y)),
                    operation: "write tile",
                    source: std::io::Error::other("disk full"),
                });
            }
            self.accepted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    // Tests the zoom range of a 600 pixel canvas with 256 pixel tiles
    // Verified by computing the depth with floor(log2)
    #[test]
    fn test_plan_depth() {
        let builder = TilePyramidBuilder::new(256, 8).unwrap();
        let plan = builder.plan((600, 600)).unwrap();
        assert_eq!(plan.depth, 2);
        assert_eq!(plan.side_tiles, 4);
        assert_eq!((plan.min_zoom, plan.max_zoom), (6, 8));
        assert_eq!(plan.side_tiles_at(7), 2);
    }

    // Tests zoom indices outside the plan have no tiles
    // Verified by subtracting the minimum zoom unchecked
    #[test]
    fn test_side_tiles_outside_plan() {
        let plan = TilePyramidBuilder::new(256, 8).unwrap().plan((600, 600)).unwrap();
        assert_eq!(plan.side_tiles_at(6), 1);
        assert_eq!(plan.side_tiles_at(8), 4);
        assert_eq!(plan.side_tiles_at(5), 0);
        assert_eq!(plan.side_tiles_at(0), 0);
        assert_eq!(plan.side_tiles_at(9), 0);
    }

    // Tests a canvas needing sixteen or more halvings is rejected
    // Verified by removing the depth limit
    #[test]
    fn test_plan_rejects_huge_depth() {
        let builder = TilePyramidBuilder::new(1, 40).unwrap();
        assert!(matches!(
            builder.plan((u32::MAX, 1)),
            Err(MosaicError::InvalidParameter {
                parameter: "tile_size",
                ..
            })
        ));
    }

    // Tests a sink failure aborts the build with the sink's error
    // Verified by ignoring the result of each tile write
    #[test]
    fn test_build_propagates_sink_error() {
        let sink = RejectingSink {
            reject_zoom: 7,
            accepted: AtomicU64::new(0),
        };
        let builder = TilePyramidBuilder::new(256, 8).unwrap();
        let result = builder.build(&patterned(600, 600), &sink, &SilentProgress);

        assert!(matches!(
            result,
            Err(MosaicError::FileSystem {
                operation: "write tile",
                ..
            })
        ));
        // The finest level completed, the coarsest was never reached
        assert_eq!(sink.accepted.load(Ordering::SeqCst), 16);
    }

    // Tests a canvas needing more levels than the top zoom allows is rejected
    // Verified by saturating the minimum zoom at zero
    #[test]
    fn test_plan_rejects_shallow_top_zoom() {
        let builder = TilePyramidBuilder::new(256, 1).unwrap();
        assert!(matches!(
            builder.plan((600, 600)),
            Err(MosaicError::InvalidParameter {
                parameter: "top_zoom",
                ..
            })
        ));
        assert!(TilePyramidBuilder::new(0, 8).is_err());
    }

    // Tests every level of a 600x600 canvas with the expected tile counts
    // Verified by generating one level fewer than planned
    #[test]
    fn test_build_levels() {
        let builder = TilePyramidBuilder::new(256, 8).unwrap();
        let sink = MemoryTileSink::new();
        let pyramid = builder.build(&patterned(600, 600), &sink, &SilentProgress).unwrap();

        assert_eq!(
            pyramid.levels,
            vec![
                PyramidLevel {
                    zoom: 8,
                    side_tiles: 4,
                    image_size: (600, 600),
                },
                PyramidLevel {
                    zoom: 7,
                    side_tiles: 2,
                    image_size: (300, 300),
                },
                PyramidLevel {
                    zoom: 6,
                    side_tiles: 1,
                    image_size: (150, 150),
                },
            ]
        );
        assert_eq!(pyramid.tile_count(), 21);
        assert_eq!(sink.len(), 21);
        for tile in sink.into_tiles().values() {
            assert_eq!(tile.dimensions(), (256, 256));
        }
    }

    // Tests the finest level reassembles to the canvas with white padding
    // Verified by stretching edge tiles to the full tile size
    #[test]
    fn test_finest_level_reassembles() {
        let canvas = patterned(600, 520);
        let builder = TilePyramidBuilder::new(256, 8).unwrap();
        let sink = MemoryTileSink::new();
        builder.build(&canvas, &sink, &SilentProgress).unwrap();

        for x in 0..4_u32 {
            for y in 0..4_u32 {
                let tile = sink.get(TileKey::new(8, x, y)).unwrap();
                for ty in 0..256 {
                    for tx in 0..256 {
                        let (cx, cy) = (x * 256 + tx, y * 256 + ty);
                        let expected = canvas.get_pixel_checked(cx, cy).copied().unwrap_or(WHITE);
                        assert_eq!(
                            tile.get_pixel(tx, ty),
                            &expected,
                            "tile ({x}, {y}) at ({tx}, {ty})"
                        );
                    }
                }
            }
        }
    }

    // Tests progress totals match the tiles written
    // Verified by reporting only the finest level
    #[test]
    fn test_build_reports_progress() {
        let progress = CountingProgress::default();
        let builder = TilePyramidBuilder::new(64, 4).unwrap();
        let sink = MemoryTileSink::new();
        let pyramid = builder.build(&patterned(200, 100), &sink, &progress).unwrap();

        assert_eq!(pyramid.min_zoom, 2);
        assert_eq!(progress.total.load(Ordering::SeqCst), 21);
        assert_eq!(progress.done.load(Ordering::SeqCst), 21);
    }

    // Tests a canvas smaller than one tile yields a single padded tile
    // Verified by skipping levels when the depth is zero
    #[test]
    fn test_single_tile_canvas() {
        let builder = TilePyramidBuilder::new(256, 8).unwrap();
        let sink = MemoryTileSink::new();
        let pyramid = builder.build(&patterned(100, 50), &sink, &SilentProgress).unwrap();

        assert_eq!((pyramid.min_zoom, pyramid.max_zoom), (8, 8));
        let tile = sink.get(TileKey::new(8, 0, 0)).unwrap();
        assert_eq!(tile.get_pixel(99, 49), &Rgb([99, 49, 1]));
        assert_eq!(tile.get_pixel(100, 49), &WHITE);
        assert_eq!(tile.get_pixel(0, 50), &WHITE);
    }

    // Tests halving uses integer division and never collapses to zero
    // Verified by rounding halved sizes up
    #[test]
    fn test_halve() {
        assert_eq!(halve(&patterned(5, 3)).dimensions(), (2, 1));
        assert_eq!(halve(&patterned(1, 1)).dimensions(), (1, 1));
        let flat = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
        assert!(halve(&flat).pixels().all(|p| *p == Rgb([10, 20, 30])));
    }

    // Tests tiles outside the image are entirely white
    // Verified by clamping the tile origin into the image
    #[test]
    fn test_extract_tile_outside() {
        let tile = extract_tile(&patterned(10, 10), 3, 0, 8);
        assert_eq!(tile.dimensions(), (8, 8));
        assert!(tile.pixels().all(|p| *p == WHITE));
    }
}
