//! Tests for configuration defaults, derived sizes and validation

#[cfg(test)]
mod tests {
    use mosaicmap::MosaicError;
    use mosaicmap::io::configuration::{
        CELL_RATIOS, MosaicConfig, SOURCE_IMAGE_SIZE, cell_resolution_for, stagger_padding,
    };
    use mosaicmap::spatial::{CellCoord, GridSpec};

    fn config() -> MosaicConfig {
        MosaicConfig::new(GridSpec::new(4, 4).unwrap())
    }

    // Tests the default cell and inner picture sizes
    // Verified by rounding the cell width up instead of down
    #[test]
    fn test_default_resolutions() {
        let config = config();
        assert_eq!(config.cell_resolution, (868, 1000));
        assert_eq!(config.inner_resolution(), (466, 881));
    }

    // Tests the cell footprint keeps its aspect at other sizes
    // Verified by scaling by the shorter side
    #[test]
    fn test_cell_resolution_for_side() {
        assert_eq!(cell_resolution_for(SOURCE_IMAGE_SIZE, CELL_RATIOS, 100), (86, 100));
        assert_eq!(cell_resolution_for((200, 100), (1.0, 1.0), 50), (50, 25));
    }

    // Tests the default layout staggers odd columns within the padding
    // Verified by staggering even columns
    #[test]
    fn test_default_stagger() {
        let config = config();
        assert_eq!(stagger_padding(1000), 285);
        assert_eq!(config.layout.padding, (0, 285));
        assert_eq!(config.layout.offset_for(CellCoord::new(1, 0)).unwrap(), (0, 285));
        assert_eq!(config.layout.offset_for(CellCoord::new(2, 3)).unwrap(), (0, 0));
    }

    // Tests item capacity is three quarters of the cells, rounded down
    // Verified by rounding the capacity up
    #[test]
    fn test_item_capacity() {
        assert_eq!(config().item_capacity(), 12);
        let mut odd = MosaicConfig::new(GridSpec::new(3, 3).unwrap());
        assert_eq!(odd.item_capacity(), 6);
        odd.fill_fraction = 1.0;
        assert_eq!(odd.item_capacity(), 9);
    }

    // Tests the default configuration validates
    // Verified by checking the rotation against the inner size only
    #[test]
    fn test_default_validates() {
        assert!(config().validate().is_ok());
    }

    // Tests a rotation that cannot fit the cell is rejected
    // Verified by validating the zero-degree extent only
    #[test]
    fn test_rotation_must_fit_cell() {
        let mut config = config();
        config.cell_ratios = (1.05, 1.05);
        assert!(matches!(
            config.validate(),
            Err(MosaicError::InvalidParameter {
                parameter: "cell_ratios",
                ..
            })
        ));
    }

    // Tests individual field checks name the offending parameter
    // Verified by removing the fill fraction range check
    #[test]
    fn test_field_validation() {
        let mut too_steep = config();
        too_steep.max_rotation_degrees = 91;
        assert!(matches!(
            too_steep.validate(),
            Err(MosaicError::InvalidParameter {
                parameter: "max_rotation_degrees",
                ..
            })
        ));

        let mut overfilled = config();
        overfilled.fill_fraction = 1.5;
        assert!(matches!(
            overfilled.validate(),
            Err(MosaicError::InvalidParameter {
                parameter: "fill_fraction",
                ..
            })
        ));

        let mut no_tiles = config();
        no_tiles.tile_size = 0;
        assert!(no_tiles.validate().is_err());

        let mut shrunk = config();
        shrunk.cell_ratios = (0.5, 1.2);
        assert!(shrunk.validate().is_err());
    }

    // Tests tile prefixes cannot escape the tile directory
    // Verified by accepting parent directory components
    #[test]
    fn test_prefix_validation() {
        let mut config = config();
        config.tile_prefix = "../outside".to_string();
        assert!(config.validate().is_err());
        config.tile_prefix = "/abs".to_string();
        assert!(config.validate().is_err());
        config.tile_prefix = "nested/prefix".to_string();
        assert!(config.validate().is_ok());
    }
}
