/// Square linear assignment by shortest augmenting paths
pub mod assignment;
/// Mosaic build orchestration
pub mod executor;
/// Assignment of projected points to grid lattice cells
pub mod solver;
