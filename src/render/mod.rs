/// Single cell rendering with frame, placeholder and rotation
pub mod cell;
/// Parallel cell rendering and canvas composition
pub mod compositor;
/// Tile pyramid generation
pub mod pyramid;
/// Seeded rotation angles and rotate-with-expand
pub mod rotation;
