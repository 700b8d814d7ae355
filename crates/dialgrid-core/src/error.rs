use thiserror::Error;

/// Largest padded cell count a grid may have. Search entries pack a node id
/// and a 3-bit direction into one `u32`.
pub const MAX_NODES: usize = 1 << 29;

/// Errors raised while building a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("expected {expected} cells for the grid, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("grid of {width}x{height} cells does not fit in 29-bit node ids")]
    TooLarge { width: u32, height: u32 },
}
