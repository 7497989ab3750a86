use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// More objects were declared than the hardware table holds. This is a
    /// sizing bug in the entity arrays or formation tables.
    #[error("object pool exhausted: all {capacity} hardware records are allocated")]
    Exhausted { capacity: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("unknown object shape class {0}, expected 0..=11")]
    UnknownShape(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileMapError {
    #[error("unsupported tile map size {width}x{height}, expected 32 or 64 tiles per side")]
    UnsupportedSize { width: usize, height: usize },
    #[error("tile map holds {actual} entries but {width}x{height} needs {expected}")]
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}
