//! Error taxonomy. Local grid/dirty operations never fail — out-of-range
//! coordinates and inverted ranges are clamped or ignored and never reach
//! this type. Only flush and transport operations return
//! `Result<_, EngineError>`.

/// The handful of genuine failures the engine can surface. Everything else
/// (bad coordinates, unknown component commands) is policy-clamped instead
/// of raised.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The transport's byte channel returned an error or EOF during a
    /// write. The render driver preserves its dirty set and cancels.
    #[error("transport failed: {0}")]
    Transport(#[source] std::io::Error),

    /// The transport refused raw mode at start-up. Fatal for a local
    /// transport; a stream transport never raises this (raw mode is a
    /// no-op there).
    #[error("raw mode unavailable: {0}")]
    RawMode(#[source] std::io::Error),

    /// The grid pool could not satisfy an allocation. Treated as fatal:
    /// the engine shuts down cleanly (restore mode, show cursor).
    #[error("grid pool exhausted")]
    PoolExhausted,
}

pub type EngineResult<T> = Result<T, EngineError>;
