//! Common types shared across Pagemark crates.
//!
//! This crate defines the shared error type and the centralised tracing
//! initialisation used by every binary and integration test in the
//! workspace. It is intentionally lightweight and dependency-minimal so
//! that all crates can depend on it without introducing heavy transitive
//! costs.
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`PagemarkError`] and [`Result`]: Shared error handling

pub mod observability;

/// Error types used across the Pagemark pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PagemarkError {
    /// A page could not be fetched or rendered.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The browser driver reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// The generation backend failed or returned an unusable response.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Page load or network activity did not settle within the deadline.
    #[error("Timeout occurred")]
    Timeout,

    /// Writing the rendered output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient alias for results that use [`PagemarkError`].
pub type Result<T> = std::result::Result<T, PagemarkError>;
