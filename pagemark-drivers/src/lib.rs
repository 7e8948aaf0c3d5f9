//! Driver layer for fetching rendered pages.
//!
//! This crate wraps a WebDriver session so callers get the page source as
//! the browser rendered it, after client-side scripts have run and network
//! activity has settled.
//!
//! - [`reader_browser::driver::PageDriver`]: WebDriver client wrapper
//! - [`reader_browser::page::RenderedPage`]: navigation plus settle-wait
//! - [`fetch`]: one-shot fetch helpers that always close the session

pub mod fetch;
pub mod reader_browser;
