/// Shared modules for the NGTA console binaries
pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod source;
pub mod widget;
