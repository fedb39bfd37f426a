//! A three-stage packaging pipeline for a single Python distributable:
//! clean stale build output, build an sdist and a wheel, upload them.

pub mod cli;
pub mod config;
pub mod core;
pub mod pipeline;
