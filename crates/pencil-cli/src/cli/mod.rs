//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `shape` - Sketch a single shape, optionally hachure-filled
//! - `hatch` - Fill a rectangle with hachure lines
//! - `recipe` - Render a YAML scene of sketched shapes
//! - `shapes` - List available shapes

pub mod common;
pub mod hatch;
pub mod recipe;
pub mod shape;

pub use common::CliError;
pub use hatch::cmd_hatch;
pub use recipe::cmd_recipe;
pub use shape::{cmd_shape, cmd_shapes};
