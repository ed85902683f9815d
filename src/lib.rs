//! **amazeing** generates rectangular grid mazes, dumps them as hexadecimal wall codes and
//! renders them as text or images.

#![recursion_limit = "1024"]

pub mod cells;
pub mod config;
pub mod errors;
pub mod generators;
pub mod maze;
pub mod renderers;
pub mod units;
