//! hostedit - add, list, edit and delete entries in the system hosts file.

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod hosts;
pub mod logging;
pub mod platform;
