//! Output for the cleanup run.
//!
//! - [`terminal`] - report lines
//! - [`debug_dump`] - raw JSON written to disk for inspection

mod debug_dump;
mod terminal;

pub use debug_dump::DebugOutput;
pub use terminal::{
    format_group_header, format_last_upgrade, format_vm_line, group_banner, Platform,
    GROUP_SEPARATOR,
};
