//! Output formatting module.

pub mod progress;
pub mod table;

pub use table::{render_hosts_table, render_roles_table};
