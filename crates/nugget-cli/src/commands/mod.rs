pub mod diff;
pub mod serve;

pub use diff::{handle_diff_command, DiffArgs};
pub use serve::{handle_serve_command, ServeArgs};
