//! Process-wide state shared by the CLI entry points.

mod state;

pub use state::{is_shutdown, register_server, request_shutdown, setup_shutdown_handler};
