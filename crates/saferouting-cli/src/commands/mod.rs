// Handlers for CLI subcommands. main.rs parses arguments and dispatches here.

pub mod build;
pub mod info;
pub mod route;
