pub mod cli;
pub mod cursor_file;
pub mod load_config;
pub mod parliament;
pub mod tumblr;

pub use cli::{run, Cli, Commands};
