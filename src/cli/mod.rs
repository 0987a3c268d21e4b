pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands, QueryArgs};
pub use handlers::{load_config, CommandHandler};
pub use output::{OutputFormat, OutputFormatter, FORMATTER};
