mod commands;
mod config_cmd;
mod info;
mod init;
mod run;
mod utils;

pub use commands::{Cli, Commands, ConfigAction};
pub use config_cmd::handle_config;
pub use info::info_command;
pub use init::init_config;
pub use run::run_server;
pub use utils::init_logging;
