pub mod config;
pub mod play;
pub mod simulate;

pub use config::{handle_config_command, ConfigCommands};
pub use play::{run_play, PlayArgs};
pub use simulate::{run_simulate, SimulateArgs};
