mod command_registry;
mod input_parser;

pub use command_registry::DIRECTOR_HELP_COMMANDS;
pub use input_parser::{parse_director_input, DirectorInput};
