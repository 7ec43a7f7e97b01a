mod helper;
pub mod types;
pub use helper::{init_opflow, load_config_from_file, parse_config, DESCRIPTION};
