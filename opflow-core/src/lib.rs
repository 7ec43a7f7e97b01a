mod definition;
pub mod description;
pub mod errors;
pub mod execution_unit;
pub mod node;
pub mod notification;
pub mod operator;
pub mod ports;
mod process;
pub use process::*;
pub mod renderer;
pub mod replace;
pub mod rewire;
pub mod workbench;


pub use daggy;
