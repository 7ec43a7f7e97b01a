use clap::{Args, Parser, Subcommand};

use super::helper::DESCRIPTION;

use opflow_types::constants::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(author, version, name = "opflow")]
#[command(about = DESCRIPTION, long_about = None)]
pub struct Cli {
    #[arg(
        global = true,
        short = 'c',
        long,
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config_path: String,

    #[clap(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "List the operators of the library")]
    Operators,
    #[command(about = "Show the operators of a process and their wiring")]
    Show(Show),
    #[command(about = "List what an operator of a process can be replaced by")]
    Candidates(Candidates),
    #[command(about = "Print the JSON schema of the config file")]
    Schema,
    #[command(
        about = "Replace an operator, keeping its connections and nested operators",
        long_about = "Replace an operator by a new one created from the given key. Connections \
        are restored by port name and nested operators are moved into the matching \
        subprocesses; whatever cannot be restored is dropped and reported."
    )]
    Replace(Replace),
}

#[derive(Debug, Args)]
pub struct Show {
    #[arg(short = 'p', long)]
    pub process: String,
}

#[derive(Debug, Args)]
pub struct Candidates {
    #[arg(short = 'p', long)]
    pub process: String,
    #[arg(long)]
    pub operator: String,
}

#[derive(Debug, Args)]
pub struct Replace {
    #[arg(short = 'p', long)]
    pub process: String,
    /// name of the operator to replace
    #[arg(long)]
    pub operator: String,
    /// key of the replacement operator
    #[arg(long = "with")]
    pub with: String,
    /// where to write the result; the process file is overwritten when omitted
    #[arg(short = 'o', long)]
    pub output: Option<String>,
}
