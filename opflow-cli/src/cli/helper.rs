use crate::errors::CliError;
use crate::simple::SimpleOrchestrator as Opflow;

use handlebars::Handlebars;
use opflow_core::description::OperatorService;
use opflow_types::constants::DEFAULT_CONFIG_PATH;
use opflow_types::models::config::Config;
use opflow_types::models::library::OperatorLibrary;
use opflow_types::serde_yaml;
use opflow_types::tracing::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub fn init_opflow(config: &Config) -> Result<Opflow, CliError> {
    let service = match &config.library {
        Some(path) => load_library(Path::new(path))?,
        None => OperatorService::builtin(),
    };
    Ok(Opflow::new(service))
}

fn load_library(path: &Path) -> Result<OperatorService, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileSystem(path.to_path_buf(), e))?;
    let library = OperatorLibrary::from_yaml_str(&content)
        .map_err(|e| CliError::FailedToLoadLibrary(path.to_path_buf(), e))?;
    info!(
        "Loaded {} operators from {}",
        library.operators.len(),
        path.display()
    );
    Ok(OperatorService::new(library))
}

/// Reads the config file. A missing file at the default location means the default config.
pub fn load_config_from_file(config_path: &str) -> Result<Config, CliError> {
    let path = PathBuf::from(config_path);
    if !path.exists() {
        if config_path == DEFAULT_CONFIG_PATH {
            debug!("No {} found, using the default config", config_path);
            return Ok(Config::default());
        }
        return Err(CliError::FailedToFindConfigurationFile(
            config_path.to_string(),
        ));
    }
    let content =
        std::fs::read_to_string(&path).map_err(|e| CliError::FileSystem(path.clone(), e))?;
    parse_config(&content)
}

/// Renders `{{VARIABLE}}` placeholders from the environment, then parses the yaml.
pub fn parse_config(config_template: &str) -> Result<Config, CliError> {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string("config", config_template)
        .map_err(|e| CliError::FailedToParseYaml(Box::new(e)))?;

    let mut data = BTreeMap::new();

    for (key, value) in std::env::vars() {
        data.insert(key, value);
    }

    let config_str = handlebars
        .render("config", &data)
        .map_err(|e| CliError::FailedToParseYaml(Box::new(e)))?;

    let config: Config = serde_yaml::from_str(&config_str)
        .map_err(|e: serde_yaml::Error| CliError::FailedToParseYaml(Box::new(e)))?;

    Ok(config)
}

pub const DESCRIPTION: &str = r#"Inspect analysis processes and replace their operators in place.

 Connections are carried over by port name, nested operators by subprocess position.
"#;
