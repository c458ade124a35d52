//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use typereg_core::{Error as RegistryError, RegistryConfig};

/// Default repository id for the in-memory repository.
pub const DEFAULT_REPOSITORY: &str = "default";

/// Inspect a type hierarchy built from a JSON file of type definitions.
#[derive(Parser, Debug)]
#[command(name = "typereg")]
#[command(version, about = "Object-type registry inspector", long_about = None)]
pub struct Args {
    /// Registry configuration file (JSON).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON array of type definitions, created in order.
    #[arg(short, long)]
    pub types: Option<PathBuf>,

    /// Repository id.
    #[arg(short, long, default_value = DEFAULT_REPOSITORY)]
    pub repository: String,

    /// Override the maximum type and property id length.
    #[arg(long)]
    pub max_id_length: Option<usize>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to print.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the children of a type, or the base types.
    Children {
        /// Parent type id. Omit for the base types.
        type_id: Option<String>,

        /// Number of children to skip.
        #[arg(long, allow_negative_numbers = true)]
        skip: Option<i64>,

        /// Maximum number of children to return; negative means all.
        #[arg(long, allow_negative_numbers = true)]
        max_items: Option<i64>,

        /// Include property definitions.
        #[arg(long)]
        include_properties: bool,
    },

    /// Print the descendant tree of a type, or of all base types.
    Descendants {
        /// Root type id. Omit for the whole hierarchy.
        type_id: Option<String>,

        /// Levels to descend; negative means unbounded.
        #[arg(long, allow_negative_numbers = true)]
        depth: Option<i64>,

        /// Include property definitions.
        #[arg(long)]
        include_properties: bool,
    },

    /// Print one type definition.
    Show {
        /// Type id.
        type_id: String,
    },

    /// List repositories.
    Repositories,
}

impl Args {
    /// Build the registry configuration from the config file and overrides.
    pub fn registry_config(&self) -> Result<RegistryConfig, RegistryError> {
        let mut config = match &self.config {
            Some(path) => RegistryConfig::from_json_file(path)?,
            None => RegistryConfig::default(),
        };
        if let Some(length) = self.max_id_length {
            config = config.with_max_id_length(length);
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_children() {
        let args = Args::parse_from([
            "typereg",
            "--types",
            "types.json",
            "children",
            "cmis:document",
            "--skip",
            "2",
            "--max-items",
            "-1",
        ]);
        assert_eq!(args.repository, DEFAULT_REPOSITORY);
        assert_eq!(
            args.command,
            Command::Children {
                type_id: Some("cmis:document".into()),
                skip: Some(2),
                max_items: Some(-1),
                include_properties: false,
            }
        );
    }

    #[test]
    fn test_parse_descendants() {
        let args = Args::parse_from(["typereg", "descendants", "--depth", "0"]);
        assert_eq!(
            args.command,
            Command::Descendants {
                type_id: None,
                depth: Some(0),
                include_properties: false,
            }
        );
    }

    #[test]
    fn test_registry_config_override() {
        let args = Args::parse_from(["typereg", "--max-id-length", "16", "repositories"]);
        let config = args.registry_config().unwrap();
        assert_eq!(config.max_id_length, 16);

        let args = Args::parse_from(["typereg", "--max-id-length", "0", "repositories"]);
        assert!(args.registry_config().is_err());
    }
}
