//! Command-line interface for the mentions playground
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Subcommands (version, completion, config)

mod completion;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{Config, LogLevel};
use crate::error::Result;

pub use completion::generate_completion;

/// Mention trigger playground
#[derive(Parser, Debug)]
#[command(
    name = "mentions",
    version,
    about = "Drive a mention session against an in-memory editor",
    long_about = "Drive a mention session against an in-memory editor.

Reads playground commands (type, set, back, paste, key, blur, pick, dismiss,
show) from a script file, or interactively when no script is given."
)]
pub struct CliArgs {
    /// Script with one playground command per line
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Space separated trigger keys, overriding the config file
    #[arg(short = 'k', long, value_name = "KEYS")]
    pub keys: Option<String>,

    /// Multi-word keys; pass an empty string to make every key multi-word
    #[arg(short = 'm', long, value_name = "KEYS")]
    pub multiword: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for mentions
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Effective configuration
    config: Config,
}

impl CliInterface {
    /// Parse the process arguments and load the configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;
        Self::apply_args_to_config(&mut config, args);
        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Whether output should be colored
    pub fn color_enabled(&self) -> bool {
        self.config.playground.color_output
    }

    /// Apply CLI arguments to configuration
    ///
    /// # Arguments
    /// * `config` - Configuration to modify
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if let Some(keys) = &args.keys {
            config.expander.keys = keys.clone();
        }
        if let Some(multiword) = &args.multiword {
            config.expander.multiword = Some(multiword.clone());
        }
        if args.no_color {
            config.playground.color_output = false;
        }

        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if a subcommand was handled, false to continue
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                generate_completion(shell)?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn show_version(&self) {
        println!("mentions version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }
        if show {
            self.show_config()?;
        }
        Ok(())
    }

    /// Validate the configuration file as written, without argument overrides
    fn validate_config_file(&self) {
        let path = self.config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("Configuration file does not exist, defaults apply");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(()) => println!("Configuration is valid"),
                Err(e) => println!("Configuration validation failed: {}", e),
            },
            Err(e) => println!("Failed to load configuration: {}", e),
        }
    }

    fn show_config(&self) -> Result<()> {
        println!("Configuration file: {}", self.config_path().display());
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Configuration file path (from args or default)
    pub fn config_path(&self) -> PathBuf {
        self.args
            .config_file
            .as_deref()
            .map(Path::to_path_buf)
            .unwrap_or_else(Config::default_path)
    }
}
