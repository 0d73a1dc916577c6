use clap::{Args, Parser, Subcommand};

use stacker_api::BlockSize;
use stacker_engine::{BlockConfig, Layout};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "stacker", about = "Pack JSON-lines records into fixed-size blocks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Block records and print one summary line per block
    Run(RunArgs),
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Path to the TOML config file
    #[arg(long, default_value = "stacker.toml", env = "STACKER_CONFIG")]
    pub config: String,

    /// JSON-lines input file ("-" or unset reads stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Records per block (unset = one block per partition)
    #[arg(long, allow_negative_numbers = true)]
    pub block_size: Option<i64>,

    /// Number of partitions to split the input into
    #[arg(long)]
    pub partitions: Option<usize>,

    /// Record layout: native, tuple or sparse
    #[arg(long)]
    pub layout: Option<Layout>,
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Final settings after merging: config file < env/CLI.
#[derive(Debug)]
pub struct Effective {
    pub input: Option<String>,
    pub block_size: Option<BlockSize>,
    pub partitions: usize,
    pub layout: Layout,
}

impl Effective {
    pub fn new(args: &RunArgs) -> Result<Self, CliError> {
        let file = match BlockConfig::load(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e.into());
                }
                tracing::debug!(config = %args.config, "no config file, using defaults");
                BlockConfig::default()
            }
        };

        let merged = BlockConfig {
            block_size: args.block_size.or(file.block_size),
            partitions: args.partitions.unwrap_or(file.partitions),
            layout: args.layout.unwrap_or(file.layout),
        };
        merged.validate()?;

        Ok(Self {
            input: args.input.clone(),
            block_size: merged.block_size()?,
            partitions: merged.partitions,
            layout: merged.layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["stacker", "run", "--config", "/nonexistent/stacker.toml"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Run(args) => args,
        }
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let eff = Effective::new(&run_args(&[])).unwrap();
        assert_eq!(eff.block_size, None);
        assert_eq!(eff.partitions, 4);
        assert_eq!(eff.layout, Layout::Native);
    }

    #[test]
    fn flags_override() {
        let eff = Effective::new(&run_args(&[
            "--block-size",
            "16",
            "--partitions",
            "2",
            "--layout",
            "sparse",
        ]))
        .unwrap();
        assert_eq!(eff.block_size.map(BlockSize::get), Some(16));
        assert_eq!(eff.partitions, 2);
        assert_eq!(eff.layout, Layout::Sparse);
    }

    #[test]
    fn invalid_block_size_is_rejected() {
        assert!(Effective::new(&run_args(&["--block-size", "-3"])).is_err());
        assert!(Effective::new(&run_args(&["--block-size", "0"])).is_err());
    }

    #[test]
    fn unknown_layout_fails_to_parse() {
        let argv = ["stacker", "run", "--layout", "csv"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
