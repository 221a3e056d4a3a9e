use anyhow::bail;
use clap::{Parser, Subcommand};
use snowmint::SnowflakeId;

/// Largest batch `mint` accepts in one invocation.
pub const MAX_MINT_COUNT: usize = 1_000_000;

/// Command-line configuration for the `snowmint` binary.
///
/// The generator identity and epoch are global options, parsed from CLI
/// arguments or environment variables (a `.env` file in the working directory
/// is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowmint",
    version,
    about = "Mint and decode 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    /// Datacenter ID encoded into minted IDs (0-31).
    ///
    /// Environment variable: `SNOWMINT_DATACENTER`
    #[arg(long, env = "SNOWMINT_DATACENTER", default_value_t = 0, global = true)]
    pub datacenter: u64,

    /// Worker ID encoded into minted IDs (0-31).
    ///
    /// Environment variable: `SNOWMINT_WORKER`
    #[arg(long, env = "SNOWMINT_WORKER", default_value_t = 0, global = true)]
    pub worker: u64,

    /// Epoch in Unix milliseconds. Defaults to local midnight of today.
    ///
    /// `parse` adds it back to the decoded timestamp, so use the epoch the IDs
    /// were minted with.
    ///
    /// Environment variable: `SNOWMINT_EPOCH`
    #[arg(long, env = "SNOWMINT_EPOCH", global = true)]
    pub epoch: Option<u64>,

    /// Print JSON instead of plain text.
    #[arg(long, default_value_t = false, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mint new IDs, one per line.
    Mint {
        /// Number of IDs to mint.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Decompose IDs into their fields.
    Parse {
        /// Decimal IDs to decode.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Show each field as raw bits instead of a number.
        #[arg(long, default_value_t = false)]
        bits: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub datacenter: u64,
    pub worker: u64,
    pub epoch: Option<u64>,
    pub json: bool,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.datacenter > SnowflakeId::DATACENTER_MASK {
            bail!(
                "SNOWMINT_DATACENTER ({}) exceeds the datacenter ID space (max = {})",
                args.datacenter,
                SnowflakeId::DATACENTER_MASK
            );
        }

        if args.worker > SnowflakeId::WORKER_MASK {
            bail!(
                "SNOWMINT_WORKER ({}) exceeds the worker ID space (max = {})",
                args.worker,
                SnowflakeId::WORKER_MASK
            );
        }

        if let Command::Mint { count } = args.command {
            if count == 0 || count > MAX_MINT_COUNT {
                bail!("--count must be between 1 and {MAX_MINT_COUNT}, got {count}");
            }
        }

        Ok(Self {
            datacenter: args.datacenter,
            worker: args.worker,
            epoch: args.epoch,
            json: args.json,
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliConfig> {
        let args = CliArgs::try_parse_from(args)?;
        CliConfig::try_from(args)
    }

    #[test]
    fn defaults_mint_a_single_id() {
        let config = parse(&["snowmint", "mint"]).unwrap();
        assert_eq!(config.command, Command::Mint { count: 1 });
        assert_eq!(config.epoch, None);
        assert!(!config.json);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let config = parse(&[
            "snowmint", "parse", "42", "43", "--bits", "--json", "--datacenter", "3", "--epoch", "5",
        ])
        .unwrap();
        assert_eq!(
            config.command,
            Command::Parse {
                ids: vec!["42".to_owned(), "43".to_owned()],
                bits: true
            }
        );
        assert_eq!(config.datacenter, 3);
        assert_eq!(config.epoch, Some(5));
        assert!(config.json);
    }

    #[test]
    fn rejects_out_of_range_identity() {
        let err = parse(&["snowmint", "--datacenter", "32", "mint"]).unwrap_err();
        assert!(err.to_string().contains("max = 31"));
        assert!(parse(&["snowmint", "--worker", "99", "mint"]).is_err());
    }

    #[test]
    fn rejects_bad_counts() {
        assert!(parse(&["snowmint", "mint", "-n", "0"]).is_err());
        assert!(parse(&["snowmint", "mint", "-n", "1000001"]).is_err());
        assert!(parse(&["snowmint", "mint", "-n", "1000000"]).is_ok());
    }

    #[test]
    fn parse_requires_ids() {
        assert!(parse(&["snowmint", "parse"]).is_err());
    }
}
