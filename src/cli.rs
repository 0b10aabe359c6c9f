//! Command-line surface.

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "chaind", about = "Ledger node daemon", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize the node: signing key, genesis file, and node config
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Node home directory (default: ~/.chaind, or $CHAIND_HOME)
    #[arg(long)]
    pub home: Option<String>,

    /// Genesis chain ID; left blank, a test-chain-XXXXXX ID is generated
    #[arg(long = "chain-id")]
    pub chain_id: Option<String>,

    /// Node moniker
    #[arg(long)]
    pub moniker: Option<String>,

    /// Replace an existing genesis file
    #[arg(short = 'o', long)]
    pub overwrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_init_with_all_flags() {
        let cli = Cli::parse_from([
            "chaind",
            "init",
            "--home",
            "/data/node0",
            "--chain-id",
            "mainnet-1",
            "--moniker",
            "node0",
            "--overwrite",
        ]);
        let Command::Init(args) = cli.command;
        assert_eq!(args.home.as_deref(), Some("/data/node0"));
        assert_eq!(args.chain_id.as_deref(), Some("mainnet-1"));
        assert_eq!(args.moniker.as_deref(), Some("node0"));
        assert!(args.overwrite);
    }

    #[test]
    fn init_flags_are_all_optional() {
        let cli = Cli::parse_from(["chaind", "init"]);
        let Command::Init(args) = cli.command;
        assert!(args.home.is_none());
        assert!(args.chain_id.is_none());
        assert!(args.moniker.is_none());
        assert!(!args.overwrite);
    }

    #[test]
    fn overwrite_short_flag() {
        let cli = Cli::parse_from(["chaind", "init", "-o"]);
        let Command::Init(args) = cli.command;
        assert!(args.overwrite);
    }
}
