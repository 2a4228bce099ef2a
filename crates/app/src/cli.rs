//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "eshotel")]
#[command(about = "Hotel listing desk for merchants and reviewers")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to eshotel.toml in the config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the database, overriding the configured path
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["eshotel", "--config", "/etc/eshotel.toml", "--data-dir", "/tmp/es"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/eshotel.toml")));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/es")));
    }

    #[test]
    fn test_no_flags() {
        let cli = Cli::parse_from(["eshotel"]);
        assert!(cli.config.is_none());
        assert!(cli.data_dir.is_none());
    }
}
