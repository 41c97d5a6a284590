use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Find default config path with priority:
/// 1. /etc/reelsort/config.yaml (system-wide, preferred)
/// 2. ~/.config/reelsort/config.yaml (user-specific)
/// 3. Fallback to /etc even if it doesn't exist
pub fn default_config_path() -> PathBuf {
    let etc_path = PathBuf::from("/etc/reelsort/config.yaml");

    if etc_path.exists() {
        return etc_path;
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join("reelsort/config.yaml");
        if user_path.exists() {
            return user_path;
        }
    }

    // Fallback to /etc (will show clear error if missing)
    etc_path
}

#[derive(Parser)]
#[command(name = "reelsort")]
#[command(version)]
#[command(about = "Quality-aware renamer for downloaded movie releases", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Organize the pending release groups once
    Organize {
        /// Path to configuration file
        #[arg(short, long, value_name = "FILE", default_value_os_t = default_config_path())]
        config: PathBuf,

        /// Dry-run mode: plan and log without moving anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Run continuously, organizing on an interval
    Daemon {
        /// Path to configuration file
        #[arg(short, long, value_name = "FILE", default_value_os_t = default_config_path())]
        config: PathBuf,

        /// Dry-run mode: plan and log without moving anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Minutes between runs (overrides run_every_minutes from the config)
        #[arg(short, long, value_name = "MINUTES")]
        interval: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_organize_with_config() {
        let cli = Cli::parse_from(vec!["reelsort", "organize", "-c", "test.yaml"]);
        match cli.command {
            Commands::Organize { config, dry_run } => {
                assert_eq!(config, PathBuf::from("test.yaml"));
                assert!(!dry_run);
            }
            _ => panic!("Expected Organize command"),
        }
    }

    #[test]
    fn test_organize_default_config() {
        let cli = Cli::parse_from(vec!["reelsort", "organize"]);
        match cli.command {
            Commands::Organize { config, dry_run } => {
                assert!(config.to_string_lossy().contains("reelsort"));
                assert!(!dry_run);
            }
            _ => panic!("Expected Organize command"),
        }
    }

    #[test]
    fn test_organize_dry_run_short_flag() {
        let cli = Cli::parse_from(vec!["reelsort", "organize", "-c", "custom.yaml", "-n"]);
        match cli.command {
            Commands::Organize { config, dry_run } => {
                assert_eq!(config, PathBuf::from("custom.yaml"));
                assert!(dry_run);
            }
            _ => panic!("Expected Organize command"),
        }
    }

    #[test]
    fn test_daemon_default() {
        let cli = Cli::parse_from(vec!["reelsort", "daemon"]);
        match cli.command {
            Commands::Daemon {
                config,
                dry_run,
                interval,
            } => {
                assert!(config.to_string_lossy().contains("reelsort"));
                assert!(!dry_run);
                assert_eq!(interval, None);
            }
            _ => panic!("Expected Daemon command"),
        }
    }

    #[test]
    fn test_daemon_with_interval() {
        let cli = Cli::parse_from(vec!["reelsort", "daemon", "-i", "15"]);
        match cli.command {
            Commands::Daemon { interval, .. } => {
                assert_eq!(interval, Some(15));
            }
            _ => panic!("Expected Daemon command"),
        }
    }

    #[test]
    fn test_daemon_all_flags() {
        let cli = Cli::parse_from(vec![
            "reelsort", "daemon", "-c", "custom.yaml", "-n", "-i", "45",
        ]);
        match cli.command {
            Commands::Daemon {
                config,
                dry_run,
                interval,
            } => {
                assert_eq!(config, PathBuf::from("custom.yaml"));
                assert!(dry_run);
                assert_eq!(interval, Some(45));
            }
            _ => panic!("Expected Daemon command"),
        }
    }
}
