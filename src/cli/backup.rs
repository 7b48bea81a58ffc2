//! `crst backup` commands
//!
//! Create, list, and restore zip backups of the entry store.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::config::Config;
use crate::core::backup::BackupService;

#[derive(Args, Debug)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommands,
}

#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Create a new backup
    Create {
        /// Name for the backup (default: backup_<timestamp>)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List available backups, newest first
    List,

    /// Restore a backup by name or path
    Restore {
        /// Backup name, or a path to a .zip file
        target: String,
    },
}

pub fn run(args: BackupArgs, config: &Config) -> Result<()> {
    let service = BackupService::new(&config.storage_dir)?;

    match args.command {
        BackupCommands::Create { name } => {
            let path = service.create_backup(name.as_deref())?;
            println!("✅ Backup created: {}", path.display());
        }
        BackupCommands::List => {
            let backups = service.list_backups()?;
            if backups.is_empty() {
                println!("No backups found.");
                return Ok(());
            }
            for backup in backups {
                println!(
                    "{}  {}  v{}  {}",
                    backup.name.bold(),
                    backup.timestamp.dimmed(),
                    backup.version,
                    format_size(backup.size).cyan(),
                );
            }
        }
        BackupCommands::Restore { target } => {
            let candidate = PathBuf::from(&target);
            let path = if candidate.exists() {
                candidate
            } else {
                service.backup_path(&target)
            };
            service.restore_backup(&path)?;
            println!("✅ Restored from {}", path.display());
            println!("   A pre-restore snapshot of the previous data was kept.");
        }
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
