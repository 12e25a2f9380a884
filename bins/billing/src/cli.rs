//! Command-line interface definition.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use tutorbill_core::enrollment::PenalizationStatus;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "billing")]
#[command(about = "Monthly attendance billing for Tutorbill", long_about = None)]
pub struct Cli {
    /// Write JSON output to this file instead of stdout
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Payment report of one professor
    Report {
        #[arg(long)]
        professor: Uuid,
        /// Month as YYYY-MM
        #[arg(long)]
        month: String,
    },
    /// Payment report of the configured special professor
    SpecialReport {
        #[arg(long)]
        month: String,
    },
    /// Payment reports of every other professor
    GeneralReport {
        #[arg(long)]
        month: String,
    },
    /// Build the monthly tracker snapshot, optionally storing it
    Snapshot {
        #[arg(long)]
        month: String,
        /// JSON file with manual balance overrides
        #[arg(long)]
        excedents: Option<PathBuf>,
        /// Store the snapshot (write-once per month)
        #[arg(long)]
        save: bool,
    },
    /// Apply balance directives to enrollment balances
    #[command(group(
        ArgGroup::new("source")
            .args(["input", "tracker"])
            .required(true)
            .multiple(false)
    ))]
    Reconcile {
        /// JSON file with `report`, `specialProfessorReport`, and `excedents`
        #[arg(long)]
        input: Option<PathBuf>,
        /// Reconcile from the stored snapshot of this month (YYYY-MM)
        #[arg(long)]
        tracker: Option<String>,
    },
    /// Change a class's penalization status
    Penalize {
        #[arg(long)]
        class: Uuid,
        #[arg(long, value_enum)]
        status: StatusArg,
    },
}

/// Penalization status accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Pending,
    Penalized,
    Excused,
}

impl From<StatusArg> for PenalizationStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Penalized => Self::Penalized,
            StatusArg::Excused => Self::Excused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_reconcile_requires_one_source() {
        assert!(Cli::try_parse_from(["billing", "reconcile"]).is_err());
        assert!(
            Cli::try_parse_from([
                "billing",
                "reconcile",
                "--input",
                "a.json",
                "--tracker",
                "2024-03"
            ])
            .is_err()
        );

        let cli = Cli::try_parse_from(["billing", "reconcile", "--tracker", "2024-03"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Reconcile { tracker: Some(ref m), input: None } if m == "2024-03"
        ));
    }

    #[test]
    fn test_snapshot_flags() {
        let cli = Cli::try_parse_from([
            "billing",
            "snapshot",
            "--month",
            "2024-03",
            "--save",
            "--out",
            "tracker.json",
        ])
        .unwrap();

        assert_eq!(cli.out, Some(PathBuf::from("tracker.json")));
        assert!(matches!(
            cli.command,
            Commands::Snapshot { save: true, excedents: None, .. }
        ));
    }

    #[test]
    fn test_penalize_status_values() {
        let cli = Cli::try_parse_from([
            "billing",
            "penalize",
            "--class",
            "6f1c1a52-8d3e-4d5b-9a51-2f0c7f3f8b11",
            "--status",
            "excused",
        ])
        .unwrap();

        let Commands::Penalize { status, .. } = cli.command else {
            panic!("expected penalize");
        };
        assert_eq!(PenalizationStatus::from(status), PenalizationStatus::Excused);
    }
}
