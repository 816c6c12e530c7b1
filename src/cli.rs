use crate::config::RegulatoryStandard;
use crate::core::ComplianceStatus;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "foodoiliq")]
#[command(about = "Frying-oil quality scoring, compliance and reporting", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Output format
    #[arg(long, value_enum, default_value = "terminal", global = true)]
    pub format: OutputFormat,

    /// Plain ASCII output without colors
    #[arg(long, global = true)]
    pub plain: bool,

    /// Hide progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (skips discovery)
    #[arg(long, global = true, env = "FOODOILIQ_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify one reading against its limit
    Classify {
        /// Measured value
        value: f64,

        /// Regulatory limit for the parameter
        #[arg(short, long)]
        limit: f64,
    },

    /// Score a set of FFA, TPC and PV readings
    Assess {
        /// Free fatty acid (%)
        #[arg(long)]
        ffa: f64,

        /// Total polar compounds (%)
        #[arg(long)]
        tpc: f64,

        /// Peroxide value (meq/kg)
        #[arg(long)]
        pv: f64,

        /// Model confidence to attach to the result (0-100)
        #[arg(long, default_value = "100")]
        confidence: f64,

        /// Regulatory standard; overrides the configured limits
        #[arg(short, long, value_enum)]
        standard: Option<Standard>,
    },

    /// Compose a PDF compliance report from a JSON snapshot
    Report {
        /// Report data (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory or file (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a simulated oil test for a batch
    Test {
        /// Batch to test
        #[arg(short, long)]
        batch: String,

        /// Seed for reproducible sensor and prediction values
        #[arg(long)]
        seed: Option<u64>,

        /// Also write a PDF report into this directory
        #[arg(long = "report-dir")]
        report_dir: Option<PathBuf>,

        /// Treat the inference service as unreachable and use the local fallback
        #[arg(long = "offline-api")]
        offline_api: bool,
    },

    /// List batches with their latest results
    Batches {
        /// Only batches at this station
        #[arg(long)]
        station: Option<String>,

        /// Only batches with this status
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// List supported regulatory standards and their limits
    Standards,

    /// Initialize a .foodoiliq.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Standard {
    Fssai,
    Eu,
    China,
    Codex,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Status {
    Pass,
    Borderline,
    Reject,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

impl From<Standard> for RegulatoryStandard {
    fn from(s: Standard) -> Self {
        match s {
            Standard::Fssai => RegulatoryStandard::Fssai,
            Standard::Eu => RegulatoryStandard::Eu,
            Standard::China => RegulatoryStandard::China,
            Standard::Codex => RegulatoryStandard::Codex,
        }
    }
}

impl From<Status> for ComplianceStatus {
    fn from(s: Status) -> Self {
        match s {
            Status::Pass => ComplianceStatus::Pass,
            Status::Borderline => ComplianceStatus::Borderline,
            Status::Reject => ComplianceStatus::Reject,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_assess_command() {
        let cli = Cli::parse_from([
            "foodoiliq", "assess", "--ffa", "0.18", "--tpc", "18.5", "--pv", "8.2", "--standard",
            "china", "--format", "json",
        ]);

        assert_eq!(cli.global.format, OutputFormat::Json);
        match cli.command {
            Commands::Assess {
                ffa,
                tpc,
                pv,
                confidence,
                standard,
            } => {
                assert_eq!((ffa, tpc, pv), (0.18, 18.5, 8.2));
                assert_eq!(confidence, 100.0);
                assert_eq!(standard, Some(Standard::China));
            }
            _ => panic!("Expected Assess command"),
        }
    }

    #[test]
    fn test_cli_parsing_init_command() {
        let cli = Cli::parse_from(["foodoiliq", "init", "--force"]);

        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "foodoiliq",
            "test",
            "--batch",
            "BATCH-2024-0115-A",
            "--seed",
            "7",
            "-vv",
            "--plain",
            "--config",
            "/etc/foodoiliq.toml",
        ]);

        assert_eq!(cli.global.verbosity, 2);
        assert!(cli.global.plain);
        assert_eq!(cli.global.config, Some(PathBuf::from("/etc/foodoiliq.toml")));
        match cli.command {
            Commands::Test {
                batch,
                seed,
                offline_api,
                ..
            } => {
                assert_eq!(batch, "BATCH-2024-0115-A");
                assert_eq!(seed, Some(7));
                assert!(!offline_api);
            }
            _ => panic!("Expected Test command"),
        }
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(
            ComplianceStatus::from(Status::Borderline),
            ComplianceStatus::Borderline
        );
        assert_eq!(
            RegulatoryStandard::from(Standard::Codex),
            RegulatoryStandard::Codex
        );
    }

    #[test]
    fn test_rejects_unknown_standard() {
        let result = Cli::try_parse_from([
            "foodoiliq", "assess", "--ffa", "0.1", "--tpc", "10", "--pv", "3", "--standard",
            "mars",
        ]);
        assert!(result.is_err());
    }
}
