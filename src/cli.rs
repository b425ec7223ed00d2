use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::input::RatioConvention;

#[derive(Debug, Parser)]
#[command(
    name = "kira-tissueviz",
    version,
    about = "Tissue staining risk and cohort charts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "Case snapshot JSON ({\"cases\": [...]})")]
    pub input: PathBuf,

    #[arg(long, help = "Case id or human identifier")]
    pub case: String,

    #[arg(long, help = "Sample to display; demo data is shown when absent")]
    pub sample: Option<String>,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = RatioConventionArg::Fraction)]
    pub ratio_convention: RatioConventionArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RatioConventionArg {
    Fraction,
    Percent,
}

impl RatioConventionArg {
    pub fn name(self) -> &'static str {
        match self {
            RatioConventionArg::Fraction => "fraction",
            RatioConventionArg::Percent => "percent",
        }
    }
}

impl From<RatioConventionArg> for RatioConvention {
    fn from(arg: RatioConventionArg) -> Self {
        match arg {
            RatioConventionArg::Fraction => RatioConvention::Fraction,
            RatioConventionArg::Percent => RatioConvention::Percent,
        }
    }
}
