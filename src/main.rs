use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use kira_tissueviz::cli::{Cli, Commands, RunArgs};
use kira_tissueviz::input::{Cohort, load_snapshot};
use kira_tissueviz::logging;
use kira_tissueviz::pipeline::stage8_output::{OutputContext, write_outputs};

fn main() -> Result<()> {
    logging::init("info");

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.input, args.ratio_convention.into())
        .with_context(|| format!("failed to load snapshot {}", args.input.display()))?;
    let case = snapshot.find_case(&args.case)?;
    let cohort = Cohort::for_case(case);
    info!(
        case = %case.identifier,
        samples = case.samples.len(),
        cohort = cohort.len(),
        "case loaded"
    );

    let target = args.sample.as_deref().map(|id| cohort.target(id));

    let ctx = OutputContext {
        ratio_convention: args.ratio_convention.name().to_string(),
        ..OutputContext::default()
    };
    write_outputs(&cohort, target.as_ref(), &ctx, &args.out)
        .with_context(|| format!("failed to write outputs to {}", args.out.display()))?;
    Ok(())
}
