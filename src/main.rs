use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use topaz_eval::cli::{Cli, Commands, EvaluateArgs, ValidateArgs};
use topaz_eval::ctx::{Ctx, EvalConfig};
use topaz_eval::inference::ScoreTableProvider;
use topaz_eval::input::InputPaths;
use topaz_eval::io;
use topaz_eval::pipeline::Pipeline;
use topaz_eval::pipeline::stage0_scaffold::Stage0Scaffold;
use topaz_eval::pipeline::stage1_input::Stage1Input;
use topaz_eval::pipeline::stage2_labels::Stage2Labels;
use topaz_eval::pipeline::stage3_evaluate::Stage3Evaluate;
use topaz_eval::pipeline::stage4_output::Stage4Output;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate(args) => run_evaluate(args)?,
        Commands::Validate(args) => run_validate(args)?,
    }

    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let inputs = InputPaths::builder()
        .test_dir(&args.test_dir)
        .labels(&args.labels)
        .scores(&args.scores)
        .build()?;
    let provider = ScoreTableProvider::load(&args.scores)?;
    tracing::info!(
        scores = %args.scores.display(),
        entries = provider.len(),
        "score table loaded"
    );

    let config = EvalConfig {
        slices_per_structure: args.slices_per_structure,
        image_dim: args.image_dim,
        threads: args.threads,
    };
    let mut ctx = Ctx::new(inputs, args.out, config, args.json, !args.no_tsv);

    let pipeline = Pipeline::new(vec![
        Box::new(Stage0Scaffold::new()),
        Box::new(Stage1Input::new()),
        Box::new(Stage2Labels::new()),
        Box::new(Stage3Evaluate::new(Box::new(provider))),
        Box::new(Stage4Output::new()),
    ]);
    pipeline.run(&mut ctx)?;

    print_summary(&ctx)
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let inputs = InputPaths::builder()
        .test_dir(&args.test_dir)
        .labels(&args.labels)
        .build()?;
    let config = EvalConfig {
        slices_per_structure: args.slices_per_structure,
        ..EvalConfig::default()
    };
    let mut ctx = Ctx::new(inputs, std::path::PathBuf::from("."), config, false, false);

    let pipeline = Pipeline::new(vec![
        Box::new(Stage1Input::new()),
        Box::new(Stage2Labels::new()),
    ]);
    pipeline.run(&mut ctx)?;

    print_validate_summary(&ctx);
    Ok(())
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    print_warnings(ctx);
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) {
    let positives = ctx.slice_labels.iter().filter(|&&l| l == 1).count();
    println!("topaz-eval validate ok");
    println!("slices: {}", ctx.slices.len());
    println!("structures: {}", ctx.structures.len());
    println!("slices per structure: {}", ctx.config.slices_per_structure);
    println!(
        "labelled slices: {} good, {} bad",
        positives,
        ctx.slice_labels.len() - positives
    );
    print_warnings(ctx);
}

fn print_warnings(ctx: &Ctx) {
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
