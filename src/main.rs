use anyhow::Context;
use clap::Parser;
use flappy_neuro::build_info::VERSION_LINE;
use flappy_neuro::config::Settings;
use flappy_neuro::core::constants::{DEFAULT_OUTPUT_DIR, LOG_FILE_NAME};
use flappy_neuro::core::{Headless, Presenter, Session};
use flappy_neuro::trainer::{write_report, Population};
use flappy_neuro::ui::TerminalPresenter;
use std::fs::{self, File};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version = VERSION_LINE, about = "Flappy Bird flown by evolved neural networks", long_about = None)]
struct Cli {
    /// Settings file (JSON); defaults to settings.json in the config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without drawing or frame pacing
    #[arg(long)]
    headless: bool,

    /// Number of generations to train (overrides max_generations)
    #[arg(long)]
    generations: Option<u32>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for the log file and training reports
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Skip writing the training report
    #[arg(long)]
    no_report: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating output directory {}", cli.output.display()))?;
    init_logging(&cli)?;
    log::info!("flappy-neuro {}", VERSION_LINE);

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(generations) = cli.generations {
        settings.max_generations = generations;
    }
    if let Some(seed) = cli.seed {
        settings.trainer.seed = Some(seed);
    }
    settings.validate().context("validating settings")?;

    // Pipes and weights draw from separate streams of the same seed
    let pipe_seed = settings.trainer.seed.map(|seed| seed.wrapping_add(1));
    let mut session = Session::new(settings.clone(), pipe_seed);
    let mut population = Population::from_config(settings.trainer.clone());

    let mut presenter: Box<dyn Presenter> = if cli.headless {
        Box::new(Headless)
    } else {
        Box::new(TerminalPresenter::new().context("setting up the terminal")?)
    };

    let result = population.run(
        |genomes, _generation| session.run_generation(genomes, presenter.as_mut()),
        settings.max_generations,
    );
    // Restore the terminal before printing anything
    drop(presenter);
    let winner = result.context("training failed")?;

    let stats = population.reporter();
    if !cli.no_report {
        let written = write_report(&cli.output, stats, winner.as_ref(), &settings)
            .context("writing training report")?;
        for path in written {
            println!("Wrote {}", path.display());
        }
    }

    println!("Generations run: {}", stats.generations().len());
    match winner {
        Some(genome) => {
            println!("\nBest genome:");
            println!("  Key: {}", genome.id);
            if let Some(fitness) = genome.fitness {
                println!("  Fitness: {:.4}", fitness);
            }
            println!("  Weights: {:?}", genome.weights);
        }
        None => println!("No genome was evaluated."),
    }
    Ok(())
}

/// Log to stderr in headless mode and to a file in terminal mode, so log
/// lines do not tear through the drawn screen.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if !cli.headless {
        let path = cli.output.join(LOG_FILE_NAME);
        let file =
            File::create(&path).with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
