//! Training report files.

use super::stats::StatisticsReporter;
use crate::config::Settings;
use crate::core::constants::{BEST_GENOME_NAME, BEST_NETWORK_NAME, FITNESS_CSV_NAME, SUMMARY_NAME};
use crate::error::Result;
use crate::neural::Genome;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the fitness table, and the winner's genome and network graph when
/// there is one, into `dir`. Returns the paths written.
pub fn write_report(
    dir: &Path,
    stats: &StatisticsReporter,
    winner: Option<&Genome>,
    settings: &Settings,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let csv_path = dir.join(FITNESS_CSV_NAME);
    fs::write(&csv_path, fitness_csv(stats))?;
    written.push(csv_path);

    if let Some(winner) = winner {
        let genome_path = dir.join(BEST_GENOME_NAME);
        fs::write(&genome_path, serde_json::to_string_pretty(winner)?)?;
        written.push(genome_path);

        let dot_path = dir.join(BEST_NETWORK_NAME);
        fs::write(&dot_path, winner.network().to_dot())?;
        written.push(dot_path);
    }

    let summary_path = dir.join(SUMMARY_NAME);
    fs::write(&summary_path, summary(stats, winner, settings))?;
    written.push(summary_path);

    log::info!("Report written to {}", dir.display());
    Ok(written)
}

/// One row per generation: best, mean and stdev of fitness plus the score.
pub fn fitness_csv(stats: &StatisticsReporter) -> String {
    let mut csv = String::from("generation,best,mean,stdev,score,frames,reason\n");
    for s in stats.generations() {
        csv.push_str(&format!(
            "{},{:.4},{:.4},{:.4},{},{},{}\n",
            s.generation, s.best_fitness, s.mean_fitness, s.stdev_fitness, s.score, s.frames, s.reason
        ));
    }
    csv
}

fn summary(stats: &StatisticsReporter, winner: Option<&Genome>, settings: &Settings) -> String {
    let mut out = String::new();

    out.push_str("flappy-neuro training report\n");
    out.push_str(&format!(
        "Generated: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("Version:   {}\n\n", crate::build_info::VERSION_LINE));

    out.push_str(&format!("Generations run:  {}\n", stats.generations().len()));
    out.push_str(&format!(
        "Population size:  {}\n",
        settings.trainer.population_size
    ));
    out.push_str(&format!("Hidden nodes:     {}\n", settings.trainer.hidden_nodes));
    out.push_str(&format!("Max score:        {}\n", settings.max_score));
    if let Some(top) = stats.generations().iter().max_by_key(|s| s.score) {
        out.push_str(&format!(
            "Best score:       {} (generation {})\n",
            top.score, top.generation
        ));
    }
    out.push('\n');

    match winner {
        Some(genome) => {
            out.push_str("Best genome:\n");
            out.push_str(&format!("  Key: {}\n", genome.id));
            if let Some(fitness) = genome.fitness {
                out.push_str(&format!("  Fitness: {fitness:.4}\n"));
            }
            out.push_str(&format!("  Hidden nodes: {}\n", genome.hidden));
            let weights: Vec<String> = genome.weights.iter().map(|w| format!("{w:.4}")).collect();
            out.push_str(&format!("  Weights: [{}]\n", weights.join(", ")));
        }
        None => out.push_str("No genome was evaluated.\n"),
    }
    out
}
