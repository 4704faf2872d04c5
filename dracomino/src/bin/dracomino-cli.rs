use anyhow::{Context, Result, bail};
use clap::Parser;
use dracomino::randomize::Randomizer;
use dracomino::settings::{DracominoSettings, get_preset};
use dracomino_game::{BOARD_WIDTH, GameData};
use log::info;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
struct Args {
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    preset: Option<String>,

    #[arg(long)]
    presets_path: Option<PathBuf>,

    #[arg(long)]
    random_seed: Option<u64>,

    #[arg(long)]
    output_slot_data: Option<PathBuf>,

    #[arg(long)]
    output_spoiler_log: Option<PathBuf>,
}

fn get_settings(args: &Args) -> Result<DracominoSettings> {
    match (&args.settings, &args.preset) {
        (Some(_), Some(_)) => bail!("Only one of --settings and --preset may be given"),
        (Some(path), None) => DracominoSettings::load(path),
        (None, Some(name)) => get_preset(name, args.presets_path.as_deref()),
        (None, None) => Ok(DracominoSettings::default()),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    std::fs::write(path, output)
        .with_context(|| format!("Unable to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let settings = get_settings(&args)?;
    let game_data = GameData::load()?;

    let seed = match args.random_seed {
        Some(s) => s,
        None => rand::rngs::StdRng::from_entropy().next_u64() & 0xFFFFFFFF,
    };
    info!("Random seed: {seed}");

    let randomizer = Randomizer::new(&settings, &game_data)?;
    let randomization = randomizer.randomize(seed)?;

    if let Some(path) = &args.output_slot_data {
        write_json(path, &randomization.slot_data)?;
    }
    if let Some(path) = &args.output_spoiler_log {
        write_json(path, &randomization.spoiler_log)?;
    }

    let summary = &randomization.spoiler_log.summary;
    println!(
        "Seed {seed}: {} line clears, {} item pickups, {} items in pool, {} in start inventory",
        summary.num_line_clears,
        summary.num_item_pickups,
        randomization.item_pool.len(),
        randomization.start_inventory.len()
    );
    println!(
        "Shape value: {} in pool + {} at start (target {}, {} columns per line)",
        summary.pool_shape_value, summary.start_shape_value, summary.target_shape_value, BOARD_WIDTH
    );
    println!("Completion: {}", randomization.completion_requirement);
    Ok(())
}
