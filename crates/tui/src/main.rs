mod player;

use std::path::PathBuf;

use anyhow::Result;
use lotlapse_core::generate::{GenerateConfig, generate};
use lotlapse_core::loader::load_history;
use lotlapse_core::model::{History, Layout};
use lotlapse_protocol::GeoPoint;
use lotlapse_protocol::constants::LOT_CENTER;

/// Demo lot: four lanes of six slots around the default center.
const DEMO_COLUMNS: usize = 4;
const DEMO_SLOTS_PER_COLUMN: usize = 6;
const COLUMN_SPACING_DEG: f64 = 0.00008;
const SLOT_SPACING_DEG: f64 = 0.00004;

fn demo_layout() -> Result<Layout> {
    let columns = (0..DEMO_COLUMNS)
        .map(|c| {
            (0..DEMO_SLOTS_PER_COLUMN)
                .map(|s| {
                    GeoPoint::new(
                        LOT_CENTER.lon + c as f64 * COLUMN_SPACING_DEG,
                        LOT_CENTER.lat - s as f64 * SLOT_SPACING_DEG,
                    )
                })
                .collect()
        })
        .collect();
    Ok(Layout::from_positions(columns)?)
}

fn build_history(path: Option<&PathBuf>, seed: u64) -> Result<History> {
    match path {
        Some(path) => {
            let data = std::fs::read(path)?;
            Ok(load_history(&data)?)
        }
        None => {
            let layout = demo_layout()?;
            Ok(generate(
                &layout,
                &GenerateConfig {
                    seed,
                    ..GenerateConfig::default()
                },
            ))
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut path: Option<PathBuf> = None;
    let mut seed: u64 = 42;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let Some(value) = iter.next().and_then(|v| v.parse().ok()) else {
                    eprintln!("--seed requires an integer value");
                    std::process::exit(1);
                };
                seed = value;
            }
            "-h" | "--help" => {
                eprintln!("Usage: lotlapse [history.json] [--seed N]");
                return Ok(());
            }
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => {
                eprintln!("Usage: lotlapse [history.json] [--seed N]");
                std::process::exit(1);
            }
        }
    }

    let history = build_history(path.as_ref(), seed)?;
    player::run(history)
}
