//! Headless runner: loads every bundled scene, ticks it, prints each
//! consumer's state, and verifies determinism with a second run.
//!
//! Run with: `cargo run --package gridlink-data --example headless_runner`
//! Set `RUST_LOG=gridlink_power=debug` for per-consumer network detail.

use std::path::{Path, PathBuf};

use env_logger::Builder;
use gridlink_core::device::DeviceKind;
use gridlink_data::{Scene, load_scene};
use gridlink_power::{PowerGrid, TickReport};
use log::LevelFilter;

const TICKS: u64 = 10;

fn run(path: &Path) -> (Scene, TickReport) {
    let mut scene = load_scene(path).unwrap_or_else(|e| panic!("failed to load {}: {e}", path.display()));
    let mut grid = PowerGrid::new();
    let mut last = grid.tick(&mut scene.registry);
    for _ in 1..TICKS {
        last = grid.tick(&mut scene.registry);
    }
    (scene, last)
}

fn main() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let scenes_dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/scenes"));
    let mut paths: Vec<PathBuf> = std::fs::read_dir(scenes_dir)
        .expect("failed to read scenes directory")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| gridlink_data::detect_format(p).is_ok())
        .collect();
    paths.sort();

    for path in &paths {
        println!("--- {} ---", path.display());

        // Run 1
        let (scene, report) = run(path);
        let consumers = scene.registry.of_kind(DeviceKind::Consumer).count();
        let hash1 = report.state_hash();

        println!(
            "    After {TICKS} ticks: {} devices, {consumers} consumers, {} powered, state hash = {hash1:#018x}",
            scene.registry.len(),
            report.powered_count(),
        );

        let labels = scene.labels();
        for balance in &report.balances {
            let name = labels
                .iter()
                .find(|(_, id)| *id == balance.consumer)
                .map_or("-", |(label, _)| *label);
            println!(
                "      [{name:>10}] powered={}, network={}, produced={}, consumed={}, net={}",
                balance.powered,
                balance.members.len(),
                balance.produced,
                balance.consumed,
                balance.net_power
            );
        }

        // Run 2: determinism check
        let (_, rerun) = run(path);
        let hash2 = rerun.state_hash();
        if hash1 == hash2 {
            println!("    Determinism: PASS (hashes match)");
        } else {
            println!("    Determinism: FAIL! hash1={hash1:#018x} != hash2={hash2:#018x}");
            std::process::exit(1);
        }

        println!();
    }

    println!("All {} scenes passed.", paths.len());
}
