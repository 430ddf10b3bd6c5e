//! Headless runner for the Lowlight automaton
//!
//! Generates a world from the configured seed, populates it, steps it for a
//! number of ticks and reports the population along the way.

pub mod config;
pub mod console;

use anyhow::{Context, Result};
use lowlight_core::Life;

pub use config::{AppConfig, RunConfig};
pub use console::{AsciiMap, census_line};

/// Run a whole session and hand back the final state
pub fn run(config: &AppConfig) -> Result<Life> {
    let mut life = Life::new(config.life.clone()).context("Failed to create the world")?;
    let placed = life.populate();
    log::info!(
        "Seed {}: {}x{} world, {} entities",
        config.life.seed,
        life.world().width(),
        life.world().height(),
        placed
    );

    let mut map = AsciiMap::new(life.world());
    if config.run.map {
        print_map(&life, &mut map);
    }
    log::info!("Tick 0: {}", census_line(&life.census()));

    for _ in 0..config.run.ticks {
        life.step();
        let tick = life.tick();
        if config.run.report_every > 0 && tick % config.run.report_every == 0 {
            log::info!("Tick {}: {}", tick, census_line(&life.census()));
        }
    }

    if config.run.map && config.run.ticks > 0 {
        print_map(&life, &mut map);
    }
    Ok(life)
}

fn print_map(life: &Life, map: &mut AsciiMap) {
    life.render(map);
    if let Some((tick, text)) = map.take_frame() {
        println!("-- tick {tick} --\n{text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_steps_the_configured_ticks() {
        let mut config = AppConfig::default();
        config.life.world.width = 16;
        config.life.world.height = 16;
        config.run = RunConfig {
            ticks: 12,
            report_every: 5,
            map: false,
        };
        let life = run(&config).unwrap();
        assert_eq!(life.tick(), 12);
        assert_eq!(life.config().seed, 0);
    }
}
