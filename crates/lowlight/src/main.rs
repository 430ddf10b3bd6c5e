use std::path::PathBuf;

use clap::Parser;
use lowlight::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World and simulation seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Census interval in ticks (0 disables)
    #[arg(long)]
    report_every: Option<u64>,

    /// RON config file (default: lowlight.ron if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not print the map
    #[arg(long)]
    no_map: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;

    // Flags beat every other source
    if let Some(seed) = args.seed {
        config.life.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.run.ticks = ticks;
    }
    if let Some(every) = args.report_every {
        config.run.report_every = every;
    }
    if args.no_map {
        config.run.map = false;
    }

    if args.dump_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let life = lowlight::run(&config)?;
    log::info!("Finished after {} ticks", life.tick());
    Ok(())
}
