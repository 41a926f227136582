//! Sovgrad - Entry Point
//!
//! Headless runner: seeds a small settlement, advances the simulation a
//! fixed number of ticks and prints a summary. Useful for tuning config
//! values and for watching the event stream with RUST_LOG=sovgrad=debug.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sovgrad::city::building::BuildingType;
use sovgrad::command::{designate_zone, lay_pipe, place_building};
use sovgrad::core::config::SimulationConfig;
use sovgrad::core::error::Result;
use sovgrad::core::types::GridPos;
use sovgrad::grid::cell::ZoneKind;
use sovgrad::simulation::tick::{run_simulation_tick, SimulationEvent};
use sovgrad::world::CityWorld;

#[derive(Parser, Debug)]
#[command(name = "sovgrad", about = "Planned-economy city simulation core")]
struct Args {
    /// RNG seed; the same seed always produces the same city
    #[arg(long, default_value_t = 1917)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 1200)]
    ticks: u64,

    /// Grid width in cells
    #[arg(long, default_value_t = 48)]
    width: i32,

    /// Grid height in cells
    #[arg(long, default_value_t = 48)]
    height: i32,

    /// Optional TOML config overriding the tuned defaults
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sovgrad=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let config = SimulationConfig::from_toml_str(&text)?;
            config.validate()?;
            config
        }
        None => SimulationConfig::default(),
    };

    tracing::info!(seed = args.seed, ticks = args.ticks, "sovgrad starting");

    let mut world = CityWorld::new(args.width, args.height, config);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    seed_settlement(&mut world);

    for _ in 0..args.ticks {
        for event in run_simulation_tick(&mut world, &mut rng) {
            match event {
                SimulationEvent::Toast { text } => println!("[toast] {}", text),
                SimulationEvent::Advisor { text, source } => {
                    println!("[{}] {}", source.as_deref().unwrap_or("advisor"), text)
                }
                SimulationEvent::FloatingText { text, pos, .. } => {
                    tracing::debug!(?pos, "{}", text)
                }
            }
        }
    }

    print_summary(&world);
    Ok(())
}

/// A starter settlement: power, water, pipes and zoned land
fn seed_settlement(world: &mut CityWorld) {
    place_building(world, GridPos::new(10, 10), BuildingType::CoalPlant);
    place_building(world, GridPos::new(14, 10), BuildingType::WaterPump);
    for x in 15..26 {
        lay_pipe(world, GridPos::new(x, 10));
    }
    for x in 16..24 {
        for y in 8..10 {
            designate_zone(world, GridPos::new(x, y), ZoneKind::Residential);
        }
        designate_zone(world, GridPos::new(x, 12), ZoneKind::Agricultural);
        designate_zone(world, GridPos::new(x, 13), ZoneKind::Industrial);
    }
    place_building(world, GridPos::new(12, 12), BuildingType::MilitiaPost);
    world.ledger.population = 5;
    world.ledger.food = 20.0;
    world.ledger.vodka = 5.0;
}

fn print_summary(world: &CityWorld) {
    let ledger = world.ledger();
    println!();
    println!("=== SOVGRAD: year {} ===", world.calendar.current_year());
    println!("population: {}", ledger.population);
    println!("money:      {} rubles", ledger.money);
    println!("food:       {:.1}", ledger.food);
    println!("vodka:      {:.1}", ledger.vodka);
    println!(
        "power:      {:.1} / {:.1}",
        ledger.power_demanded, ledger.power_generated
    );
    println!("buildings:  {}", world.buildings().count());
    println!("directive:  #{}", world.directives().index());
    if world.rocket_launched {
        println!("the rocket has flown");
    }
}
