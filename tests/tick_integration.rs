//! Full-tick behavior: determinism, stage ordering, directive ladder

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sovgrad::city::building::{BuildingType, ConstructionPhase};
use sovgrad::command::{designate_zone, lay_pipe, place_building};
use sovgrad::core::config::SimulationConfig;
use sovgrad::core::types::GridPos;
use sovgrad::grid::cell::ZoneKind;
use sovgrad::simulation::tick::run_simulation_tick;
use sovgrad::world::CityWorld;

fn settlement(config: SimulationConfig) -> CityWorld {
    let mut world = CityWorld::new(32, 32, config);
    place_building(&mut world, GridPos::new(8, 8), BuildingType::CoalPlant);
    place_building(&mut world, GridPos::new(12, 8), BuildingType::WaterPump);
    for x in 13..20 {
        lay_pipe(&mut world, GridPos::new(x, 8));
    }
    for x in 13..20 {
        designate_zone(&mut world, GridPos::new(x, 7), ZoneKind::Residential);
        designate_zone(&mut world, GridPos::new(x, 9), ZoneKind::Agricultural);
    }
    world.ledger.population = 5;
    world.ledger.food = 30.0;
    world.ledger.vodka = 10.0;
    world
}

#[test]
fn same_seed_produces_identical_histories() {
    let run = |seed: u64| {
        let mut world = settlement(SimulationConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..500 {
            run_simulation_tick(&mut world, &mut rng);
        }
        serde_json::to_string(&world).unwrap()
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn watered_and_powered_flags_are_set_within_the_same_tick() {
    let mut world = settlement(SimulationConfig::default());
    for b in world.buildings.iter_mut() {
        b.phase = ConstructionPhase::Complete;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    run_simulation_tick(&mut world, &mut rng);

    // The pump cell is wet and the plant is powered after one tick; the
    // resolver and ledger run before anything reads the flags.
    assert!(world.grid.get(GridPos::new(12, 8)).unwrap().watered);
    assert!(world.buildings.at(GridPos::new(8, 8)).unwrap().powered);
}

#[test]
fn directive_index_is_monotone_and_gapless() {
    let mut world = settlement(SimulationConfig::default());
    for b in world.buildings.iter_mut() {
        b.phase = ConstructionPhase::Complete;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    let mut last = world.directives.index();
    for _ in 0..2_000 {
        run_simulation_tick(&mut world, &mut rng);
        let index = world.directives.index();
        assert!(index == last || index == last + 1);
        last = index;
    }
    // Pump and plant exist, so the ladder moved at least twice
    assert!(last >= 2);
}

#[test]
fn construction_only_advances_at_month_boundaries() {
    let mut config = SimulationConfig::default();
    config.ticks_per_month = 10;
    let mut world = CityWorld::new(16, 16, config);
    place_building(&mut world, GridPos::new(4, 4), BuildingType::Farm);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    for _ in 0..9 {
        run_simulation_tick(&mut world, &mut rng);
    }
    assert_eq!(world.buildings.at(GridPos::new(4, 4)).unwrap().ticks_done, 0);

    run_simulation_tick(&mut world, &mut rng);
    assert_eq!(world.buildings.at(GridPos::new(4, 4)).unwrap().ticks_done, 1);
}

#[test]
fn money_is_never_debited_by_the_core() {
    let mut world = settlement(SimulationConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let mut lowest = world.ledger.money;
    for _ in 0..1_000 {
        run_simulation_tick(&mut world, &mut rng);
        assert!(world.ledger.money >= lowest);
        lowest = world.ledger.money;
    }
}

#[test]
fn population_stays_at_or_above_zero_through_famine() {
    let mut world = settlement(SimulationConfig::default());
    world.ledger.food = 0.0;
    world.ledger.vodka = 0.0;
    world.ledger.population = 3;
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for _ in 0..2_000 {
        run_simulation_tick(&mut world, &mut rng);
    }
    // u32 would have wrapped loudly; the clamp held
    assert!(world.ledger.population <= 3);
}
