//! Life - the simulation context and its tick driver
//!
//! One `Life` owns the world, the registry, the random streams and the gene
//! pool. Everything else receives what it needs from here by reference.

use std::collections::BTreeMap;

use glam::Vec2;
use lowlight_biome::{Biome, BiomeCatalog, Layer};
use lowlight_creature::{EntityId, Species, TreeSpecies};

use crate::config::{GenePool, LifeConfig};
use crate::entity::creature::MATURITY_CYCLES;
use crate::entity::{Context, EntityType, Manager, Spawn, TreeStage};
use crate::error::LifeError;
use crate::render::{EntityView, Renderer};
use crate::rng::LifeRng;
use crate::world::{Cell, GenerationReport, World};

pub struct Life {
    config: LifeConfig,
    genes: GenePool,
    world: World,
    manager: Manager,
    rng: LifeRng,
    tick: u64,
    report: Option<GenerationReport>,
}

impl Life {
    /// Generate a world from the configured seed
    pub fn new(config: LifeConfig) -> Result<Self, LifeError> {
        let (world, report) = World::generate(BiomeCatalog::new(), &config.world, config.seed)?;
        let mut life = Self::with_world(config, world)?;
        life.report = Some(report);
        Ok(life)
    }

    /// Run on an existing world
    pub fn with_world(config: LifeConfig, world: World) -> Result<Self, LifeError> {
        let genes = GenePool::new(&config.species)?;
        Ok(Self {
            rng: LifeRng::new(config.seed),
            manager: Manager::new(world.size()),
            genes,
            world,
            config,
            tick: 0,
            report: None,
        })
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    pub fn genes(&self) -> &GenePool {
        &self.genes
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut Manager {
        &mut self.manager
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn generation_report(&self) -> Option<&GenerationReport> {
        self.report.as_ref()
    }

    /// Create an entity at the current tick
    pub fn spawn(&mut self, position: Vec2, spawn: Spawn) -> Option<EntityId> {
        self.manager.create(position, spawn, &mut self.rng, self.tick)
    }

    /// Advance every entity by one tick
    ///
    /// All entities prepare against the same snapshot, then commit in id
    /// order. The spatial index is rebuilt once at the end.
    pub fn step(&mut self) {
        self.tick += 1;
        let tick = self.tick;

        let ctx = Context {
            world: &self.world,
            manager: &self.manager,
            tick,
        };
        let mut staged = Vec::with_capacity(self.manager.len());
        for entity in self.manager.iter() {
            staged.push((entity.id(), entity.prepare(&ctx, &mut self.rng)));
        }

        for (id, record) in staged {
            self.manager.commit(id, record, &self.world, &mut self.rng, tick);
        }
        self.manager.rebuild_index();
    }

    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Live entities per type tag, zero counts included
    pub fn census(&self) -> BTreeMap<EntityType, usize> {
        let mut counts: BTreeMap<EntityType, usize> =
            EntityType::ALL.iter().map(|t| (*t, 0)).collect();
        for entity in self.manager.iter() {
            *counts.entry(entity.entity_type()).or_default() += 1;
        }
        counts
    }

    /// Push the current state to a renderer
    pub fn render(&self, renderer: &mut dyn Renderer) {
        for cy in 0..self.world.height() as i32 {
            for cx in 0..self.world.width() as i32 {
                if let Some(biome) = self.world.biome(Cell::new(cx, cy)) {
                    renderer.tile(cx, cy, biome);
                }
            }
        }
        for entity in self.manager.iter() {
            renderer.entity(&EntityView::of(entity));
            if let Some(creature) = entity.creature() {
                renderer.sight(entity.id(), &creature.sight(entity.position()));
            }
        }
        renderer.frame(self.tick);
    }

    /// Seed the configured population on random suitable cells
    ///
    /// Returns the number of entities placed. Shortfalls are logged.
    pub fn populate(&mut self) -> usize {
        let population = self.config.population.clone();
        let mut placed = 0;

        for (species, count) in [
            (TreeSpecies::Oran, population.oran_trees),
            (TreeSpecies::Sitrus, population.sitrus_trees),
        ] {
            let genes = self.genes.tree(species).clone();
            let mut template = Spawn::tree(&self.genes, species);
            if population.grown_trees {
                template = template.grown(TreeStage::Berry);
            }
            placed += self.scatter(
                species.name(),
                count,
                |_| template.clone(),
                |b| genes.adaptability(b.name) > 0.0,
            );
        }

        for (species, count) in [
            (Species::Evoli, population.evoli),
            (Species::Magicarpe, population.magicarpe),
        ] {
            let genes = self.genes.creature(species).clone();
            let layer = species.layer();
            let template = Spawn::creature(&self.genes, species);
            placed += self.scatter(
                species.name(),
                count,
                |rng| template.clone().with_cycle(rng.random(0.0, 2.0 * MATURITY_CYCLES)),
                |b| layer.admits(b) && genes.adaptability(b.name) > 0.0,
            );
        }

        placed += self.scatter(
            "pokeblock",
            population.pokeblocks,
            |_| Spawn::Pokeblock,
            |b| Layer::Sea.admits(b),
        );

        log::info!("Populated {} entities", placed);
        placed
    }

    /// Place `count` entities built by `make` on cells accepted by `suitable`
    fn scatter(
        &mut self,
        label: &str,
        count: u32,
        make: impl Fn(&mut LifeRng) -> Spawn,
        suitable: impl Fn(&Biome) -> bool,
    ) -> usize {
        let attempts = self.config.population.placement_attempts;
        let (width, height) = (self.world.width() as i64, self.world.height() as i64);
        let half = self.world.cell_size() / 2.0;
        let mut placed = 0;

        for _ in 0..count {
            for _ in 0..attempts {
                let cell = Cell::new(
                    self.rng.random_int(0, width) as i32,
                    self.rng.random_int(0, height) as i32,
                );
                if !self.world.biome(cell).is_some_and(&suitable) {
                    continue;
                }
                let jitter = Vec2::new(self.rng.random(-half, half), self.rng.random(-half, half));
                let position = self.world.cell_center(cell) + jitter * 0.9;
                let spawn = make(&mut self.rng);
                if self.manager.create(position, spawn, &mut self.rng, self.tick).is_some() {
                    placed += 1;
                    break;
                }
            }
        }

        if placed < count as usize {
            log::warn!("Placed only {}/{} {}", placed, count, label);
        }
        placed
    }
}
