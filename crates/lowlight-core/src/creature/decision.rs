//! Priority state machine: reproduce, eat, move, wander

use std::f32::consts::TAU;

use glam::Vec2;
use lowlight_creature::{ActionKind, Gender};
use smallvec::SmallVec;

use crate::creature::perception::{Perception, Seen};
use crate::entity::creature::{ACTION_TICKS, WANDER_AFTER};
use crate::entity::{Consequence, Context, CreatureState, Entity, EntityKind, Staged, Target};
use crate::rng::LifeRng;

/// Rerolls tried while looking for an adapted heading
const WANDER_REROLLS: usize = 10;

/// Stage a creature's next tick
pub fn prepare(entity: &Entity, state: &CreatureState, ctx: &Context, rng: &mut LifeRng) -> Staged {
    let mut next = state.clone();
    state.metabolism(&mut next, entity.age(ctx.tick), rng);

    // Targets pointing at a vanished entity are useless, markers included
    if next.target_entity().is_some_and(|id| !ctx.manager.contains(id)) {
        next.targets.clear();
    }

    next.timer.tick_action();
    if next.timer.is_busy() {
        return Staged::new(entity.position(), EntityKind::Creature(next));
    }

    let perception = Perception::new(entity, state, *ctx);
    let visible = perception.visible(None);
    let done = next.timer.is_done();
    let mut brain = Brain {
        ctx: *ctx,
        rng,
        state,
        perception,
        visible,
        done,
        next,
        position: entity.position(),
        consequences: SmallVec::new(),
    };

    let action = brain.decide();
    let Brain {
        mut next,
        position,
        consequences,
        ..
    } = brain;
    match action {
        Some(action) => {
            next.action = action;
            next.idle = 0;
        }
        None => {
            next.action = ActionKind::Idle;
            next.idle = state.idle + 1;
        }
    }
    next.timer.take_done();

    Staged {
        position,
        kind: EntityKind::Creature(next),
        consequences,
    }
}

struct Brain<'a, 'r> {
    ctx: Context<'a>,
    rng: &'r mut LifeRng,
    /// Current state, as everyone else sees it this tick
    state: &'a CreatureState,
    perception: Perception<'a>,
    visible: Vec<Seen<'a>>,
    /// The busy timer completed on this tick
    done: bool,
    next: CreatureState,
    position: Vec2,
    consequences: SmallVec<[Consequence; 2]>,
}

impl<'a> Brain<'a, '_> {
    fn decide(&mut self) -> Option<ActionKind> {
        if self.reproduce() {
            Some(ActionKind::Reproduce)
        } else if self.eat() {
            Some(ActionKind::Eat)
        } else if self.pursue() {
            Some(ActionKind::Move)
        } else if self.wander() {
            Some(ActionKind::Wander)
        } else {
            None
        }
    }

    fn reproduce(&mut self) -> bool {
        if !self.state.fertile() {
            return false;
        }
        let partners: Vec<Seen<'a>> = self
            .visible
            .iter()
            .filter(|s| self.state.compatible(s.entity))
            .copied()
            .collect();
        let Some(nearest) = partners.first() else {
            return false;
        };

        let pursuing = self.state.action == ActionKind::Reproduce
            && self
                .next
                .target_entity()
                .is_some_and(|id| partners.iter().any(|p| p.entity.id() == id));
        if !pursuing {
            self.path_to(nearest.entity);
        }

        if self.engage(ActionKind::Reproduce).is_some() {
            if self.state.gender == Gender::Female {
                self.consequences.push(Consequence::LayEgg {
                    species: self.state.species,
                    genes: self.state.genes.clone(),
                });
            }
            self.next.fertility = 0.0;
        }
        true
    }

    fn eat(&mut self) -> bool {
        if self.state.hunger.deficit() <= 0.0 {
            return false;
        }
        let foods: Vec<Seen<'a>> = self
            .visible
            .iter()
            .filter(|s| self.state.edible(s.entity))
            .copied()
            .collect();
        let Some(nearest) = foods.first() else {
            return false;
        };

        let current = self
            .next
            .target_entity()
            .and_then(|id| foods.iter().find(|f| f.entity.id() == id));
        let repath = match current {
            Some(current) => {
                self.state.action != ActionKind::Eat || current.distance > nearest.distance
            }
            None => true,
        };
        if repath {
            self.path_to(nearest.entity);
        }

        if let Some(food) = self.engage(ActionKind::Eat) {
            self.consequences.push(Consequence::Eat { food: food.id() });
        }
        true
    }

    /// Keep walking towards a target nobody claimed this tick
    fn pursue(&mut self) -> bool {
        if self.next.targets.is_empty() {
            return false;
        }
        let in_range = self
            .next
            .target_entity()
            .and_then(|id| self.ctx.manager.get(id))
            .is_some_and(|target| self.perception.contains(target.position(), true));
        if in_range {
            self.next.targets.clear();
            return false;
        }
        self.advance()
    }

    fn wander(&mut self) -> bool {
        if self.state.idle < WANDER_AFTER && self.state.action != ActionKind::Wander {
            return false;
        }

        let sign = if self.rng.random(0.0, 1.0) < 0.5 { -1.0 } else { 1.0 };
        let mut facing = self.state.facing + sign * self.rng.random(0.0, 0.01);
        if self.rng.chance(0.4) {
            facing += sign * self.rng.random(0.100, 0.125);
        }

        let speed = self.speed();
        let step = 0.1 * TAU;
        for _ in 0..WANDER_REROLLS {
            if self.adapted(self.position + Vec2::from_angle(facing) * speed) {
                break;
            }
            facing += sign * step;
        }
        let facing = facing.rem_euclid(TAU);
        self.next.facing = facing;

        let candidate = self.position + Vec2::from_angle(facing) * speed;
        if self.walkable(candidate) {
            self.position = candidate;
        }
        true
    }

    /// Replace the targets with a path ending on `target`
    fn path_to(&mut self, target: &Entity) {
        let path = self.ctx.world.path(
            self.position,
            target.position(),
            self.state.layer(),
            self.rng,
        );
        let mut targets: Vec<Target> = match path.len() {
            0 | 1 => Vec::new(),
            n => path[1..n - 1].iter().copied().map(Target::Marker).collect(),
        };
        targets.push(Target::Entity(target.id()));
        self.next.targets = targets;
    }

    /// Approach the final target, then stay busy beside it
    ///
    /// Returns the target on the tick the action completes.
    fn engage(&mut self, action: ActionKind) -> Option<&'a Entity> {
        let target = self
            .next
            .target_entity()
            .and_then(|id| self.ctx.manager.get(id))?;

        if !self.perception.contains(target.position(), true) {
            self.advance();
            return None;
        }
        if self.done && self.state.action == action {
            self.next.targets.clear();
            return Some(target);
        }
        if !self.next.timer.is_busy() {
            self.next.timer.start_action(ACTION_TICKS);
        }
        None
    }

    /// Step towards the first target, dropping waypoints once reached
    fn advance(&mut self) -> bool {
        let point = match self.next.targets.first() {
            Some(Target::Marker(point)) => *point,
            Some(Target::Entity(id)) => match self.ctx.manager.get(*id) {
                Some(target) => target.position(),
                None => return false,
            },
            None => return false,
        };

        let speed = self.speed();
        let offset = point - self.position;
        let distance = offset.length();
        if distance > 0.0 {
            self.next.facing = offset.y.atan2(offset.x).rem_euclid(TAU);
        }
        if distance <= speed {
            self.position = point;
            if matches!(self.next.targets.first(), Some(Target::Marker(_))) {
                self.next.targets.remove(0);
            }
        } else {
            self.position += offset / distance * speed;
        }
        true
    }

    fn speed(&self) -> f32 {
        self.state.speed(self.ctx.world.at(self.position))
    }

    fn walkable(&self, point: Vec2) -> bool {
        self.ctx
            .world
            .at(point)
            .is_some_and(|b| self.state.layer().admits(b))
    }

    fn adapted(&self, point: Vec2) -> bool {
        self.ctx.world.at(point).is_some_and(|b| {
            self.state.layer().admits(b) && self.state.genes.adaptability(b.name) > 0.0
        })
    }
}
