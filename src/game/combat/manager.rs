// Enemy roster: spawning, per-frame updates, hit resolution and removal

use glam::Vec2;

use super::enemy::{EnemyInstance, EnemyRegistry};
use super::melee::{first_hit, MeleeStrike};
use crate::engine::level::EnemySpawn;
use crate::engine::physics::CollisionGrid;
use crate::game::characters::health::DamageOutcome;
use crate::game::events::{EnemyId, EventQueue, GameEvent};

/// Owns every enemy in the level
#[derive(Debug)]
pub struct EnemyManager {
    registry: EnemyRegistry,
    enemies: Vec<EnemyInstance>,
    next_id: EnemyId,
    spawned: usize,
}

impl EnemyManager {
    pub fn new(registry: EnemyRegistry) -> Self {
        Self {
            registry,
            enemies: Vec::new(),
            next_id: 1,
            spawned: 0,
        }
    }

    /// Replace the roster with the level's spawns. Spawns naming an unknown
    /// enemy type are skipped. Returns how many enemies were created.
    pub fn spawn_all(&mut self, spawns: &[EnemySpawn], grid: &CollisionGrid) -> usize {
        self.clear();
        for spawn in spawns {
            let position = Vec2::new(grid.col_left(spawn.col), grid.row_bottom(spawn.row));
            self.spawn(&spawn.enemy_id, position);
        }
        log::info!("Spawned {} of {} enemies", self.spawned, spawns.len());
        self.spawned
    }

    /// Create one enemy of type `enemy_id` with its collider's bottom-left at `position`
    pub fn spawn(&mut self, enemy_id: &str, position: Vec2) -> Option<EnemyId> {
        let Some(definition) = self.registry.get(enemy_id) else {
            log::warn!("Unknown enemy type '{}', spawn skipped", enemy_id);
            return None;
        };
        let id = self.next_id;
        self.next_id += 1;
        self.enemies
            .push(EnemyInstance::new(id, definition, position));
        self.spawned += 1;
        Some(id)
    }

    /// Physics then AI for every enemy, chasing `target`
    pub fn update(&mut self, dt: f32, grid: Option<&CollisionGrid>, target: Vec2) {
        for enemy in &mut self.enemies {
            enemy.update(dt, grid, target);
        }
    }

    /// Test a player strike against living enemies. At most one enemy is hit.
    pub fn resolve_strike(
        &mut self,
        strike: &MeleeStrike,
        events: &mut EventQueue,
    ) -> Option<EnemyId> {
        let live: Vec<usize> = self
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| !enemy.is_dead())
            .map(|(index, _)| index)
            .collect();
        let targets = live.iter().map(|&index| {
            let enemy = &self.enemies[index];
            (enemy.center(), enemy.contact_radius())
        });
        let hit = first_hit(strike, targets)?;
        let enemy = &mut self.enemies[live[hit]];

        match enemy.apply_damage(strike.damage) {
            DamageOutcome::Ignored => return None,
            DamageOutcome::Damaged { amount, remaining } => events.push(GameEvent::EnemyDamaged {
                id: enemy.id(),
                amount,
                remaining,
            }),
            DamageOutcome::Killed { amount } => {
                events.push(GameEvent::EnemyDamaged {
                    id: enemy.id(),
                    amount,
                    remaining: 0,
                });
                events.push(GameEvent::EnemyDefeated { id: enemy.id() });
            }
        }
        Some(enemy.id())
    }

    /// Attacks landing on a target at `target` this frame
    pub fn collect_strikes(&mut self, target: Vec2) -> Vec<(EnemyId, i32)> {
        self.enemies
            .iter_mut()
            .filter_map(|enemy| enemy.strike(target).map(|damage| (enemy.id(), damage)))
            .collect()
    }

    /// Drop enemies whose death clip has finished. Returns how many were removed.
    pub fn purge_finished(&mut self, events: &mut EventQueue) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|enemy| {
            if enemy.is_finished() {
                log::info!("{} #{} removed", enemy.kind(), enemy.id());
                events.push(GameEvent::EnemyRemoved { id: enemy.id() });
                false
            } else {
                true
            }
        });
        before - self.enemies.len()
    }

    pub fn get(&self, id: EnemyId) -> Option<&EnemyInstance> {
        self.enemies.iter().find(|enemy| enemy.id() == id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyInstance> {
        self.enemies.iter()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Enemies created since the last `clear`
    pub fn spawned_count(&self) -> usize {
        self.spawned
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
        self.spawned = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn manager() -> EnemyManager {
        EnemyManager::new(EnemyRegistry::with_defaults())
    }

    fn strike_at(x: f32, damage: i32) -> MeleeStrike {
        MeleeStrike {
            point: Vec2::new(x, 34.5),
            range: 38.0,
            damage,
        }
    }

    #[test]
    fn test_spawn_all_uses_grid_coordinates() {
        let grid = CollisionGrid::new(16, 40, 32.0);
        let spawns = vec![
            EnemySpawn {
                enemy_id: "redDeon".to_string(),
                row: 13,
                col: 20,
            },
            EnemySpawn {
                enemy_id: "ghost".to_string(),
                row: 13,
                col: 5,
            },
        ];
        let mut enemies = manager();
        assert_eq!(enemies.spawn_all(&spawns, &grid), 1);
        assert_eq!(enemies.len(), 1);

        let enemy = enemies.enemies().next().unwrap();
        assert_eq!(enemy.position(), Vec2::new(640.0, 64.0));
        assert_eq!(enemy.kind(), "redDeon");
    }

    #[test]
    fn test_strike_hits_single_live_enemy() {
        let mut enemies = manager();
        let first = enemies.spawn("redDeon", Vec2::new(100.0, 0.0)).unwrap();
        let second = enemies.spawn("redDeon", Vec2::new(110.0, 0.0)).unwrap();
        let mut events = EventQueue::new();

        assert_eq!(enemies.resolve_strike(&strike_at(140.0, 20), &mut events), Some(first));
        assert_eq!(enemies.get(first).unwrap().health(), 130);
        assert_eq!(enemies.get(second).unwrap().health(), 150);
        assert_eq!(events.len(), 1);

        // Out of reach
        assert_eq!(enemies.resolve_strike(&strike_at(900.0, 20), &mut events), None);
    }

    #[test]
    fn test_kill_defeat_and_removal() {
        let mut enemies = manager();
        let id = enemies.spawn("redDeon", Vec2::ZERO).unwrap();
        let mut events = EventQueue::new();

        enemies.resolve_strike(&strike_at(40.0, 200), &mut events);
        let drained = events.drain();
        assert_eq!(
            drained,
            vec![
                GameEvent::EnemyDamaged {
                    id,
                    amount: 150,
                    remaining: 0
                },
                GameEvent::EnemyDefeated { id },
            ]
        );

        // Dead enemies are no longer valid targets
        assert_eq!(enemies.resolve_strike(&strike_at(40.0, 10), &mut events), None);
        assert!(events.is_empty());

        let far = Vec2::new(5000.0, 0.0);
        for _ in 0..60 {
            enemies.update(DT, None, far);
            assert_eq!(enemies.purge_finished(&mut events), 0);
        }
        for _ in 0..20 {
            enemies.update(DT, None, far);
            enemies.purge_finished(&mut events);
        }
        assert!(enemies.is_empty());
        assert_eq!(events.drain(), vec![GameEvent::EnemyRemoved { id }]);
        assert_eq!(enemies.spawned_count(), 1);
    }

    #[test]
    fn test_collect_strikes_from_attacking_enemy() {
        let mut enemies = manager();
        let id = enemies.spawn("redDeon", Vec2::ZERO).unwrap();
        let target = Vec2::new(80.0, 30.0);

        let mut hits = Vec::new();
        for _ in 0..40 {
            enemies.update(DT, None, target);
            hits.extend(enemies.collect_strikes(target));
        }
        assert_eq!(hits, vec![(id, 12)]);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut enemies = manager();
        let a = enemies.spawn("redDeon", Vec2::ZERO).unwrap();
        enemies.clear();
        let b = enemies.spawn("redDeon", Vec2::ZERO).unwrap();
        assert_ne!(a, b);
        assert!(enemies.spawn("ghost", Vec2::ZERO).is_none());
    }
}
