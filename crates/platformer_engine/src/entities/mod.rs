//! Interactive entities and the registry that owns them
//!
//! Entities are created once at level load and destroyed at most once on
//! consumption. A destroyed entity keeps its slot (with `alive == false`) so
//! that late or duplicate overlap reports still resolve to a dead entity
//! instead of to nothing; it is dropped from its kind group so the physics
//! side stops reporting it.

use crate::foundation::math::{Aabb, Vec2};
use crate::level::{LevelData, LevelError, COIN_LAYER, HAZARD_LAYER, KEY_LAYER, LOCK_LAYER};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable reference to an entity within one session
    pub struct EntityKey;
}

/// What an interactive entity does when the player overlaps it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Collectible, counts towards the power-up
    Coin,
    /// Unlocks locks
    Key,
    /// Completes the level when opened with a key
    Lock,
    /// Water; restarts the level on contact
    Hazard,
}

impl EntityKind {
    /// Every kind, in the order overlap groups are registered
    pub const ALL: [EntityKind; 4] = [Self::Coin, Self::Key, Self::Lock, Self::Hazard];

    /// Object layer the kind spawns from
    pub const fn layer(self) -> &'static str {
        match self {
            Self::Coin => COIN_LAYER,
            Self::Key => KEY_LAYER,
            Self::Lock => LOCK_LAYER,
            Self::Hazard => HAZARD_LAYER,
        }
    }

    /// Object name filter within that layer
    pub const fn object_name(self) -> &'static str {
        match self {
            Self::Coin => "coin",
            Self::Key => "key",
            Self::Lock => "lock",
            Self::Hazard => "water",
        }
    }

    /// Frame in the tilemap sprite sheet
    pub const fn frame(self) -> u32 {
        match self {
            Self::Coin => 151,
            Self::Key => 27,
            Self::Lock => 28,
            Self::Hazard => 53,
        }
    }

    const fn group_index(self) -> usize {
        match self {
            Self::Coin => 0,
            Self::Key => 1,
            Self::Lock => 2,
            Self::Hazard => 3,
        }
    }
}

/// A static pickup or trigger placed from the map
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveEntity {
    /// Behaviour on overlap
    pub kind: EntityKind,
    /// Centre of the static body
    pub position: Vec2,
    /// Body size (one map cell)
    pub size: Vec2,
    /// False once consumed; never set back to true
    pub alive: bool,
}

impl InteractiveEntity {
    /// Create a live entity
    pub fn new(kind: EntityKind, position: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            position,
            size,
            alive: true,
        }
    }

    /// Static body bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }
}

/// Owner of every interactive entity of a session, grouped by kind
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: SlotMap<EntityKey, InteractiveEntity>,
    groups: [Vec<EntityKey>; 4],
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn every entity kind from the level's object layers.
    /// A missing layer leaves that group empty.
    pub fn from_level(level: &LevelData) -> Self {
        let mut registry = Self::new();
        for kind in EntityKind::ALL {
            match level.objects_named(kind.layer(), kind.object_name()) {
                Ok(objects) => {
                    for object in objects {
                        registry.spawn(InteractiveEntity::new(
                            kind,
                            level.object_center(object),
                            level.tile_size(),
                        ));
                    }
                }
                Err(LevelError::MissingAsset(layer)) => {
                    log::warn!("Object layer '{}' not found; no {:?} entities spawned", layer, kind);
                }
                Err(e) => log::warn!("Could not spawn {:?} entities: {}", kind, e),
            }
        }
        registry
    }

    /// Add an entity to its kind group
    pub fn spawn(&mut self, entity: InteractiveEntity) -> EntityKey {
        let group = entity.kind.group_index();
        let key = self.entities.insert(entity);
        self.groups[group].push(key);
        key
    }

    /// Look up an entity, alive or not
    pub fn get(&self, key: EntityKey) -> Option<&InteractiveEntity> {
        self.entities.get(key)
    }

    /// Mutable lookup
    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut InteractiveEntity> {
        self.entities.get_mut(key)
    }

    /// Remove a consumed entity from its group. Returns false if it was
    /// already gone.
    pub fn despawn(&mut self, key: EntityKey) -> bool {
        let Some(entity) = self.entities.get_mut(key) else {
            return false;
        };
        entity.alive = false;
        let group = &mut self.groups[entity.kind.group_index()];
        match group.iter().position(|k| *k == key) {
            Some(index) => {
                group.remove(index);
                true
            }
            None => false,
        }
    }

    /// Live entities of one kind, in spawn order
    pub fn group(&self, kind: EntityKind) -> impl Iterator<Item = (EntityKey, &InteractiveEntity)> + '_ {
        self.groups[kind.group_index()]
            .iter()
            .filter_map(move |key| self.entities.get(*key).map(|entity| (*key, entity)))
    }

    /// Number of live entities of one kind
    pub fn live_count(&self, kind: EntityKind) -> usize {
        self.groups[kind.group_index()].len()
    }

    /// Every entity ever spawned this session, including consumed ones
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &InteractiveEntity)> {
        self.entities.iter()
    }

    /// Total number of entities ever spawned this session
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether nothing was spawned
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin_at(x: f32) -> InteractiveEntity {
        InteractiveEntity::new(EntityKind::Coin, Vec2::new(x, 0.0), Vec2::new(18.0, 18.0))
    }

    #[test]
    fn test_spawn_groups_by_kind() {
        let mut registry = EntityRegistry::new();
        registry.spawn(coin_at(0.0));
        registry.spawn(coin_at(20.0));
        registry.spawn(InteractiveEntity::new(EntityKind::Key, Vec2::zeros(), Vec2::new(18.0, 18.0)));

        assert_eq!(registry.live_count(EntityKind::Coin), 2);
        assert_eq!(registry.live_count(EntityKind::Key), 1);
        assert_eq!(registry.live_count(EntityKind::Lock), 0);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_despawn_happens_once() {
        let mut registry = EntityRegistry::new();
        let key = registry.spawn(coin_at(0.0));

        assert!(registry.despawn(key));
        assert!(!registry.despawn(key));
        assert_eq!(registry.live_count(EntityKind::Coin), 0);

        // The slot survives so late lookups see a dead entity
        let entity = registry.get(key).unwrap();
        assert!(!entity.alive);
    }

    #[test]
    fn test_group_preserves_spawn_order() {
        let mut registry = EntityRegistry::new();
        let a = registry.spawn(coin_at(0.0));
        let b = registry.spawn(coin_at(20.0));
        let c = registry.spawn(coin_at(40.0));
        registry.despawn(b);

        let keys: Vec<_> = registry.group(EntityKind::Coin).map(|(key, _)| key).collect();
        assert_eq!(keys, vec![a, c]);
    }

    #[test]
    fn test_kind_metadata() {
        assert_eq!(EntityKind::Coin.layer(), "Objects");
        assert_eq!(EntityKind::Hazard.object_name(), "water");
        assert_eq!(EntityKind::Coin.frame(), 151);
        assert_eq!(EntityKind::Lock.frame(), 28);
    }
}
