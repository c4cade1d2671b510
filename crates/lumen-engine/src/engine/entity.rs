use super::handle::{Handle, Registry};

/// Opaque identity of one scene object.
///
/// An entity carries no data. Components (transform, renderable) are looked
/// up by entity in their managers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Entity(Handle<()>);

impl Entity {
    #[inline]
    pub fn id(self) -> u32 {
        self.0.index()
    }
}

/// Allocates and recycles entities.
#[derive(Default)]
pub struct EntityManager {
    alive: Registry<()>,
}

impl EntityManager {
    pub fn create(&mut self) -> Entity {
        Entity(self.alive.insert(()))
    }

    /// Frees the entity. Returns `false` if it was already dead.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        self.alive.remove(entity.0).is_some()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(entity.0)
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_entities_are_distinct_and_alive() {
        let mut em = EntityManager::default();
        let a = em.create();
        let b = em.create();
        assert_ne!(a, b);
        assert!(em.is_alive(a) && em.is_alive(b));
        assert_eq!(em.len(), 2);
    }

    #[test]
    fn destroyed_entity_is_dead_even_after_id_reuse() {
        let mut em = EntityManager::default();
        let a = em.create();
        assert!(em.destroy(a));
        let b = em.create();
        assert_eq!(a.id(), b.id());
        assert!(!em.is_alive(a));
        assert!(!em.destroy(a));
    }
}
