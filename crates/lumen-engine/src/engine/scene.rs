use super::entity::Entity;

/// The set of entities a view draws.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    /// Adds `entity`; adding it twice has no effect.
    pub fn add_entity(&mut self, entity: Entity) {
        if !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
    }

    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        let before = self.entities.len();
        self.entities.retain(|e| *e != entity);
        self.entities.len() != before
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EntityManager;

    #[test]
    fn add_is_idempotent_and_ordered() {
        let mut em = EntityManager::default();
        let (a, b) = (em.create(), em.create());
        let mut scene = Scene::default();
        scene.add_entity(a);
        scene.add_entity(b);
        scene.add_entity(a);
        assert_eq!(scene.entities(), &[a, b]);
    }

    #[test]
    fn remove_reports_membership() {
        let mut em = EntityManager::default();
        let a = em.create();
        let mut scene = Scene::default();
        scene.add_entity(a);
        assert!(scene.remove_entity(a));
        assert!(!scene.remove_entity(a));
        assert_eq!(scene.entity_count(), 0);
    }
}
