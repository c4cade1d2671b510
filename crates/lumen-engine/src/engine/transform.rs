use std::collections::HashMap;

use cgmath::{Matrix4, SquareMatrix};

use super::entity::Entity;

/// Index of an entity's transform component.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TransformInstance(u32);

/// Stores one local transform per entity.
///
/// Entities without a transform component are treated as identity.
#[derive(Default)]
pub struct TransformManager {
    instances: HashMap<Entity, TransformInstance>,
    locals: Vec<Matrix4<f32>>,
    free: Vec<u32>,
}

impl TransformManager {
    /// Attaches a transform component (identity) unless one exists.
    pub fn create(&mut self, entity: Entity) -> TransformInstance {
        if let Some(inst) = self.instances.get(&entity) {
            return *inst;
        }

        let inst = match self.free.pop() {
            Some(slot) => {
                self.locals[slot as usize] = Matrix4::identity();
                TransformInstance(slot)
            }
            None => {
                self.locals.push(Matrix4::identity());
                TransformInstance(self.locals.len() as u32 - 1)
            }
        };
        self.instances.insert(entity, inst);
        inst
    }

    /// Detaches the transform component of `entity`. Its slot is reused by
    /// the next [`create`](Self::create).
    pub fn destroy(&mut self, entity: Entity) -> bool {
        match self.instances.remove(&entity) {
            Some(inst) => {
                self.free.push(inst.0);
                true
            }
            None => false,
        }
    }

    pub fn instance(&self, entity: Entity) -> Option<TransformInstance> {
        self.instances.get(&entity).copied()
    }

    pub fn has_component(&self, entity: Entity) -> bool {
        self.instances.contains_key(&entity)
    }

    pub fn set_transform(&mut self, instance: TransformInstance, local: Matrix4<f32>) {
        if let Some(m) = self.locals.get_mut(instance.0 as usize) {
            *m = local;
        }
    }

    pub fn transform(&self, instance: TransformInstance) -> Matrix4<f32> {
        self.locals
            .get(instance.0 as usize)
            .copied()
            .unwrap_or_else(Matrix4::identity)
    }

    /// World transform of `entity`. There is no parenting, so this is the
    /// local transform.
    pub fn world_transform(&self, entity: Entity) -> Matrix4<f32> {
        self.instance(entity)
            .map_or_else(Matrix4::identity, |inst| self.transform(inst))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EntityManager;
    use cgmath::{Rad, Vector3};

    #[test]
    fn create_is_idempotent() {
        let mut em = EntityManager::default();
        let mut tm = TransformManager::default();
        let e = em.create();
        let a = tm.create(e);
        let b = tm.create(e);
        assert_eq!(a, b);
        assert_eq!(tm.len(), 1);
    }

    #[test]
    fn missing_component_is_identity() {
        let mut em = EntityManager::default();
        let tm = TransformManager::default();
        let e = em.create();
        assert!(tm.instance(e).is_none());
        assert_eq!(tm.world_transform(e), Matrix4::identity());
    }

    #[test]
    fn set_transform_is_visible_through_entity() {
        let mut em = EntityManager::default();
        let mut tm = TransformManager::default();
        let e = em.create();
        let inst = tm.create(e);

        let m = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0))
            * Matrix4::from_angle_z(Rad(0.5));
        tm.set_transform(inst, m);
        assert_eq!(tm.world_transform(e), m);
    }

    #[test]
    fn destroy_detaches_and_reuses_slot() {
        let mut em = EntityManager::default();
        let mut tm = TransformManager::default();
        let a = em.create();
        let b = em.create();
        let inst_a = tm.create(a);
        tm.set_transform(inst_a, Matrix4::from_angle_z(Rad(1.0)));

        assert!(tm.destroy(a));
        assert!(!tm.destroy(a));
        assert!(tm.instance(a).is_none());
        assert_eq!(tm.world_transform(a), Matrix4::identity());

        let inst_b = tm.create(b);
        assert_eq!(inst_b, inst_a);
        assert_eq!(tm.transform(inst_b), Matrix4::identity());
        assert_eq!(tm.len(), 1);
    }
}
