use std::collections::HashMap;

use cgmath::{Matrix4, Vector3, Vector4};

use super::buffer::{IndexBuffer, VertexBuffer};
use super::context::Engine;
use super::entity::Entity;
use super::error::EngineError;
use super::handle::Handle;
use super::material::MaterialInstance;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
}

impl PrimitiveType {
    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveType::Points => wgpu::PrimitiveTopology::PointList,
            PrimitiveType::Lines => wgpu::PrimitiveTopology::LineList,
            PrimitiveType::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            PrimitiveType::Triangles => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}

/// Axis-aligned bounding box in model space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min: min.into(), max: max.into() }
    }

    pub fn corners(&self) -> [Vector4<f32>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vector4::new(a.x, a.y, a.z, 1.0),
            Vector4::new(b.x, a.y, a.z, 1.0),
            Vector4::new(a.x, b.y, a.z, 1.0),
            Vector4::new(b.x, b.y, a.z, 1.0),
            Vector4::new(a.x, a.y, b.z, 1.0),
            Vector4::new(b.x, a.y, b.z, 1.0),
            Vector4::new(a.x, b.y, b.z, 1.0),
            Vector4::new(b.x, b.y, b.z, 1.0),
        ]
    }

    /// True when the box lies entirely outside one clip plane after `clip_from_model`.
    ///
    /// Conservative: a box straddling planes is never reported outside.
    pub fn is_outside_clip(&self, clip_from_model: &Matrix4<f32>) -> bool {
        let clip = self.corners().map(|c| clip_from_model * c);

        let planes: [fn(&Vector4<f32>) -> bool; 6] = [
            |p| p.x < -p.w,
            |p| p.x > p.w,
            |p| p.y < -p.w,
            |p| p.y > p.w,
            |p| p.z < 0.0,
            |p| p.z > p.w,
        ];

        planes.iter().any(|outside| clip.iter().all(outside))
    }
}

/// Geometry of one primitive: a range of the index buffer drawn from a
/// vertex buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub kind: PrimitiveType,
    pub vertices: Handle<VertexBuffer>,
    pub indices: Handle<IndexBuffer>,
    pub offset: u32,
    pub count: u32,
}

#[derive(Debug, Copy, Clone, Default)]
struct PrimitiveSlot {
    material: Option<MaterialInstance>,
    geometry: Option<Geometry>,
}

/// Resolved primitive stored on a renderable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Primitive {
    pub material: MaterialInstance,
    pub geometry: Geometry,
}

/// Describes the renderable component for an entity.
#[derive(Debug, Clone)]
pub struct RenderableBuilder {
    primitives: Vec<PrimitiveSlot>,
    bounding_box: Option<Aabb>,
    culling: bool,
    cast_shadows: bool,
    receive_shadows: bool,
}

impl RenderableBuilder {
    pub fn new(primitive_count: usize) -> Self {
        Self {
            primitives: vec![PrimitiveSlot::default(); primitive_count],
            bounding_box: None,
            culling: true,
            cast_shadows: false,
            receive_shadows: true,
        }
    }

    pub fn bounding_box(mut self, aabb: Aabb) -> Self {
        self.bounding_box = Some(aabb);
        self
    }

    pub fn material(mut self, index: usize, instance: MaterialInstance) -> Self {
        if let Some(p) = self.primitives.get_mut(index) {
            p.material = Some(instance);
        } else {
            log::warn!("renderable material index {index} out of range");
        }
        self
    }

    pub fn geometry(
        mut self,
        index: usize,
        kind: PrimitiveType,
        vertices: Handle<VertexBuffer>,
        indices: Handle<IndexBuffer>,
        offset: u32,
        count: u32,
    ) -> Self {
        if let Some(p) = self.primitives.get_mut(index) {
            p.geometry = Some(Geometry { kind, vertices, indices, offset, count });
        } else {
            log::warn!("renderable geometry index {index} out of range");
        }
        self
    }

    pub fn culling(mut self, enabled: bool) -> Self {
        self.culling = enabled;
        self
    }

    pub fn cast_shadows(mut self, enabled: bool) -> Self {
        self.cast_shadows = enabled;
        self
    }

    pub fn receive_shadows(mut self, enabled: bool) -> Self {
        self.receive_shadows = enabled;
        self
    }

    /// Validates the description and attaches it to `entity`.
    pub fn build(self, engine: &mut Engine<'_>, entity: Entity) -> Result<(), EngineError> {
        engine.create_renderable(entity, self)
    }

    /// Checks the description. `index_count` resolves an index buffer handle
    /// to its length, or `None` when the handle is unknown.
    pub(crate) fn validate(
        &self,
        index_count: impl Fn(Handle<IndexBuffer>) -> Option<u32>,
    ) -> Result<Renderable, EngineError> {
        const B: &str = "renderable";

        if self.primitives.is_empty() {
            return Err(EngineError::builder(B, "no primitives"));
        }
        if self.culling && self.bounding_box.is_none() {
            return Err(EngineError::builder(B, "culling requires a bounding box"));
        }

        let mut primitives = Vec::with_capacity(self.primitives.len());
        for (i, slot) in self.primitives.iter().enumerate() {
            let geometry = slot
                .geometry
                .ok_or_else(|| EngineError::builder(B, format!("primitive {i} has no geometry")))?;
            let material = slot
                .material
                .ok_or_else(|| EngineError::builder(B, format!("primitive {i} has no material")))?;

            let available = index_count(geometry.indices).ok_or(EngineError::UnknownHandle("index buffer"))?;
            let end = u64::from(geometry.offset) + u64::from(geometry.count);
            if geometry.count == 0 || end > u64::from(available) {
                return Err(EngineError::builder(
                    B,
                    format!(
                        "primitive {i} range {}..{end} outside {available} indices",
                        geometry.offset
                    ),
                ));
            }

            primitives.push(Primitive { material, geometry });
        }

        Ok(Renderable {
            primitives,
            bounding_box: self.bounding_box,
            culling: self.culling,
            cast_shadows: self.cast_shadows,
            receive_shadows: self.receive_shadows,
        })
    }
}

/// Renderable component.
#[derive(Debug, Clone)]
pub struct Renderable {
    primitives: Vec<Primitive>,
    bounding_box: Option<Aabb>,
    culling: bool,
    cast_shadows: bool,
    receive_shadows: bool,
}

impl Renderable {
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        self.bounding_box
    }

    pub fn is_culling_enabled(&self) -> bool {
        self.culling
    }

    pub fn casts_shadows(&self) -> bool {
        self.cast_shadows
    }

    pub fn receives_shadows(&self) -> bool {
        self.receive_shadows
    }

    /// Whether frustum culling rejects this renderable.
    pub fn is_culled(&self, clip_from_model: &Matrix4<f32>) -> bool {
        match (self.culling, self.bounding_box) {
            (true, Some(aabb)) => aabb.is_outside_clip(clip_from_model),
            _ => false,
        }
    }
}

/// Stores renderable components by entity.
#[derive(Default)]
pub struct RenderableManager {
    components: HashMap<Entity, Renderable>,
}

impl RenderableManager {
    pub fn builder(primitive_count: usize) -> RenderableBuilder {
        RenderableBuilder::new(primitive_count)
    }

    pub(crate) fn insert(&mut self, entity: Entity, renderable: Renderable) {
        self.components.insert(entity, renderable);
    }

    pub fn get(&self, entity: Entity) -> Option<&Renderable> {
        self.components.get(&entity)
    }

    pub fn has_component(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    pub fn remove(&mut self, entity: Entity) -> Option<Renderable> {
        self.components.remove(&entity)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
