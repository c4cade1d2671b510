//! Handle-based scene engine.
//!
//! The [`Engine`] owns every object; callers hold [`Handle`]s and
//! [`Entity`] ids. Geometry, materials and renderables are described with
//! builders and validated when the engine creates them. Frames follow a
//! begin / render / end protocol driven by [`drive_frame`].

mod buffer;
mod camera;
mod context;
mod entity;
mod error;
mod frame;
mod handle;
mod material;
mod renderable;
mod renderer;
mod scene;
mod transform;
mod view;
mod viewport;

pub use buffer::{
    AttributeType, IndexBuffer, IndexBufferBuilder, IndexType, SlotLayout, VertexAttribute,
    VertexBuffer, VertexBufferBuilder,
};
pub use camera::{Camera, Projection, OPENGL_TO_WGPU_MATRIX};
pub use context::Engine;
pub use entity::{Entity, EntityManager};
pub use error::EngineError;
pub use frame::{drive_frame, FrameOutcome, FrameRenderer, FrameStats};
pub use handle::{Handle, Registry};
pub use material::{Material, MaterialBuilder, MaterialInstance, MaterialPackage};
pub use renderable::{
    Aabb, Geometry, Primitive, PrimitiveType, Renderable, RenderableBuilder, RenderableManager,
};
pub use scene::Scene;
pub use transform::{TransformInstance, TransformManager};
pub use view::{DepthPrepass, View};
pub use viewport::Viewport;
