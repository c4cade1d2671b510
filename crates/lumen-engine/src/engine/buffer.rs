//! Vertex and index buffers.
//!
//! Builders describe the raw byte layout the caller will upload; the engine
//! reads uploads by offset and stride, never by field name.

use super::context::Engine;
use super::error::EngineError;
use super::handle::Handle;

/// Semantic of a vertex attribute. The discriminant is the shader location.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexAttribute {
    Position = 0,
    Tangents = 1,
    Color = 2,
    Uv0 = 3,
    Uv1 = 4,
    BoneIndices = 5,
    BoneWeights = 6,
}

impl VertexAttribute {
    #[inline]
    pub fn shader_location(self) -> u32 {
        self as u32
    }
}

/// Element type of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttributeType {
    Byte4,
    UByte4,
    Short2,
    UShort2,
    Float,
    Float2,
    Float3,
    Float4,
}

impl AttributeType {
    /// Size in bytes.
    pub fn size(self) -> u32 {
        match self {
            AttributeType::Byte4 | AttributeType::UByte4 => 4,
            AttributeType::Short2 | AttributeType::UShort2 => 4,
            AttributeType::Float => 4,
            AttributeType::Float2 => 8,
            AttributeType::Float3 => 12,
            AttributeType::Float4 => 16,
        }
    }

    /// wgpu vertex format. `normalized` maps integer types to their
    /// `[0, 1]` / `[-1, 1]` float forms and is ignored for float types.
    pub fn vertex_format(self, normalized: bool) -> wgpu::VertexFormat {
        use wgpu::VertexFormat as F;
        match (self, normalized) {
            (AttributeType::Byte4, true) => F::Snorm8x4,
            (AttributeType::Byte4, false) => F::Sint8x4,
            (AttributeType::UByte4, true) => F::Unorm8x4,
            (AttributeType::UByte4, false) => F::Uint8x4,
            (AttributeType::Short2, true) => F::Snorm16x2,
            (AttributeType::Short2, false) => F::Sint16x2,
            (AttributeType::UShort2, true) => F::Unorm16x2,
            (AttributeType::UShort2, false) => F::Uint16x2,
            (AttributeType::Float, _) => F::Float32,
            (AttributeType::Float2, _) => F::Float32x2,
            (AttributeType::Float3, _) => F::Float32x3,
            (AttributeType::Float4, _) => F::Float32x4,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct AttributeDesc {
    semantic: VertexAttribute,
    buffer_index: u8,
    ty: AttributeType,
    byte_offset: u32,
    byte_stride: u8,
}

/// Resolved layout of one vertex buffer slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotLayout {
    pub stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl SlotLayout {
    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Describes a vertex buffer before it is created.
#[derive(Debug, Clone, Default)]
pub struct VertexBufferBuilder {
    vertex_count: u32,
    buffer_count: u8,
    attributes: Vec<AttributeDesc>,
    normalized: Vec<VertexAttribute>,
}

impl VertexBufferBuilder {
    pub fn vertex_count(mut self, count: u32) -> Self {
        self.vertex_count = count;
        self
    }

    pub fn buffer_count(mut self, count: u8) -> Self {
        self.buffer_count = count;
        self
    }

    /// Declares an attribute read from slot `buffer_index` at `byte_offset`
    /// every `byte_stride` bytes. A zero stride means tightly packed.
    pub fn attribute(
        mut self,
        semantic: VertexAttribute,
        buffer_index: u8,
        ty: AttributeType,
        byte_offset: u32,
        byte_stride: u8,
    ) -> Self {
        self.attributes.push(AttributeDesc {
            semantic,
            buffer_index,
            ty,
            byte_offset,
            byte_stride,
        });
        self
    }

    /// Marks an integer attribute as normalized.
    pub fn normalized(mut self, semantic: VertexAttribute) -> Self {
        if !self.normalized.contains(&semantic) {
            self.normalized.push(semantic);
        }
        self
    }

    /// Checks the description and resolves the per-slot layouts.
    pub fn layout(&self) -> Result<Vec<SlotLayout>, EngineError> {
        const B: &str = "vertex buffer";

        if self.vertex_count == 0 {
            return Err(EngineError::builder(B, "vertex count is zero"));
        }
        if self.buffer_count == 0 || self.buffer_count > 8 {
            return Err(EngineError::builder(B, format!("buffer count {} not in 1..=8", self.buffer_count)));
        }

        let mut slots: Vec<Option<SlotLayout>> = vec![None; self.buffer_count as usize];

        for (i, a) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|p| p.semantic == a.semantic) {
                return Err(EngineError::builder(B, format!("{:?} declared twice", a.semantic)));
            }

            let Some(slot) = slots.get_mut(a.buffer_index as usize) else {
                return Err(EngineError::builder(
                    B,
                    format!("{:?} uses buffer {} of {}", a.semantic, a.buffer_index, self.buffer_count),
                ));
            };

            let size = a.ty.size();
            let stride = if a.byte_stride == 0 { size } else { u32::from(a.byte_stride) };
            if a.byte_offset + size > stride {
                return Err(EngineError::builder(
                    B,
                    format!("{:?} at offset {} overruns stride {stride}", a.semantic, a.byte_offset),
                ));
            }

            let layout = slot.get_or_insert_with(|| SlotLayout {
                stride: u64::from(stride),
                attributes: Vec::new(),
            });
            if layout.stride != u64::from(stride) {
                return Err(EngineError::builder(
                    B,
                    format!("buffer {} mixes strides {} and {stride}", a.buffer_index, layout.stride),
                ));
            }

            layout.attributes.push(wgpu::VertexAttribute {
                format: a.ty.vertex_format(self.normalized.contains(&a.semantic)),
                offset: u64::from(a.byte_offset),
                shader_location: a.semantic.shader_location(),
            });
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.ok_or_else(|| EngineError::builder(B, format!("buffer {i} has no attributes"))))
            .collect()
    }

    pub(crate) fn count(&self) -> u32 {
        self.vertex_count
    }

    pub fn build(self, engine: &mut Engine<'_>) -> Result<Handle<VertexBuffer>, EngineError> {
        engine.create_vertex_buffer(self)
    }
}

/// Engine-side vertex buffer: layout plus one GPU buffer per slot.
pub struct VertexBuffer {
    pub(crate) vertex_count: u32,
    pub(crate) slots: Vec<SlotLayout>,
    pub(crate) gpu: Vec<Option<wgpu::Buffer>>,
}

impl VertexBuffer {
    pub fn builder() -> VertexBufferBuilder {
        VertexBufferBuilder::default()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn slot_layouts(&self) -> &[SlotLayout] {
        &self.slots
    }

    /// Validates an upload into slot `index`; the data must cover every vertex exactly.
    pub fn check_upload(&self, index: usize, len: usize) -> Result<(), EngineError> {
        let slot = self.slots.get(index).ok_or(EngineError::BufferSlot {
            index,
            count: self.slots.len(),
        })?;
        let expected = self.vertex_count as usize * slot.stride as usize;
        if len != expected {
            return Err(EngineError::BufferSize { expected, actual: len });
        }
        Ok(())
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.gpu.iter().all(Option::is_some)
    }
}

/// Index element type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum IndexType {
    #[default]
    UShort,
    UInt,
}

impl IndexType {
    pub fn size(self) -> usize {
        match self {
            IndexType::UShort => 2,
            IndexType::UInt => 4,
        }
    }

    pub fn format(self) -> wgpu::IndexFormat {
        match self {
            IndexType::UShort => wgpu::IndexFormat::Uint16,
            IndexType::UInt => wgpu::IndexFormat::Uint32,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexBufferBuilder {
    index_count: u32,
    index_type: IndexType,
}

impl IndexBufferBuilder {
    pub fn index_count(mut self, count: u32) -> Self {
        self.index_count = count;
        self
    }

    pub fn buffer_type(mut self, ty: IndexType) -> Self {
        self.index_type = ty;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        if self.index_count == 0 {
            return Err(EngineError::builder("index buffer", "index count is zero"));
        }
        Ok(())
    }

    pub fn build(self, engine: &mut Engine<'_>) -> Result<Handle<IndexBuffer>, EngineError> {
        engine.create_index_buffer(self)
    }

    pub(crate) fn into_buffer(self) -> IndexBuffer {
        IndexBuffer {
            index_count: self.index_count,
            index_type: self.index_type,
            gpu: None,
        }
    }
}

pub struct IndexBuffer {
    pub(crate) index_count: u32,
    pub(crate) index_type: IndexType,
    pub(crate) gpu: Option<wgpu::Buffer>,
}

impl IndexBuffer {
    pub fn builder() -> IndexBufferBuilder {
        IndexBufferBuilder::default()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    pub fn check_upload(&self, len: usize) -> Result<(), EngineError> {
        let expected = self.index_count as usize * self.index_type.size();
        if len != expected {
            return Err(EngineError::BufferSize { expected, actual: len });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_color_builder() -> VertexBufferBuilder {
        VertexBuffer::builder()
            .vertex_count(3)
            .buffer_count(1)
            .attribute(VertexAttribute::Position, 0, AttributeType::Float2, 0, 12)
            .attribute(VertexAttribute::Color, 0, AttributeType::UByte4, 8, 12)
            .normalized(VertexAttribute::Color)
    }

    fn vb_from(builder: &VertexBufferBuilder) -> VertexBuffer {
        VertexBuffer {
            vertex_count: builder.count(),
            slots: builder.layout().unwrap(),
            gpu: vec![None],
        }
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn position_color_layout() {
        let slots = position_color_builder().layout().unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].stride, 12);
        assert_eq!(
            slots[0].attributes,
            vec![
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 0, shader_location: 0 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Unorm8x4, offset: 8, shader_location: 2 },
            ]
        );
    }

    #[test]
    fn unnormalized_ubyte4_is_integer() {
        let slots = VertexBuffer::builder()
            .vertex_count(1)
            .buffer_count(1)
            .attribute(VertexAttribute::Color, 0, AttributeType::UByte4, 0, 0)
            .layout()
            .unwrap();
        assert_eq!(slots[0].attributes[0].format, wgpu::VertexFormat::Uint8x4);
        assert_eq!(slots[0].stride, 4);
    }

    #[test]
    fn attribute_past_stride_is_rejected() {
        let err = VertexBuffer::builder()
            .vertex_count(3)
            .buffer_count(1)
            .attribute(VertexAttribute::Position, 0, AttributeType::Float3, 4, 12)
            .layout();
        assert!(matches!(err, Err(EngineError::InvalidBuilder { .. })));
    }

    #[test]
    fn attribute_in_missing_buffer_is_rejected() {
        let err = VertexBuffer::builder()
            .vertex_count(3)
            .buffer_count(1)
            .attribute(VertexAttribute::Position, 1, AttributeType::Float2, 0, 8)
            .layout();
        assert!(err.is_err());
    }

    #[test]
    fn unused_buffer_slot_is_rejected() {
        let err = VertexBuffer::builder()
            .vertex_count(3)
            .buffer_count(2)
            .attribute(VertexAttribute::Position, 0, AttributeType::Float2, 0, 8)
            .layout();
        assert!(err.is_err());
    }

    #[test]
    fn zero_vertices_is_rejected() {
        assert!(VertexBuffer::builder().buffer_count(1).layout().is_err());
    }

    // ── uploads ───────────────────────────────────────────────────────────

    #[test]
    fn vertex_upload_must_match_count_times_stride() {
        let vb = vb_from(&position_color_builder());
        assert!(vb.check_upload(0, 36).is_ok());
        assert_eq!(vb.check_upload(0, 24), Err(EngineError::BufferSize { expected: 36, actual: 24 }));
        assert_eq!(vb.check_upload(1, 36), Err(EngineError::BufferSlot { index: 1, count: 1 }));
    }

    #[test]
    fn index_upload_must_match_count_times_type() {
        let ib = IndexBuffer::builder().index_count(3).buffer_type(IndexType::UShort).into_buffer();
        assert!(ib.check_upload(6).is_ok());
        assert!(ib.check_upload(12).is_err());

        let ib = IndexBuffer::builder().index_count(3).buffer_type(IndexType::UInt).into_buffer();
        assert!(ib.check_upload(12).is_ok());
    }

    #[test]
    fn empty_index_buffer_is_rejected() {
        assert!(IndexBuffer::builder().validate().is_err());
    }
}
