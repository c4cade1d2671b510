//! The static triangle: three vertices on the unit circle, one per primary.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    /// `0xAARRGGBB`.
    pub color: u32,
}

const _: () = assert!(std::mem::size_of::<Vertex>() == 12);

/// Byte offset of [`Vertex::color`].
pub const COLOR_OFFSET: u32 = 8;
pub const STRIDE: u8 = std::mem::size_of::<Vertex>() as u8;

const SIN_120: f32 = 0.866_025_4;

/// Red at 0°, green at 120°, blue at 240°, all opaque.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex { position: [1.0, 0.0], color: 0xffff_0000 },
    Vertex { position: [-0.5, SIN_120], color: 0xff00_ff00 },
    Vertex { position: [-0.5, -SIN_120], color: 0xff00_00ff },
];

pub const TRIANGLE_INDICES: [u16; 3] = [0, 1, 2];

#[cfg(test)]
mod tests {
    use super::*;

    fn on_circle(v: &Vertex, deg: f32) -> bool {
        let (s, c) = deg.to_radians().sin_cos();
        (v.position[0] - c).abs() < 1e-5 && (v.position[1] - s).abs() < 1e-5
    }

    #[test]
    fn vertex_is_twelve_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 12);
        assert_eq!(STRIDE, 12);
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&TRIANGLE_VERTICES).len(), 36);
    }

    #[test]
    fn vertices_sit_on_unit_circle() {
        assert!(on_circle(&TRIANGLE_VERTICES[0], 0.0));
        assert!(on_circle(&TRIANGLE_VERTICES[1], 120.0));
        assert!(on_circle(&TRIANGLE_VERTICES[2], 240.0));
    }

    #[test]
    fn colors_are_opaque_primaries() {
        let colors: Vec<u32> = TRIANGLE_VERTICES.iter().map(|v| v.color).collect();
        assert_eq!(colors, vec![0xffff0000, 0xff00ff00, 0xff0000ff]);
        assert!(colors.iter().all(|c| c >> 24 == 0xff));
    }

    #[test]
    fn color_bytes_follow_offset() {
        let bytes = bytemuck::bytes_of(&TRIANGLE_VERTICES[0]);
        let off = COLOR_OFFSET as usize;
        let color = u32::from_ne_bytes([bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3]]);
        assert_eq!(color, 0xffff0000);
    }

    #[test]
    fn indices_cover_the_triangle() {
        assert_eq!(TRIANGLE_INDICES, [0, 1, 2]);
        assert_eq!(bytemuck::cast_slice::<u16, u8>(&TRIANGLE_INDICES).len(), 6);
    }
}
