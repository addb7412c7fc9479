//! Binary STL output.
//!
//! Layout: 80-byte header, `u32` triangle count, then per triangle a face
//! normal, three vertices (all `f32`, little endian) and a zero `u16`
//! attribute word.

use std::io::Write;

use crate::{Mesh, StlError, VectorExt};

/// Size of the fixed STL header in bytes.
pub const HEADER_LEN: usize = 80;
/// Size of one triangle record in bytes.
pub const TRIANGLE_LEN: usize = 50;

/// Writes `mesh` as binary STL.
///
/// `header` is truncated or zero-padded to [`HEADER_LEN`] bytes. Normals are
/// recomputed from the winding; degenerate triangles get a zero normal.
pub fn write_binary_stl<W: Write>(
    writer: &mut W,
    mesh: &Mesh,
    header: &str,
) -> Result<(), StlError> {
    let count = mesh.triangle_count();
    let count = u32::try_from(count)
        .map_err(|_| StlError::TooManyTriangles(count))?;

    let mut head = [0u8; HEADER_LEN];
    let bytes = header.as_bytes();
    let len = bytes.len().min(HEADER_LEN);
    head[..len].copy_from_slice(&bytes[..len]);
    writer.write_all(&head)?;
    writer.write_all(&count.to_le_bytes())?;

    let mut record = [0u8; TRIANGLE_LEN];
    for [a, b, c] in mesh.triangles() {
        let normal = (b - a).cross(&(c - a)).unit();
        let values = [
            normal.x, normal.y, normal.z, a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z,
        ];
        for (chunk, value) in record.chunks_exact_mut(4).zip(values) {
            chunk.copy_from_slice(&(value as f32).to_le_bytes());
        }
        // Attribute byte count.
        record[48..].copy_from_slice(&0u16.to_le_bytes());
        writer.write_all(&record)?;
    }
    Ok(())
}

/// Encodes `mesh` as binary STL in memory.
pub fn to_binary_stl(mesh: &Mesh, header: &str) -> Result<Vec<u8>, StlError> {
    let mut data = Vec::with_capacity(HEADER_LEN + 4 + mesh.triangle_count() * TRIANGLE_LEN);
    write_binary_stl(&mut data, mesh, header)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, primitives};

    fn read_f32(data: &[u8], offset: usize) -> f32 {
        f32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn layout_matches_triangle_count() {
        let mesh = primitives::cuboid(Position::new(0.0, 0.0, 0.0), Position::new(1.0, 2.0, 3.0));
        let data = to_binary_stl(&mesh, "test").unwrap();

        assert_eq!(data.len(), 84 + 50 * 12);
        assert_eq!(&data[..4], b"test");
        assert!(data[4..80].iter().all(|&b| b == 0));
        assert_eq!(u32::from_le_bytes(data[80..84].try_into().unwrap()), 12);
        for i in 0..12 {
            let end = 84 + 50 * (i + 1);
            assert_eq!(&data[end - 2..end], &[0, 0]);
        }
    }

    #[test]
    fn long_header_is_truncated() {
        let header = "x".repeat(200);
        let data = to_binary_stl(&Mesh::default(), &header).unwrap();
        assert_eq!(data.len(), 84);
        assert!(data[..80].iter().all(|&b| b == b'x'));
        assert_eq!(&data[80..84], &[0, 0, 0, 0]);
    }

    #[test]
    fn normals_follow_winding() {
        let mesh = Mesh::from_triangles([[
            Position::new(0.0, 0.0, 0.0),
            Position::new(2.0, 0.0, 0.0),
            Position::new(0.0, 2.0, 0.0),
        ]]);
        let data = to_binary_stl(&mesh, "").unwrap();

        assert_eq!(read_f32(&data, 84), 0.0);
        assert_eq!(read_f32(&data, 88), 0.0);
        assert_eq!(read_f32(&data, 92), 1.0);
        // Second vertex x.
        assert_eq!(read_f32(&data, 84 + 12 + 12), 2.0);
    }

    #[test]
    fn degenerate_triangle_gets_zero_normal() {
        let p = Position::new(1.0, 1.0, 1.0);
        let mesh = Mesh::from_triangles([[p, p, p]]);
        let data = to_binary_stl(&mesh, "").unwrap();
        for offset in [84, 88, 92] {
            assert_eq!(read_f32(&data, offset), 0.0);
        }
    }
}
