use super::{MeshData, MeshError, MeshSource};

/// Structured triangulation of the unit square `[0, 1] x [0, 1]` in the z = 0 plane.
///
/// The square is split into `n x n` cells with `n = ceil(1 / maxh)`; each cell
/// becomes two triangles. Every triangle contributes its three sides to the
/// edge list, so interior edges appear once per adjacent triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSquareMesher {
    maxh: f32,
}

impl UnitSquareMesher {
    pub const DEFAULT_MAXH: f32 = 0.2;

    /// Largest `n` whose edge array (`6 n^2` pairs, 48 bytes per cell) still
    /// fits the default 128 MiB storage binding limit.
    pub const MAX_DIVISIONS: u32 = 1672;

    /// `maxh` is the largest allowed cell side length.
    pub fn new(maxh: f32) -> Self {
        Self { maxh }
    }

    pub fn maxh(&self) -> f32 {
        self.maxh
    }

    /// Cells per side for the configured `maxh`.
    pub fn divisions(&self) -> Result<u32, MeshError> {
        if !self.maxh.is_finite() || self.maxh <= 0.0 {
            return Err(MeshError::InvalidParameter(format!(
                "maxh must be positive and finite, got {}",
                self.maxh
            )));
        }
        // Tolerate float noise so that e.g. 0.2 yields 5 cells, not 6.
        let n = (1.0 / self.maxh - 1e-4).ceil().max(1.0);
        if n > Self::MAX_DIVISIONS as f32 {
            return Err(MeshError::InvalidParameter(format!(
                "maxh {} would produce more than {} cells per side",
                self.maxh,
                Self::MAX_DIVISIONS
            )));
        }
        Ok(n as u32)
    }
}

impl Default for UnitSquareMesher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAXH)
    }
}

impl MeshSource for UnitSquareMesher {
    fn generate(&self) -> Result<MeshData, MeshError> {
        let n = self.divisions()?;
        let side = n + 1;
        let step = 1.0 / n as f32;

        let mut vertices = Vec::with_capacity((side * side) as usize);
        for j in 0..side {
            for i in 0..side {
                vertices.push([i as f32 * step, j as f32 * step, 0.0, 0.0]);
            }
        }

        let at = |i: u32, j: u32| j * side + i;
        let mut triangles = Vec::with_capacity((2 * n * n) as usize);
        for j in 0..n {
            for i in 0..n {
                let (v00, v10, v01, v11) = (at(i, j), at(i + 1, j), at(i, j + 1), at(i + 1, j + 1));
                triangles.push([v00, v10, v11, 0]);
                triangles.push([v00, v11, v01, 0]);
            }
        }

        let edges = triangles
            .iter()
            .flat_map(|t| (0..3).map(move |k| [t[k], t[(k + 1) % 3]]))
            .collect();

        log::debug!(
            "unit square mesh: maxh={} divisions={} vertices={} triangles={}",
            self.maxh,
            n,
            vertices.len(),
            triangles.len()
        );

        MeshData::new(vertices, edges, triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_maxh_gives_five_divisions() {
        assert_eq!(UnitSquareMesher::default().divisions(), Ok(5));
        assert_eq!(UnitSquareMesher::new(0.3).divisions(), Ok(4));
        assert_eq!(UnitSquareMesher::new(2.0).divisions(), Ok(1));
    }

    #[test]
    fn element_counts_follow_divisions() {
        let mesh = UnitSquareMesher::new(0.25).generate().unwrap();
        let n = 4;
        assert_eq!(mesh.vertex_count(), (n + 1) * (n + 1));
        assert_eq!(mesh.triangle_count(), 2 * n * n);
        assert_eq!(mesh.edge_count(), 6 * n * n);
    }

    #[test]
    fn single_cell_layout() {
        let mesh = UnitSquareMesher::new(1.0).generate().unwrap();
        assert_eq!(
            mesh.vertices(),
            &[
                [0.0, 0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0, 0.0],
            ]
        );
        assert_eq!(mesh.triangles(), &[[0, 1, 3, 0], [0, 3, 2, 0]]);
        assert_eq!(
            mesh.edges(),
            &[[0, 1], [1, 3], [3, 0], [0, 3], [3, 2], [2, 0]]
        );
    }

    #[test]
    fn vertices_stay_inside_unit_square() {
        let mesh = UnitSquareMesher::default().generate().unwrap();
        for v in mesh.vertices() {
            assert!((0.0..=1.0 + 1e-6).contains(&v[0]));
            assert!((0.0..=1.0 + 1e-6).contains(&v[1]));
            assert_eq!(v[2], 0.0);
        }
    }

    #[test]
    fn division_cap_matches_default_storage_limit() {
        let max = u64::from(UnitSquareMesher::MAX_DIVISIONS);
        let limit = u64::from(wgpu::Limits::default().max_storage_buffer_binding_size);
        assert!(48 * max * max <= limit);
        assert!(48 * (max + 1) * (max + 1) > limit);
    }

    #[test]
    fn rejects_maxh_beyond_division_cap() {
        assert_eq!(
            UnitSquareMesher::new(1.0 / 1671.5).divisions(),
            Ok(UnitSquareMesher::MAX_DIVISIONS)
        );
        assert!(matches!(
            UnitSquareMesher::new(1.0 / 1672.5).generate(),
            Err(MeshError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_non_positive_maxh() {
        assert!(matches!(
            UnitSquareMesher::new(0.0).generate(),
            Err(MeshError::InvalidParameter(_))
        ));
        assert!(UnitSquareMesher::new(f32::NAN).divisions().is_err());
    }
}
