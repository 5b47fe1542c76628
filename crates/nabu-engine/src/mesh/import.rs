use std::path::Path;

use glam::Vec3;

use super::{remap_axis, MeshError, Vertex};

/// CPU-side mesh ready for upload: one vertex stream and a triangle-list index
/// stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks the triangle-list invariants.
    pub fn validate(&self) -> Result<(), MeshError> {
        validate_indices(&self.indices, self.vertices.len())
    }
}

/// Imports the first mesh of the model file at `path`.
///
/// Faces are triangulated and flattened into a single index stream in file
/// order. Positions and normals are remapped with [`remap_axis`]. Meshes
/// without normals get smooth normals generated from their faces.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<MeshData, MeshError> {
    let path = path.as_ref();

    let (models, materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|source| {
        MeshError::Import {
            path: path.to_path_buf(),
            source,
        }
    })?;

    if let Err(err) = materials {
        // Materials are not used; a missing .mtl is not an error.
        log::debug!("ignoring materials of {}: {err}", path.display());
    }
    if models.len() > 1 {
        log::debug!(
            "{} contains {} meshes; only the first is rendered",
            path.display(),
            models.len()
        );
    }

    let mesh = from_models(&models)?;
    log::info!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

/// Builds mesh data from mesh 0 of an imported scene.
pub(crate) fn from_models(models: &[tobj::Model]) -> Result<MeshData, MeshError> {
    let model = models.first().ok_or(MeshError::Empty)?;
    let mesh = &model.mesh;

    let positions: Vec<Vec3> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| remap_axis(Vec3::new(p[0], p[1], p[2])))
        .collect();
    if positions.is_empty() {
        return Err(MeshError::Empty);
    }

    let indices = mesh.indices.clone();
    validate_indices(&indices, positions.len())?;

    let normals: Vec<Vec3> = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals
            .chunks_exact(3)
            .map(|n| remap_axis(Vec3::new(n[0], n[1], n[2])))
            .collect()
    } else {
        if !mesh.normals.is_empty() {
            log::warn!(
                "mesh `{}` has {} normals for {} positions; regenerating",
                model.name,
                mesh.normals.len() / 3,
                positions.len()
            );
        }
        generate_normals(&positions, &indices)
    };

    let vertices = positions
        .iter()
        .zip(&normals)
        .map(|(&p, &n)| Vertex::new(p, n))
        .collect();

    Ok(MeshData { vertices, indices })
}

fn validate_indices(indices: &[u32], vertex_count: usize) -> Result<(), MeshError> {
    if indices.len() % 3 != 0 {
        return Err(MeshError::NotTriangleList(indices.len()));
    }

    match indices
        .iter()
        .enumerate()
        .find(|&(_, &i)| i as usize >= vertex_count)
    {
        Some((position, &index)) => Err(MeshError::IndexOutOfRange {
            position,
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

/// Area-weighted smooth normals. Indices must already be validated.
fn generate_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor};

    use super::*;

    fn parse(src: &str) -> Vec<tobj::Model> {
        let mut reader = BufReader::new(Cursor::new(src.as_bytes()));
        let (models, _) =
            tobj::load_obj_buf(&mut reader, &tobj::GPU_LOAD_OPTIONS, |_| Ok(Default::default()))
                .expect("test OBJ parses");
        models
    }

    const QUAD: &str = "\
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    const TRIANGLE_WITH_NORMALS: &str = "\
o tri
v 1 2 3
v 2 2 3
v 1 3 3
vn 0 0 1
f 1//1 2//1 3//1
";

    // ── invariants ────────────────────────────────────────────────────────

    #[test]
    fn quad_is_triangulated_into_valid_triangle_list() {
        let mesh = from_models(&parse(QUAD)).unwrap();
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.index_count() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mesh = MeshData {
            vertices: vec![Vertex::new(Vec3::ZERO, Vec3::Y); 3],
            indices: vec![0, 1, 5],
        };
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange { position: 2, index: 5, vertex_count: 3 })
        ));
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let mesh = MeshData {
            vertices: vec![Vertex::new(Vec3::ZERO, Vec3::Y); 3],
            indices: vec![0, 1],
        };
        assert!(matches!(mesh.validate(), Err(MeshError::NotTriangleList(2))));
    }

    // ── remap ─────────────────────────────────────────────────────────────

    #[test]
    fn positions_and_normals_are_remapped() {
        let mesh = from_models(&parse(TRIANGLE_WITH_NORMALS)).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert!(
            mesh.vertices
                .iter()
                .any(|v| v.position() == Vec3::new(1.0, 3.0, -2.0))
        );
        for v in &mesh.vertices {
            assert!(v.normal().abs_diff_eq(Vec3::Y, 1e-6));
        }
    }

    #[test]
    fn winding_order_is_preserved() {
        let mesh = from_models(&parse(TRIANGLE_WITH_NORMALS)).unwrap();
        let p: Vec<Vec3> = mesh
            .indices
            .iter()
            .map(|&i| mesh.vertices[i as usize].position())
            .collect();
        let face = (p[1] - p[0]).cross(p[2] - p[0]).normalize();
        // CCW in the source with +Z normal stays CCW around the remapped +Y.
        assert!(face.abs_diff_eq(Vec3::Y, 1e-6));
    }

    // ── normals ───────────────────────────────────────────────────────────

    #[test]
    fn missing_normals_are_generated_from_faces() {
        let mesh = from_models(&parse(QUAD)).unwrap();
        for v in &mesh.vertices {
            // Source quad faces +Z, which becomes +Y.
            assert!(v.normal().abs_diff_eq(Vec3::Y, 1e-6), "normal {:?}", v.normal());
        }
    }

    #[test]
    fn unreferenced_vertex_gets_zero_normal() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::splat(5.0)];
        let normals = generate_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals[3], Vec3::ZERO);
        assert!(normals[0].abs_diff_eq(-Vec3::Y, 1e-6));
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn empty_scene_is_an_error() {
        assert!(matches!(from_models(&[]), Err(MeshError::Empty)));
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let err = load_mesh("does/not/exist.obj").unwrap_err();
        assert!(matches!(err, MeshError::Import { .. }));
    }

    #[test]
    fn shipped_cube_has_flat_faces() {
        let cube = load_mesh(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../nabu-viewer/assets/models/cube.obj"
        ))
        .unwrap();

        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.validate().is_ok());
        for v in &cube.vertices {
            let n = v.normal();
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert_eq!(n.abs().max_element(), 1.0);
        }
    }
}
