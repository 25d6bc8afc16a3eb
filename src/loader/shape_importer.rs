use crate::loader::conversions::{color, vec2, vec3};
use crate::scene::types::{BoundTexture, Mesh, VertexBuffers};
use itertools::Itertools;
use log::warn;
use nifscene_files::common::types::RecordIndex;
use nifscene_files::nif::file::NifFile;
use nifscene_files::nif::types::NiTriShapeData;
use std::collections::BTreeMap;

pub struct ShapeImporter {}

impl ShapeImporter {
    /// Texture coordinates are emitted per bound texture unit, using the uv set that unit asks
    /// for.
    pub fn create_mesh(
        file: &NifFile,
        shape: RecordIndex,
        data: &NiTriShapeData,
        textures: &BTreeMap<u32, BoundTexture>,
    ) -> Mesh {
        let vertex_count = data.vertices.len();
        let position_buffer = data.vertices.iter().map(vec3).collect_vec();

        let normals_buffer = if data.normals.len() == vertex_count {
            data.normals.iter().map(vec3).collect_vec()
        } else {
            if !data.normals.is_empty() {
                warn!("{}: {} has {} normals for {} vertices", file.name(), shape, data.normals.len(), vertex_count);
            }
            vec![]
        };

        let vertex_color_0 = if data.colors.len() == vertex_count {
            data.colors.iter().map(color).collect_vec()
        } else {
            if !data.colors.is_empty() {
                warn!("{}: {} has {} colors for {} vertices", file.name(), shape, data.colors.len(), vertex_count);
            }
            vec![]
        };

        let mut texcoord_buffers = BTreeMap::new();
        for (unit, bound) in textures {
            let mut uv_set = bound.uv_set as usize;
            if uv_set >= data.uv_sets.len() {
                warn!("{}: out of bounds UV set {} on shape {}", file.name(), uv_set, shape);
                if data.uv_sets.is_empty() {
                    continue;
                }
                uv_set = 0;
            }

            texcoord_buffers.insert(*unit, data.uv_sets[uv_set].iter().map(vec2).collect_vec());
        }

        if data.triangles.len() % 3 != 0 {
            warn!("{}: {} has a dangling partial triangle", file.name(), shape);
        }

        let mut index_buffer = Vec::<u32>::with_capacity(data.triangles.len());
        for triangle in &data.triangles.iter().chunks(3) {
            let triangle = triangle.map(|&i| i as u32).collect_vec();
            if triangle.len() != 3 {
                break;
            }
            if triangle.iter().any(|&i| i as usize >= vertex_count) {
                warn!("{}: {} references a missing vertex, dropping the triangle", file.name(), shape);
                continue;
            }
            index_buffer.extend(triangle);
        }

        Mesh {
            index_buffer,
            vertex_buffers: VertexBuffers {
                position_buffer,
                normals_buffer,
                texcoord_buffers,
                vertex_color_0,
            },
        }
    }
}
