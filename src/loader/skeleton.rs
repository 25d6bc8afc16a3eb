use crate::StructuralError;
use crate::loader::conversions::{affine, vec3};
use crate::scene::skeleton::{Bone, BoneId, Skeleton};
use crate::scene::types::{BoneInfluence, Geometry, SkinBinding};
use glam::Affine3A;
use log::{debug, warn};
use nifscene_files::common::types::RecordIndex;
use nifscene_files::nif::file::NifFile;
use nifscene_files::nif::types::{NiSkinData, NiSkinInstance};

/// Which skeleton, if any, skinned shapes bind against.
pub enum SkeletonMode<'s, N> {
    None,
    /// `load_as_skeleton`: every node becomes a bone of this skeleton.
    Building(Skeleton<N>),
    /// `load_with_skeleton`: bones come from an earlier load.
    Existing(&'s Skeleton<N>),
}

impl<N> SkeletonMode<'_, N> {
    pub fn is_building(&self) -> bool {
        matches!(self, SkeletonMode::Building(_))
    }

    pub fn skeleton(&self) -> Option<&Skeleton<N>> {
        match self {
            SkeletonMode::None => None,
            SkeletonMode::Building(skeleton) => Some(skeleton),
            SkeletonMode::Existing(skeleton) => Some(skeleton),
        }
    }

    /// Registers a freshly created bone node, does nothing unless building.
    pub fn add_bone(&mut self, name: &str, record: RecordIndex, node: N, parent: Option<BoneId>, inverse_bind: Affine3A) -> Option<BoneId> {
        match self {
            SkeletonMode::Building(skeleton) => Some(skeleton.add_bone(Bone {
                name: name.to_owned(),
                record,
                node,
                parent,
                inverse_bind,
            })),
            _ => None,
        }
    }
}

/// A skinned shape whose geometry waits for the walk to finish, so bones that come later in
/// the file exist by the time the weights are bound.
pub struct PendingSkin<N> {
    pub node: N,
    pub geometry: Geometry,
    pub skin: RecordIndex,
}

/// Binds the skin instance of `geometry` against `skeleton`. Bones are matched by record index
/// when the skeleton was built from this very file, by name otherwise. A referenced bone that
/// can't be found fails with [`StructuralError::MissingBone`]. Returns `None` when the
/// skin is too broken to use, the shape is then static.
pub fn bind_skin<N>(
    file: &NifFile,
    skeleton: &Skeleton<N>,
    geometry: &Geometry,
    skin: RecordIndex,
) -> Result<Option<SkinBinding>, StructuralError> {
    let shape = geometry.record;
    let instance = match file.get::<NiSkinInstance>(skin) {
        Ok(instance) => instance,
        Err(e) => {
            warn!("{}: skin of {} ignored: {}", file.name(), shape, e);
            return Ok(None);
        }
    };

    let data = match instance.data.map(|data| file.get::<NiSkinData>(data)) {
        Some(Ok(data)) => data,
        Some(Err(e)) => {
            warn!("{}: skin of {} ignored: {}", file.name(), shape, e);
            return Ok(None);
        }
        None => {
            warn!("{}: skin instance {} has no skin data", file.name(), skin);
            return Ok(None);
        }
    };

    if instance.bones.len() != data.bones.len() {
        warn!(
            "{}: skin instance {} lists {} bones, but has data for {}",
            file.name(),
            skin,
            instance.bones.len(),
            data.bones.len()
        );
    }

    let same_file = skeleton.file() == file.id();

    // Every referenced bone has to exist, including those the skin data has no weights for.
    let mut bones = Vec::with_capacity(instance.bones.len());
    for bone_ref in &instance.bones {
        match *bone_ref {
            Some(bone) => bones.push(Some(resolve_bone(file, skeleton, shape, bone, same_file)?)),
            None => {
                warn!("{}: skin instance {} has an empty bone reference", file.name(), skin);
                bones.push(None);
            }
        }
    }

    let vertex_count = geometry.mesh.vertex_buffers.position_buffer.len();
    let mut influences = Vec::with_capacity(data.bones.len());

    for (resolved, bone_data) in bones.into_iter().zip(&data.bones) {
        let Some((bone_id, name)) = resolved else {
            continue;
        };

        let weights = bone_data
            .weights
            .iter()
            .filter(|weight| {
                let valid = (weight.vertex as usize) < vertex_count;
                if !valid {
                    warn!("{}: bone weight for missing vertex {} in {}", file.name(), weight.vertex, skin);
                }
                valid
            })
            .map(|weight| (weight.vertex as u32, weight.weight))
            .collect();

        influences.push(BoneInfluence {
            bone: bone_id,
            bone_name: name,
            mesh_to_bone: affine(&bone_data.transform),
            bound_center: vec3(&bone_data.bound_center),
            bound_radius: bone_data.bound_radius,
            weights,
        });
    }

    debug!("{}: bound {} to {} bones", file.name(), shape, influences.len());
    Ok(Some(SkinBinding {
        skin_transform: affine(&data.transform),
        influences,
    }))
}

/// Finds the skeleton bone for the node record `bone`. Records only identify bones within the
/// file the skeleton was built from, anywhere else the node's name has to match.
fn resolve_bone<N>(
    file: &NifFile,
    skeleton: &Skeleton<N>,
    shape: RecordIndex,
    bone: RecordIndex,
    same_file: bool,
) -> Result<(BoneId, String), StructuralError> {
    let missing = |name: String| StructuralError::MissingBone {
        file: file.name().to_owned(),
        shape,
        bone,
        name,
    };

    let name = match file.get_record(bone).map(|record| record.av_object()) {
        Ok(Some(av)) => av.name.clone(),
        Ok(None) | Err(_) => return Err(missing(String::new())),
    };

    let found = if same_file {
        skeleton.find_by_record(bone)
    } else if name.is_empty() {
        None
    } else {
        skeleton.find_by_name(&name)
    };

    match found {
        Some(bone_id) => Ok((bone_id, name)),
        None => Err(missing(name)),
    }
}
