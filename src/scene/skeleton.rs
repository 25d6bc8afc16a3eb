use glam::Affine3A;
use nifscene_files::common::types::RecordIndex;
use nifscene_files::nif::file::FileId;
use std::collections::HashMap;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub usize);

#[derive(Debug, Clone)]
pub struct Bone<N> {
    pub name: String,
    pub record: RecordIndex,
    pub node: N,
    pub parent: Option<BoneId>,
    /// Inverse of the bind pose in skeleton space.
    pub inverse_bind: Affine3A,
}

/// The bones created while loading a file as skeleton, in creation (depth first) order.
#[derive(Debug, Clone)]
pub struct Skeleton<N> {
    source: String,
    file: FileId,
    bones: Vec<Bone<N>>,
    by_record: HashMap<RecordIndex, BoneId>,
    by_name: HashMap<String, BoneId>,
}

impl<N> Skeleton<N> {
    pub fn new(source: impl Into<String>, file: FileId) -> Self {
        Self {
            source: source.into(),
            file,
            bones: Vec::new(),
            by_record: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Name of the file the skeleton was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Identity of the file the skeleton was built from. Record indices only mean something
    /// within that file.
    pub fn file(&self) -> FileId {
        self.file
    }

    /// A record reached twice (shared sub-trees) gets a bone per occurrence, lookups return the
    /// first one. Names are matched case insensitive.
    pub fn add_bone(&mut self, bone: Bone<N>) -> BoneId {
        let id = BoneId(self.bones.len());
        self.by_record.entry(bone.record).or_insert(id);
        self.by_name
            .entry(bone.name.to_lowercase())
            .or_insert(id);
        self.bones.push(bone);
        id
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone<N>> {
        self.bones.get(id.0)
    }

    pub fn bones(&self) -> &[Bone<N>] {
        &self.bones
    }

    pub fn root(&self) -> Option<&Bone<N>> {
        self.bones.first()
    }

    pub fn find_by_record(&self, record: RecordIndex) -> Option<BoneId> {
        self.by_record.get(&record).copied()
    }

    pub fn find_by_name(&self, name: &str) -> Option<BoneId> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifscene_files::nif::builder::NifFileBuilder;

    fn bone(name: &str, record: u32, parent: Option<BoneId>) -> Bone<u32> {
        Bone {
            name: name.to_owned(),
            record: RecordIndex(record),
            node: record,
            parent,
            inverse_bind: Affine3A::IDENTITY,
        }
    }

    #[test]
    fn lookups_prefer_the_first_bone() -> Result<(), anyhow::Error> {
        let file = NifFileBuilder::new("skeleton.nif").build()?;
        let mut skeleton = Skeleton::new(file.name(), file.id());
        let root = skeleton.add_bone(bone("Bip01", 0, None));
        let spine = skeleton.add_bone(bone("Bip01 Spine", 1, Some(root)));
        let again = skeleton.add_bone(bone("Bip01 Spine", 1, Some(root)));

        assert_eq!(skeleton.len(), 3);
        assert_eq!(skeleton.find_by_record(RecordIndex(1)), Some(spine));
        assert_eq!(skeleton.find_by_name("bip01 spine"), Some(spine));
        assert_ne!(spine, again);
        assert_eq!(skeleton.root().map(|bone| bone.record), Some(RecordIndex(0)));
        assert_eq!(skeleton.find_by_name("Bip01 Head"), None);
        assert_eq!(skeleton.file(), file.id());

        Ok(())
    }
}
