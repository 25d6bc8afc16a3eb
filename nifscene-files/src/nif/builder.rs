use crate::common::types::RecordIndex;
use crate::nif::file::NifFile;
use crate::nif::types::Record;
use crate::RecordError;

/// Assembles a [`NifFile`] record by record. Decoders push records in file order, hosts and
/// tests use it to synthesize files. Forward references are handled by reserving a slot first
/// and filling it later.
#[derive(Debug)]
pub struct NifFileBuilder {
    name: String,
    records: Vec<Option<Record>>,
    roots: Vec<RecordIndex>,
}

impl NifFileBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn push(&mut self, record: impl Into<Record>) -> RecordIndex {
        self.records.push(Some(record.into()));
        RecordIndex((self.records.len() - 1) as u32)
    }

    pub fn reserve(&mut self) -> RecordIndex {
        self.records.push(None);
        RecordIndex((self.records.len() - 1) as u32)
    }

    pub fn set(&mut self, index: RecordIndex, record: impl Into<Record>) -> Result<(), RecordError> {
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index.as_usize())
            .ok_or(RecordError::OutOfRange { index, len })?;
        *slot = Some(record.into());
        Ok(())
    }

    pub fn add_root(&mut self, index: RecordIndex) -> &mut Self {
        self.roots.push(index);
        self
    }

    pub fn build(self) -> Result<NifFile, RecordError> {
        let records = self
            .records
            .into_iter()
            .enumerate()
            .map(|(i, record)| record.ok_or(RecordError::Unfilled { index: RecordIndex(i as u32) }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NifFile::new(self.name, records, self.roots))
    }
}
