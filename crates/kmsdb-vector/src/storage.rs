//! Binary persistence for the flat index: little-endian blob holding a
//! header, the doc_id table, then the vectors in insertion order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use kmsdb_core::error::{Error, Result};
use kmsdb_core::types::DocId;

use crate::index::FlatVectorIndex;

const MAGIC: &[u8; 4] = b"KVIX";
const VERSION: u32 = 1;

impl FlatVectorIndex {
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(MAGIC)?;
        out.write_u32::<LittleEndian>(VERSION)?;
        out.write_u32::<LittleEndian>(self.dim() as u32)?;
        out.write_u32::<LittleEndian>(self.len() as u32)?;
        for &doc_id in self.doc_ids() {
            out.write_u32::<LittleEndian>(doc_id)?;
        }
        for &value in self.data() {
            out.write_f32::<LittleEndian>(value)?;
        }
        out.flush()?;
        debug!(vectors = self.len(), dim = self.dim(), path = %path.display(), "vector index saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut input = BufReader::new(File::open(path)?);
        let mut magic = [0u8; 4];
        input.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(Error::persistence(format!(
                "{} is not a vector index file",
                path.display()
            )));
        }
        let version = input.read_u32::<LittleEndian>()?;
        if version != VERSION {
            return Err(Error::persistence(format!(
                "unsupported vector index version {version}"
            )));
        }
        let dim = input.read_u32::<LittleEndian>()? as usize;
        let count = input.read_u32::<LittleEndian>()? as usize;
        if dim == 0 {
            return Err(Error::persistence("vector index header carries zero dimension"));
        }
        let mut doc_ids: Vec<DocId> = Vec::with_capacity(count);
        for _ in 0..count {
            doc_ids.push(input.read_u32::<LittleEndian>()?);
        }
        let mut data: Vec<f32> = Vec::with_capacity(count * dim);
        for _ in 0..count * dim {
            data.push(input.read_f32::<LittleEndian>()?);
        }
        Ok(FlatVectorIndex::from_parts(dim, doc_ids, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn blob_round_trip_preserves_search_results() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("vectors.bin");

        let mut index = FlatVectorIndex::new(3).expect("new");
        index.add(0, vec![1.0, 0.0, 0.0]).expect("add");
        index.add(1, vec![0.0, 1.0, 0.0]).expect("add");
        index.add(2, vec![0.7, 0.7, 0.0]).expect("add");
        index.save(&path).expect("save");

        let reloaded = FlatVectorIndex::load(&path).expect("load");
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.dim(), 3);

        let before = index.search(&[0.9, 0.1, 0.0], 3).expect("search");
        let after = reloaded.search(&[0.9, 0.1, 0.0], 3).expect("search");
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.doc_id, a.doc_id);
            assert!((b.score - a.score).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_index_round_trips() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("vectors.bin");
        FlatVectorIndex::new(8).expect("new").save(&path).expect("save");
        let reloaded = FlatVectorIndex::load(&path).expect("load");
        assert!(reloaded.is_empty());
        assert_eq!(reloaded.dim(), 8);
    }

    #[test]
    fn foreign_file_is_rejected() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("vectors.bin");
        std::fs::write(&path, b"not a vector blob").expect("write");
        let err = FlatVectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
