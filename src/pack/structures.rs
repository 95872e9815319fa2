use std::path::{Component, Path, PathBuf};

use super::error::FormatError;

/// File extension recognized as a pack file
pub const PACK_EXTENSION: &str = "pack";

/// Header value that ends the directory chain
pub const END_OF_CHAIN: u32 = 0;

/// One packed file's directory record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    /// Relative output path as written by the packing tool
    pub name: String,
    /// Absolute byte offset of the entry's data
    pub offset: u32,
    /// Length of the entry's data
    pub size: u32,
    /// Third directory field, carried through uninterpreted
    pub aux: u32,
}

impl PackEntry {
    /// End of the data range, widened so it cannot overflow
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }

    /// Name as a relative path, or `None` if it would escape its root.
    ///
    /// Packing tools on Windows write `\` separators, so both are accepted.
    pub fn relative_path(&self) -> Option<PathBuf> {
        let normalized = self.name.replace('\\', "/");
        let path = Path::new(&normalized);
        let mut out = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => out.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        if out.as_os_str().is_empty() {
            None
        } else {
            Some(out)
        }
    }

    /// Extension of the name without the dot, if any
    pub fn extension(&self) -> Option<&str> {
        let base = self.name.rsplit(['/', '\\']).next().unwrap_or(&self.name);
        match base.rfind('.') {
            Some(0) | None => None,
            Some(i) if i + 1 < base.len() => Some(&base[i + 1..]),
            Some(_) => None,
        }
    }
}

/// Ordered directory of a pack file, in block-encounter order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<PackEntry>,
}

impl Manifest {
    pub fn entries(&self) -> &[PackEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry sizes
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.size)).sum()
    }

    /// Check every entry's data range against the pack file length
    pub fn check_bounds(&self, file_len: u64) -> Result<(), FormatError> {
        match self.entries.iter().find(|e| e.end() > file_len) {
            Some(e) => Err(FormatError::EntryOutOfRange {
                name: e.name.clone(),
                offset: e.offset,
                size: e.size,
                file_len,
            }),
            None => Ok(()),
        }
    }
}

impl From<Vec<PackEntry>> for Manifest {
    fn from(entries: Vec<PackEntry>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for Manifest {
    type Item = PackEntry;
    type IntoIter = std::vec::IntoIter<PackEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a PackEntry;
    type IntoIter = std::slice::Iter<'a, PackEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Whether a path carries the pack extension (case-insensitive)
pub fn has_pack_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PACK_EXTENSION))
}
