//! Storage hook
//!
//! Assets such as splash bitmaps are loaded through [`Storage`]. The real
//! boot stage backs it with the SD card filesystem; [`RamStorage`] serves
//! files that were linked into the image or staged by an earlier loader.

use crate::{HalError, HalResult};
use alloc::vec::Vec;
use heapless::Vec as FileTable;

/// Read-only access to named files
pub trait Storage {
    /// Read the whole file at `path`
    fn read_file(&mut self, path: &str) -> HalResult<Vec<u8>>;
}

impl<T: Storage + ?Sized> Storage for &mut T {
    fn read_file(&mut self, path: &str) -> HalResult<Vec<u8>> {
        (**self).read_file(path)
    }
}

/// Maximum number of files a [`RamStorage`] can hold
pub const RAM_STORAGE_FILES: usize = 8;

/// In-memory file table
#[derive(Debug, Default)]
pub struct RamStorage<'a> {
    files: FileTable<(&'a str, &'a [u8]), RAM_STORAGE_FILES>,
}

impl<'a> RamStorage<'a> {
    /// Create an empty file table
    pub const fn new() -> Self {
        Self {
            files: FileTable::new(),
        }
    }

    /// Register `data` under `path`, replacing any previous entry
    pub fn insert(&mut self, path: &'a str, data: &'a [u8]) -> HalResult<()> {
        if let Some(entry) = self.files.iter_mut().find(|(p, _)| *p == path) {
            entry.1 = data;
            return Ok(());
        }
        self.files
            .push((path, data))
            .map_err(|_| HalError::OutOfMemory)
    }

    /// Number of registered files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file is registered
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Storage for RamStorage<'_> {
    fn read_file(&mut self, path: &str) -> HalResult<Vec<u8>> {
        if path.is_empty() {
            return Err(HalError::InvalidParameter);
        }
        self.files
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, data)| data.to_vec())
            .ok_or(HalError::NotFound)
    }
}
