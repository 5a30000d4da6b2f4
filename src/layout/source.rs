//! Read-only byte sources backing every [`Structure`](super::structure::Structure).
//!
//! A [`ByteSource`] hands out borrowed slices of an image by absolute offset.
//! There is no cursor: every read is a pure `(offset, length) -> &[u8]` call,
//! so a single source can serve any number of structures, from any number of
//! threads, for as long as it lives.
//!
//! In-memory buffers (`[u8]`, `Vec<u8>`) implement the trait directly. With
//! the `cli` feature, [`MmapSource`] maps an image file read-only so that only
//! the pages a navigation actually touches are faulted in.

use crate::FsvisError;

/// Randomly addressable, read-only byte provider.
pub trait ByteSource: Send + Sync {
    /// Total size of the source in bytes.
    fn len(&self) -> u64;

    /// Borrow exactly `length` bytes starting at `offset`.
    ///
    /// Fails with [`FsvisError::OutOfRange`] when `offset + length` exceeds
    /// [`len`](Self::len). Never truncates or zero-fills.
    fn read(&self, offset: u64, length: usize) -> Result<&[u8], FsvisError>;

    /// Returns true if the source holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bounds-check a read against a source of `size` bytes.
///
/// Returns the `start..end` range as `usize` indices on success.
pub(crate) fn checked_range(
    offset: u64,
    length: usize,
    size: u64,
) -> Result<std::ops::Range<usize>, FsvisError> {
    let out_of_range = || FsvisError::OutOfRange {
        offset,
        length: length as u64,
        size,
    };
    let end = offset.checked_add(length as u64).ok_or_else(out_of_range)?;
    if end > size {
        return Err(out_of_range());
    }
    let start = usize::try_from(offset).map_err(|_| out_of_range())?;
    let end = usize::try_from(end).map_err(|_| out_of_range())?;
    Ok(start..end)
}

impl ByteSource for [u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read(&self, offset: u64, length: usize) -> Result<&[u8], FsvisError> {
        let range = checked_range(offset, length, ByteSource::len(self))?;
        Ok(&self[range])
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> u64 {
        self.as_slice().len() as u64
    }

    fn read(&self, offset: u64, length: usize) -> Result<&[u8], FsvisError> {
        self.as_slice().read(offset, length)
    }
}

/// A disk image mapped read-only into memory.
///
/// The mapping lives as long as this value; structures borrow from it, so the
/// borrow checker keeps the map alive for every structure derived from it.
#[cfg(feature = "cli")]
pub struct MmapSource {
    mmap: memmap2::Mmap,
}

#[cfg(feature = "cli")]
impl MmapSource {
    /// Map an image file read-only.
    ///
    /// # Safety
    ///
    /// The underlying `mmap` call is marked `unsafe` because the mapped file
    /// must not be modified by another process while the mapping is active.
    /// Images are inspected offline, so this holds in practice.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, FsvisError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| FsvisError::Io(format!("Cannot open {}: {}", path.display(), e)))?;

        let mmap = unsafe {
            memmap2::Mmap::map(&file)
                .map_err(|e| FsvisError::Io(format!("Cannot mmap {}: {}", path.display(), e)))?
        };

        log::debug!("mapped {} ({} bytes)", path.display(), mmap.len());
        Ok(MmapSource { mmap })
    }
}

#[cfg(feature = "cli")]
impl ByteSource for MmapSource {
    fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    fn read(&self, offset: u64, length: usize) -> Result<&[u8], FsvisError> {
        let range = checked_range(offset, length, self.len())?;
        Ok(&self.mmap[range])
    }
}

/// Read a whole image file into memory.
///
/// The buffered counterpart of [`MmapSource::open`] for callers that prefer
/// not to map the file.
pub fn read_image<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<u8>, FsvisError> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| FsvisError::Io(format!("Cannot read {}: {}", path.display(), e)))?;
    log::debug!("read {} ({} bytes)", path.display(), data.len());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_in_bounds() {
        let data: Vec<u8> = (0..16).collect();
        assert_eq!(data.read(4, 3).unwrap(), &[4, 5, 6]);
        assert_eq!(data.read(16, 0).unwrap(), &[] as &[u8]);
        assert_eq!(ByteSource::len(&data), 16);
    }

    #[test]
    fn test_read_past_end() {
        let data = vec![0u8; 8];
        assert_eq!(
            data.read(6, 4),
            Err(FsvisError::OutOfRange {
                offset: 6,
                length: 4,
                size: 8
            })
        );
        assert!(data.read(9, 0).is_err());
    }

    #[test]
    fn test_read_offset_overflow() {
        let data = vec![0u8; 8];
        assert!(data.read(u64::MAX, 2).is_err());
    }

    #[test]
    fn test_slice_source() {
        let data = [1u8, 2, 3];
        assert_eq!(ByteSource::read(&data[..], 1, 2).unwrap(), &[2, 3]);
        assert!(!ByteSource::is_empty(&data[..]));
        assert!(ByteSource::read(&data[..], 2, 2).is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_mmap_source() {
        use std::io::Write;

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0xAA; 64]).unwrap();
        tmp.flush().unwrap();

        let source = MmapSource::open(tmp.path()).unwrap();
        assert_eq!(source.len(), 64);
        assert_eq!(source.read(60, 4).unwrap(), &[0xAA; 4]);
        assert!(source.read(62, 4).is_err());
    }

    #[test]
    fn test_read_image_missing() {
        assert!(matches!(
            read_image("/nonexistent/disk.img"),
            Err(FsvisError::Io(_))
        ));
    }
}
