//! CLI subcommand implementations for the `fsvis` binary.
//!
//! The `fsvis` binary is the presentation layer over the [`layout`](crate::layout)
//! engine: it opens a disk image, binds a bundled root schema at an offset,
//! and renders what it finds. CLI argument parsing uses clap derive macros,
//! with the top-level [`app::Cli`] struct and [`app::Commands`] enum defined in
//! [`app`] and shared between `main.rs` and `build.rs` (for man page
//! generation) via `include!()`.
//!
//! Each subcommand module follows the same pattern: an `Options` struct holding
//! the parsed arguments and a `pub fn execute(opts, writer) -> Result<(), FsvisError>`
//! entry point. The `writer: &mut dyn Write` parameter allows output to be
//! captured in tests or redirected to a file via the global `--output` flag.
//!
//! # Subcommands
//!
//! | Command | Module | Purpose |
//! |---------|--------|---------|
//! | `fsvis describe` | [`describe`] | Render the root structure, then each structure reached by following path components |
//! | `fsvis dump` | [`dump`] | Hex dump of the bytes of a single node |
//! | `fsvis layout` | [`layout`] | Offsets and lengths derived from a schema, no image needed |
//!
//! The `wprintln!` macro wraps `writeln!` to convert `io::Error` into
//! `FsvisError`.

pub mod app;
pub mod describe;
pub mod dump;
pub mod layout;

/// Write a line to the given writer, converting io::Error to FsvisError.
macro_rules! wprintln {
    ($w:expr) => {
        writeln!($w).map_err(|e| $crate::FsvisError::Io(e.to_string()))
    };
    ($w:expr, $($arg:tt)*) => {
        writeln!($w, $($arg)*).map_err(|e| $crate::FsvisError::Io(e.to_string()))
    };
}

pub(crate) use wprintln;

use crate::disk;
use crate::layout::group::FieldGroup;
use crate::layout::source::{read_image, ByteSource, MmapSource};
use crate::FsvisError;

/// A disk image opened for reading, mapped or buffered.
pub enum Image {
    Mapped(MmapSource),
    Buffered(Vec<u8>),
}

impl ByteSource for Image {
    fn len(&self) -> u64 {
        match self {
            Image::Mapped(map) => map.len(),
            Image::Buffered(data) => ByteSource::len(data),
        }
    }

    fn read(&self, offset: u64, length: usize) -> Result<&[u8], FsvisError> {
        match self {
            Image::Mapped(map) => map.read(offset, length),
            Image::Buffered(data) => data.read(offset, length),
        }
    }
}

/// Open a disk image, selecting mmap or buffered I/O based on the flag.
pub(crate) fn open_image(path: &str, use_mmap: bool) -> Result<Image, FsvisError> {
    if use_mmap {
        MmapSource::open(path).map(Image::Mapped)
    } else {
        read_image(path).map(Image::Buffered)
    }
}

/// Resolve a `--schema` argument to a bundled root schema.
pub(crate) fn root_schema(name: &str) -> Result<&'static FieldGroup, FsvisError> {
    disk::schema_by_name(name).ok_or_else(|| {
        FsvisError::Argument(format!(
            "Unknown schema {:?} (expected \"mbr\" or \"ext2\")",
            name
        ))
    })
}
