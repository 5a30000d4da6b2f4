//! Declarative decoding and navigation of fixed-layout on-disk structures.
//!
//! The `fs-visualize` crate (library name `fsvis`) describes binary layouts
//! such as an MBR partition table or an ext2 superblock as static schemas,
//! binds them to byte ranges of a raw disk image, and lets callers render,
//! walk, and dereference them without copying the image into memory.
//!
//! # Library API
//!
//! ```toml
//! [dependencies]
//! fsvis = { package = "fs-visualize", version = "0.3" }
//! ```
//!
//! ## Quick example
//!
//! ```
//! use fsvis::disk::mbr;
//! use fsvis::layout::structure::Structure;
//!
//! // A blank 4 KiB image with partition 0 starting at LBA 2.
//! let mut image = vec![0u8; 4096];
//! image[454..458].copy_from_slice(&2u32.to_le_bytes());
//!
//! let root = Structure::from_offset(mbr::schema(), &image, 0).unwrap();
//! let lba = root.sub_struct("1.4").unwrap();
//! assert_eq!(lba.offset(), 454);
//!
//! let superblock = lba.dereference().unwrap();
//! assert_eq!(superblock.offset(), 2 * 512 + 1024);
//! ```
//!
//! ## Key entry points
//!
//! | Type / Function | Purpose |
//! |-----------------|---------|
//! | [`ByteSource`](layout::source::ByteSource) | Read-only random access to an image |
//! | [`Field`](layout::field::Field) | Fixed-length leaf with formatter and optional link |
//! | [`FieldGroup`](layout::group::FieldGroup) | Ordered children with size-derived offsets |
//! | [`Structure`](layout::structure::Structure) | A schema bound to bytes: describe, index, navigate, dereference |
//! | [`Path`](layout::path::Path) | Dot-separated child indices (`"1.4"`) |
//! | [`disk::mbr::schema`] | Master boot record layout |
//! | [`disk::ext2::superblock`] | ext2 superblock layout |
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`layout`] | Schema model, formatters, interpreters, bound structures |
//! | [`disk`] | Bundled MBR and ext2 schemas |
//! | [`util`] | Hex formatting helpers |
//! | `cli` | `fsvis` subcommands (requires the `cli` feature) |
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | on | Builds the `fsvis` binary, memory-mapped image sources, and terminal output. |

#[cfg(feature = "cli")]
pub mod cli;
pub mod disk;
pub mod layout;
pub mod util;

use thiserror::Error;

/// Errors returned by `fsvis` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsvisError {
    /// A read or dereference would run past the end of the byte range.
    #[error("Out of range: {length} bytes at offset {offset} exceed size {size}")]
    OutOfRange { offset: u64, length: u64, size: u64 },

    /// A navigation index is outside the current schema's child count.
    #[error("Index {index} out of range for {count} children")]
    Index { index: usize, count: usize },

    /// A path segment is not a well-formed non-negative integer.
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    /// Dereference was requested on a node that does not carry a link.
    #[error("Not a link: {0}")]
    NotALink(String),

    /// Indexing was requested on a terminal field.
    #[error("Not indexable: {0}")]
    NotIndexable(String),

    /// An I/O error occurred (image open, map, or output write failure).
    #[error("I/O error: {0}")]
    Io(String),

    /// An invalid argument was supplied (unknown schema name, bad option, etc.).
    #[error("Invalid argument: {0}")]
    Argument(String),
}
