//! ext2 superblock layout.
//!
//! The superblock always sits 1024 bytes into the filesystem and spans 1024
//! bytes. Fields are little-endian. The schema groups them the way the kernel
//! header does: the revision 0 counters, mount bookkeeping, the
//! `EXT2_DYNAMIC_REV` extension, preallocation hints, journaling (ext3),
//! directory indexing, and mount options, followed by reserved padding.

use std::sync::{Arc, OnceLock};

use crate::disk::constants::*;
use crate::layout::field::Field;
use crate::layout::format::{Endian, Hex, Named, Text, Uuid};
use crate::layout::group::FieldGroup;

const STATE_NAMES: &[(u128, &str)] = &[(1, "clean"), (2, "errors")];

const ERRORS_NAMES: &[(u128, &str)] = &[(1, "continue"), (2, "remount read-only"), (3, "panic")];

const CREATOR_OS_NAMES: &[(u128, &str)] = &[
    (0, "Linux"),
    (1, "Hurd"),
    (2, "Masix"),
    (3, "FreeBSD"),
    (4, "Lites"),
];

const REV_LEVEL_NAMES: &[(u128, &str)] = &[(0, "good old"), (1, "dynamic")];

const HASH_VERSION_NAMES: &[(u128, &str)] = &[
    (0, "legacy"),
    (1, "half MD4"),
    (2, "tea"),
    (3, "legacy unsigned"),
    (4, "half MD4 unsigned"),
    (5, "tea unsigned"),
];

fn named(description: &'static str, length: usize, names: &'static [(u128, &'static str)]) -> Field {
    Field::new(
        description,
        length,
        Named {
            endian: Endian::Little,
            names,
        },
    )
}

/// Little-endian integer shown as hex, for magic numbers and flag words.
fn format_le_hex(raw: &[u8]) -> String {
    match Endian::Little.decode(raw) {
        Some(value) => format!("0x{:0width$x}", value, width = raw.len() * 2),
        None => crate::util::hex::format_bytes(raw),
    }
}

/// `s_log_block_size` with the block size it encodes.
fn format_log_block_size(raw: &[u8]) -> String {
    match Endian::Little.decode(raw) {
        Some(shift) if shift < 22 => format!("{} ({} bytes)", shift, 1024u64 << shift),
        Some(shift) => shift.to_string(),
        None => crate::util::hex::format_bytes(raw),
    }
}

fn counts() -> FieldGroup {
    FieldGroup::new(
        "counts",
        vec![
            Field::le("inodes count", 4).into(),
            Field::le("blocks count", 4).into(),
            Field::le("reserved blocks count", 4).into(),
            Field::le("free blocks count", 4).into(),
            Field::le("free inodes count", 4).into(),
            Field::le("first data block", 4).into(),
            Field::new("log block size", 4, format_log_block_size).into(),
            Field::le("log fragment size", 4).into(),
            Field::le("blocks per group", 4).into(),
            Field::le("fragments per group", 4).into(),
            Field::le("inodes per group", 4).into(),
        ],
    )
}

fn mount_state() -> FieldGroup {
    FieldGroup::new(
        "mount state",
        vec![
            Field::le("mount time", 4).into(),
            Field::le("write time", 4).into(),
            Field::le("mount count", 2).into(),
            Field::le("max mount count", 2).into(),
            Field::new("magic", 2, format_le_hex).into(),
            named("state", 2, STATE_NAMES).into(),
            named("errors", 2, ERRORS_NAMES).into(),
            Field::le("minor revision level", 2).into(),
            Field::le("last check", 4).into(),
            Field::le("check interval", 4).into(),
            named("creator os", 4, CREATOR_OS_NAMES).into(),
            named("revision level", 4, REV_LEVEL_NAMES).into(),
            Field::le("default reserved uid", 2).into(),
            Field::le("default reserved gid", 2).into(),
        ],
    )
}

fn dynamic_rev() -> FieldGroup {
    FieldGroup::new(
        "dynamic revision",
        vec![
            Field::le("first inode", 4).into(),
            Field::le("inode size", 2).into(),
            Field::le("block group number", 2).into(),
            Field::new("compatible features", 4, format_le_hex).into(),
            Field::new("incompatible features", 4, format_le_hex).into(),
            Field::new("read-only compatible features", 4, format_le_hex).into(),
            Field::new("uuid", 16, Uuid).into(),
            Field::new("volume name", 16, Text).into(),
            Field::new("last mounted", 64, Text).into(),
            Field::new("compression algorithms", 4, format_le_hex).into(),
        ],
    )
}

fn performance_hints() -> FieldGroup {
    FieldGroup::new(
        "performance hints",
        vec![
            Field::le("preallocated blocks", 1).into(),
            Field::le("preallocated directory blocks", 1).into(),
            Field::filler("padding", 2).into(),
        ],
    )
}

fn journaling() -> FieldGroup {
    FieldGroup::new(
        "journaling",
        vec![
            Field::new("journal uuid", 16, Uuid).into(),
            Field::le("journal inode", 4).into(),
            Field::le("journal device", 4).into(),
            Field::le("last orphan", 4).into(),
        ],
    )
}

fn directory_indexing() -> FieldGroup {
    FieldGroup::new(
        "directory indexing",
        vec![
            Field::new("hash seed", 16, Hex::ELIDED).into(),
            named("default hash version", 1, HASH_VERSION_NAMES).into(),
            Field::filler("padding", 3).into(),
        ],
    )
}

fn other_options() -> FieldGroup {
    FieldGroup::new(
        "other options",
        vec![
            Field::new("default mount options", 4, format_le_hex).into(),
            Field::le("first meta block group", 4).into(),
        ],
    )
}

/// The 1024-byte superblock, shared as the target of partition links.
pub fn shared_superblock() -> Arc<FieldGroup> {
    static SUPERBLOCK: OnceLock<Arc<FieldGroup>> = OnceLock::new();
    SUPERBLOCK
        .get_or_init(|| {
            let superblock = FieldGroup::new(
                "ext2 superblock",
                vec![
                    counts().into(),
                    mount_state().into(),
                    dynamic_rev().into(),
                    performance_hints().into(),
                    journaling().into(),
                    directory_indexing().into(),
                    other_options().into(),
                    Field::filler("reserved", EXT2_SUPERBLOCK_SIZE - EXT2_S_RESERVED).into(),
                ],
            );
            debug_assert_eq!(superblock.offset_of(7), Ok(EXT2_S_RESERVED));
            debug_assert_eq!(superblock.length(), EXT2_SUPERBLOCK_SIZE);
            Arc::new(superblock)
        })
        .clone()
}

/// The ext2 superblock schema.
pub fn superblock() -> &'static FieldGroup {
    static SUPERBLOCK: OnceLock<Arc<FieldGroup>> = OnceLock::new();
    SUPERBLOCK.get_or_init(shared_superblock)
}
