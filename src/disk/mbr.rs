//! Master boot record layout.
//!
//! The MBR occupies the first 512-byte sector of a disk: 446 bytes of
//! bootstrap code, four 16-byte partition entries, and the `55 aa` boot
//! signature. Each entry's starting LBA is a link to the ext2 superblock of
//! that partition, found `lba * 512 + 1024` bytes into the image.

use std::sync::{Arc, OnceLock};

use crate::disk::constants::*;
use crate::disk::ext2;
use crate::layout::field::{Field, Link};
use crate::layout::format::{Endian, Hex};
use crate::layout::group::{FieldGroup, Node};
use crate::layout::interpret::BlockAddress;

/// Human-readable name of a partition system id.
pub fn partition_type_name(id: u8) -> &'static str {
    match id {
        0x00 => "empty",
        0x01 => "FAT12",
        0x04 | 0x06 | 0x0e => "FAT16",
        0x05 | 0x0f => "extended",
        0x07 => "NTFS/exFAT",
        0x0b | 0x0c => "FAT32",
        0x82 => "Linux swap",
        0x83 => "Linux",
        0x8e => "Linux LVM",
        0xa5 => "FreeBSD",
        0xee => "GPT protective",
        0xef => "EFI system",
        0xfd => "Linux RAID",
        _ => "unknown",
    }
}

fn format_partition_type(raw: &[u8]) -> String {
    match raw.first() {
        Some(&id) => format!("0x{:02x} ({})", id, partition_type_name(id)),
        None => String::new(),
    }
}

fn format_boot_indicator(raw: &[u8]) -> String {
    match raw.first() {
        Some(&PART_ACTIVE) => format!("0x{:02x} (active)", PART_ACTIVE),
        Some(&flag) => format!("0x{:02x}", flag),
        None => String::new(),
    }
}

/// Cylinder/head/sector address packed into 3 bytes.
///
/// Byte 0 is the head, the low 6 bits of byte 1 the sector, and the top 2
/// bits of byte 1 with byte 2 the 10-bit cylinder.
fn format_chs(raw: &[u8]) -> String {
    match *raw {
        [head, sector, cylinder_low] => {
            let sector_num = sector & 0x3f;
            let cylinder = (u16::from(sector & 0xc0) << 2) | u16::from(cylinder_low);
            format!("C/H/S {}/{}/{}", cylinder, head, sector_num)
        }
        _ => crate::util::hex::format_bytes(raw),
    }
}

/// The 16-byte partition entry, shared by all four table slots.
pub fn partition_entry() -> Arc<FieldGroup> {
    static ENTRY: OnceLock<Arc<FieldGroup>> = OnceLock::new();
    ENTRY
        .get_or_init(|| {
            let superblock = Link::new(
                ext2::shared_superblock(),
                BlockAddress::scaled(Endian::Little, SECTOR_SIZE, EXT2_SUPERBLOCK_OFFSET),
            );
            Arc::new(FieldGroup::new(
                "partition",
                vec![
                    Field::new(
                        "boot indicator",
                        PART_START_CHS - PART_BOOT_INDICATOR,
                        format_boot_indicator,
                    )
                    .into(),
                    Field::new("start CHS", PART_TYPE - PART_START_CHS, format_chs).into(),
                    Field::new(
                        "partition type",
                        PART_END_CHS - PART_TYPE,
                        format_partition_type,
                    )
                    .into(),
                    Field::new("end CHS", PART_START_LBA - PART_END_CHS, format_chs).into(),
                    Field::le("start LBA", PART_SECTOR_COUNT - PART_START_LBA)
                        .with_link(superblock)
                        .into(),
                    Field::le(
                        "sector count",
                        MBR_PARTITION_ENTRY_SIZE - PART_SECTOR_COUNT,
                    )
                    .into(),
                ],
            ))
        })
        .clone()
}

/// The 512-byte master boot record.
pub fn schema() -> &'static FieldGroup {
    static MBR: OnceLock<FieldGroup> = OnceLock::new();
    MBR.get_or_init(|| {
        let entry = partition_entry();
        let mut children: Vec<Node> = Vec::with_capacity(MBR_PARTITION_COUNT + 2);
        children.push(Field::hex("code", MBR_CODE_SIZE).into());
        for _ in 0..MBR_PARTITION_COUNT {
            children.push(entry.clone().into());
        }
        children.push(Field::new("signature", MBR_SIGNATURE.len(), Hex::FULL).into());
        let mbr = FieldGroup::new("MBR", children);
        debug_assert_eq!(mbr.offset_of(1), Ok(MBR_PARTITION_TABLE));
        debug_assert_eq!(mbr.offset_of(MBR_PARTITION_COUNT + 1), Ok(MBR_SIGNATURE_OFFSET));
        debug_assert_eq!(mbr.length(), MBR_SIZE);
        mbr
    })
}
