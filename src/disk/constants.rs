//! MBR and ext2 on-disk constants.
//!
//! Values follow the classic IBM PC partition table layout and the ext2
//! superblock as documented in the Linux kernel (`include/linux/ext2_fs.h`).
//!
//! Schemas never place fields by offset; their layout is derived from field
//! lengths. The `PART_*` offsets size the partition entry fields, and the
//! `EXT2_S_*` offsets are reference values that the superblock schema is
//! checked against when it is built (and that callers use to craft images).

// Sectors
pub const SECTOR_SIZE: u64 = 512;

// Master boot record (512 bytes total)
pub const MBR_SIZE: usize = 512;
pub const MBR_CODE_SIZE: usize = 446; // bootstrap code area
pub const MBR_PARTITION_TABLE: usize = 446; // offset of the first entry
pub const MBR_PARTITION_COUNT: usize = 4;
pub const MBR_PARTITION_ENTRY_SIZE: usize = 16;
pub const MBR_SIGNATURE_OFFSET: usize = 510;
pub const MBR_SIGNATURE: [u8; 2] = [0x55, 0xaa];

// Partition entry (16 bytes, offsets within the entry)
pub const PART_BOOT_INDICATOR: usize = 0; // 1 byte - 0x80 = active
pub const PART_START_CHS: usize = 1; // 3 bytes
pub const PART_TYPE: usize = 4; // 1 byte - system id
pub const PART_END_CHS: usize = 5; // 3 bytes
pub const PART_START_LBA: usize = 8; // 4 bytes LE - first sector
pub const PART_SECTOR_COUNT: usize = 12; // 4 bytes LE - number of sectors

pub const PART_ACTIVE: u8 = 0x80;

// ext2 superblock (1024 bytes, 1024 bytes into the partition)
pub const EXT2_SUPERBLOCK_OFFSET: u64 = 1024;
pub const EXT2_SUPERBLOCK_SIZE: usize = 1024;
pub const EXT2_MAGIC: u16 = 0xef53;
pub const EXT2_S_INODES_COUNT: usize = 0; // 4 bytes
pub const EXT2_S_BLOCKS_COUNT: usize = 4; // 4 bytes
pub const EXT2_S_LOG_BLOCK_SIZE: usize = 24; // 4 bytes - block size = 1024 << n
pub const EXT2_S_MAGIC: usize = 56; // 2 bytes
pub const EXT2_S_STATE: usize = 58; // 2 bytes
pub const EXT2_S_REV_LEVEL: usize = 76; // 4 bytes
pub const EXT2_S_UUID: usize = 104; // 16 bytes
pub const EXT2_S_VOLUME_NAME: usize = 120; // 16 bytes
pub const EXT2_S_LAST_MOUNTED: usize = 136; // 64 bytes
pub const EXT2_S_RESERVED: usize = 264; // 760 bytes of padding to the end
