//! Bundled schemas for disk images.
//!
//! [`mbr::schema`] describes a master boot record whose partition entries
//! link to the [`ext2::superblock`] of the partition they describe. Both
//! schemas are built once on first use and shared for the life of the
//! process.

pub mod constants;
pub mod ext2;
pub mod mbr;

use crate::layout::group::FieldGroup;

/// Look up a bundled root schema by name (`"mbr"` or `"ext2"`).
pub fn schema_by_name(name: &str) -> Option<&'static FieldGroup> {
    match name {
        "mbr" => Some(mbr::schema()),
        "ext2" | "superblock" => Some(ext2::superblock()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_by_name() {
        assert_eq!(schema_by_name("mbr").unwrap().length(), 512);
        assert_eq!(schema_by_name("ext2").unwrap().length(), 1024);
        assert!(std::ptr::eq(
            schema_by_name("superblock").unwrap(),
            ext2::superblock()
        ));
        assert!(schema_by_name("gpt").is_none());
    }
}
