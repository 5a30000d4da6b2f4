#![cfg(feature = "cli")]
//! Integration tests for the `fsvis` subcommands.

use byteorder::{ByteOrder, LittleEndian};
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

use fsvis::cli::app::{Cli, Commands};
use fsvis::cli::describe::{self, DescribeOptions};
use fsvis::cli::dump::{self, DumpOptions};
use fsvis::cli::layout::{self, LayoutOptions};
use fsvis::disk::constants::*;
use fsvis::FsvisError;

/// MBR with partition 0 at LBA 2 and an ext2 superblock where it points.
fn write_image() -> NamedTempFile {
    let mut image = vec![0u8; 4096];
    let entry = MBR_PARTITION_TABLE;
    image[entry + PART_BOOT_INDICATOR] = PART_ACTIVE;
    image[entry + PART_TYPE] = 0x83;
    LittleEndian::write_u32(&mut image[entry + PART_START_LBA..], 2);
    LittleEndian::write_u32(&mut image[entry + PART_SECTOR_COUNT..], 4);
    image[MBR_SIGNATURE_OFFSET..MBR_SIZE].copy_from_slice(&MBR_SIGNATURE);

    let sb = 2048;
    LittleEndian::write_u16(&mut image[sb + EXT2_S_MAGIC..], EXT2_MAGIC);
    image[sb + EXT2_S_VOLUME_NAME..sb + EXT2_S_VOLUME_NAME + 4].copy_from_slice(b"data");

    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(&image).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn describe_opts(file: &NamedTempFile, paths: &[&str], json: bool, mmap: bool) -> DescribeOptions {
    DescribeOptions {
        file: file.path().to_str().unwrap().to_string(),
        offset: 0,
        schema: "mbr".to_string(),
        paths: paths.iter().map(|p| p.to_string()).collect(),
        json,
        mmap,
    }
}

#[test]
fn test_describe_root_text() {
    colored::control::set_override(false);
    let tmp = write_image();
    let mut output = Vec::new();
    describe::execute(&describe_opts(&tmp, &[], false, true), &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("MBR  0..512"));
    assert!(text.contains("0x83 (Linux)"));
    assert!(text.contains("-> 1.4"));
    assert!(text.contains("55aa"));
}

#[test]
fn test_describe_follows_link() {
    colored::control::set_override(false);
    let tmp = write_image();
    let mut output = Vec::new();
    describe::execute(&describe_opts(&tmp, &["1.4"], false, false), &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("ext2 superblock  2048..3072"));
    assert!(text.contains("(via 1.4)"));
    assert!(text.contains("0xef53"));
    assert!(text.contains("data"));
}

#[test]
fn test_describe_follows_link_shown_under_partition() {
    colored::control::set_override(false);
    let tmp = write_image();
    let mut output = Vec::new();
    describe::execute(&describe_opts(&tmp, &["1"], false, true), &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    let partition = text.split("(via 1)").nth(1).unwrap();
    assert!(partition.contains("-> 4"));
    assert!(!partition.contains("-> 1.4"));

    let mut output = Vec::new();
    describe::execute(&describe_opts(&tmp, &["1", "4"], false, true), &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("ext2 superblock  2048..3072  (via 4)"));
}

#[test]
fn test_describe_json_walk() {
    let tmp = write_image();
    let mut output = Vec::new();
    describe::execute(&describe_opts(&tmp, &["1.4", "1"], true, true), &mut output).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let walk = json.as_array().unwrap();
    assert_eq!(walk.len(), 3);
    assert_eq!(walk[0]["description"], "MBR");
    assert_eq!(walk[1]["offset"], 2048);
    assert_eq!(walk[1]["step"], "1.4");
    assert_eq!(walk[2]["description"], "mount state");
    assert_eq!(walk[2]["subfields"][4]["contents"], "0xef53");
}

#[test]
fn test_describe_bad_path() {
    let tmp = write_image();
    let mut output = Vec::new();
    let err = describe::execute(&describe_opts(&tmp, &["0.x"], false, true), &mut output)
        .unwrap_err();
    assert_eq!(err, FsvisError::InvalidPath("0.x".to_string()));
    assert!(output.is_empty());
}

#[test]
fn test_describe_unknown_schema() {
    let tmp = write_image();
    let mut opts = describe_opts(&tmp, &[], false, true);
    opts.schema = "gpt".to_string();
    let mut output = Vec::new();
    assert!(matches!(
        describe::execute(&opts, &mut output),
        Err(FsvisError::Argument(_))
    ));
}

#[test]
fn test_describe_missing_file() {
    let opts = DescribeOptions {
        file: "/nonexistent/disk.img".to_string(),
        offset: 0,
        schema: "mbr".to_string(),
        paths: Vec::new(),
        json: false,
        mmap: true,
    };
    let mut output = Vec::new();
    assert!(matches!(
        describe::execute(&opts, &mut output),
        Err(FsvisError::Io(_))
    ));
}

#[test]
fn test_dump_signature() {
    let tmp = write_image();
    let mut output = Vec::new();
    let opts = DumpOptions {
        file: tmp.path().to_str().unwrap().to_string(),
        offset: 0,
        schema: "mbr".to_string(),
        path: Some("5".to_string()),
        follow: false,
        raw: false,
        mmap: true,
    };
    dump::execute(&opts, &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Hex dump of signature"));
    assert!(text.contains("510..512"));
    assert!(text.contains("000001fe  55 aa"));
}

#[test]
fn test_dump_raw_followed_superblock() {
    let tmp = write_image();
    let mut output = Vec::new();
    let opts = DumpOptions {
        file: tmp.path().to_str().unwrap().to_string(),
        offset: 0,
        schema: "mbr".to_string(),
        path: Some("1.4".to_string()),
        follow: true,
        raw: true,
        mmap: false,
    };
    dump::execute(&opts, &mut output).unwrap();
    assert_eq!(output.len(), EXT2_SUPERBLOCK_SIZE);
    assert_eq!(&output[EXT2_S_MAGIC..EXT2_S_MAGIC + 2], &[0x53, 0xef]);
}

#[test]
fn test_layout_text() {
    colored::control::set_override(false);
    let mut output = Vec::new();
    let opts = LayoutOptions {
        schema: "mbr".to_string(),
        json: false,
    };
    layout::execute(&opts, &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.starts_with("MBR (512 bytes)"));
    assert!(text.contains("start LBA (link)"));
    let signature = text.lines().find(|l| l.starts_with("5 ")).unwrap();
    assert!(signature.contains("510"));
}

#[test]
fn test_layout_json() {
    let mut output = Vec::new();
    let opts = LayoutOptions {
        schema: "ext2".to_string(),
        json: true,
    };
    layout::execute(&opts, &mut output).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let magic = json
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["path"] == "1.4")
        .unwrap();
    assert_eq!(magic["description"], "magic");
    assert_eq!(magic["offset"], 56);
    assert_eq!(magic["length"], 2);
}

#[test]
fn test_cli_parsing() {
    let cli = Cli::try_parse_from(["fsvis", "--no-mmap", "describe", "-f", "disk.img", "1.4", "1"])
        .unwrap();
    assert!(cli.no_mmap);
    match cli.command {
        Commands::Describe {
            file,
            offset,
            schema,
            paths,
            json,
        } => {
            assert_eq!(file, "disk.img");
            assert_eq!(offset, 0);
            assert_eq!(schema, "mbr");
            assert_eq!(paths, vec!["1.4", "1"]);
            assert!(!json);
        }
        _ => panic!("expected describe"),
    }
}
