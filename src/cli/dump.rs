use std::io::Write;

use crate::cli::{open_image, root_schema, wprintln};
use crate::layout::structure::Structure;
use crate::util::hex::{format_range, hex_dump};
use crate::FsvisError;

pub struct DumpOptions {
    pub file: String,
    pub offset: u64,
    pub schema: String,
    pub path: Option<String>,
    pub follow: bool,
    pub raw: bool,
    pub mmap: bool,
}

/// Hex dump (or raw copy) of the bytes bound to one node.
pub fn execute(opts: &DumpOptions, writer: &mut dyn Write) -> Result<(), FsvisError> {
    let schema = root_schema(&opts.schema)?;
    let image = open_image(&opts.file, opts.mmap)?;

    let root = Structure::from_offset(schema, &image, opts.offset)?;
    let path = opts.path.as_deref().unwrap_or("");
    let node = if opts.follow {
        root.follow(path)?
    } else {
        root.sub_struct(path)?
    };

    if opts.raw {
        writer
            .write_all(node.content())
            .map_err(|e| FsvisError::Io(format!("Cannot write to stdout: {}", e)))?;
    } else {
        wprintln!(
            writer,
            "Hex dump of {} in {} at {}:",
            node.description(),
            opts.file,
            format_range(node.offset(), node.len() as u64)
        )?;
        wprintln!(writer)?;
        wprintln!(writer, "{}", hex_dump(node.content(), node.offset()))?;
    }

    Ok(())
}
