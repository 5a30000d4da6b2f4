use std::io::Write;

use colored::Colorize;

use crate::cli::{root_schema, wprintln};
use crate::FsvisError;

pub struct LayoutOptions {
    pub schema: String,
    pub json: bool,
}

/// Print every node of a schema with the offset and length the layout
/// algebra derives for it. No image is read.
pub fn execute(opts: &LayoutOptions, writer: &mut dyn Write) -> Result<(), FsvisError> {
    let schema = root_schema(&opts.schema)?;
    let entries = schema.entries();

    if opts.json {
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| FsvisError::Io(format!("Cannot serialize JSON: {}", e)))?;
        wprintln!(writer, "{}", json)?;
        return Ok(());
    }

    wprintln!(
        writer,
        "{} ({} bytes)",
        schema.description().bold(),
        schema.length()
    )?;
    wprintln!(
        writer,
        "{:<10} {:>8} {:>8}  {}",
        "PATH",
        "OFFSET",
        "LENGTH",
        "DESCRIPTION"
    )?;
    for entry in &entries {
        let label = format!("{}{}", "  ".repeat(entry.depth), entry.description);
        let marker = if entry.link {
            " (link)".cyan().to_string()
        } else {
            String::new()
        };
        wprintln!(
            writer,
            "{:<10} {:>8} {:>8}  {}{}",
            entry.path.to_string(),
            entry.offset,
            entry.length,
            label,
            marker
        )?;
    }

    Ok(())
}
