use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::cli::{open_image, root_schema, wprintln};
use crate::layout::group::{Body, Description};
use crate::layout::structure::Structure;
use crate::util::hex::format_range;
use crate::FsvisError;

/// Options for the describe subcommand.
pub struct DescribeOptions {
    pub file: String,
    pub offset: u64,
    pub schema: String,
    pub paths: Vec<String>,
    pub json: bool,
    pub mmap: bool,
}

/// JSON-serializable view of one structure along the walk.
#[derive(Serialize)]
struct StructureJson {
    /// Path component that led here; empty for the root.
    step: String,
    offset: u64,
    length: usize,
    #[serde(flatten)]
    tree: Description,
}

/// Render the root structure and every structure reached along `paths`.
///
/// The root schema is bound at `--offset`. Each path component (e.g. `1.4`)
/// is resolved relative to the structure produced by the previous one, and a
/// component that lands on a link field is dereferenced, so `describe 1.4`
/// on an MBR shows the MBR followed by the first partition's superblock.
/// Any navigation failure aborts the whole command; nothing is printed for a
/// walk that does not resolve completely.
pub fn execute(opts: &DescribeOptions, writer: &mut dyn Write) -> Result<(), FsvisError> {
    let schema = root_schema(&opts.schema)?;
    let image = open_image(&opts.file, opts.mmap)?;

    let root = Structure::from_offset(schema, &image, opts.offset)?;
    let mut walk = vec![(String::new(), root)];
    for step in &opts.paths {
        let next = walk[walk.len() - 1].1.follow(step)?;
        walk.push((step.clone(), next));
    }

    if opts.json {
        let views: Vec<StructureJson> = walk
            .iter()
            .map(|(step, s)| StructureJson {
                step: step.clone(),
                offset: s.offset(),
                length: s.len(),
                tree: s.describe(),
            })
            .collect();
        let json = serde_json::to_string_pretty(&views)
            .map_err(|e| FsvisError::Io(format!("Cannot serialize JSON: {}", e)))?;
        wprintln!(writer, "{}", json)?;
        return Ok(());
    }

    for (i, (step, s)) in walk.iter().enumerate() {
        if i > 0 {
            wprintln!(writer)?;
        }
        print_heading(writer, step, s)?;
        print_tree(writer, &s.describe(), 1)?;
    }

    Ok(())
}

fn print_heading(writer: &mut dyn Write, step: &str, s: &Structure<'_>) -> Result<(), FsvisError> {
    let range = format_range(s.offset(), s.len() as u64);
    if step.is_empty() {
        wprintln!(writer, "{}  {}", s.description().bold(), range)?;
    } else {
        wprintln!(
            writer,
            "{}  {}  (via {})",
            s.description().bold(),
            range,
            step
        )?;
    }
    wprintln!(writer, "{}", "-".repeat(60))?;
    Ok(())
}

fn print_tree(writer: &mut dyn Write, desc: &Description, depth: usize) -> Result<(), FsvisError> {
    let indent = "  ".repeat(depth);
    match &desc.body {
        Body::Subfields(children) => {
            wprintln!(writer, "{}{}", indent, desc.description.bold())?;
            for child in children {
                print_tree(writer, child, depth + 1)?;
            }
        }
        Body::Contents(contents) => {
            let label_width = 32usize.saturating_sub(indent.len());
            match &desc.link {
                Some(path) => wprintln!(
                    writer,
                    "{}{:<width$} {}  {}",
                    indent,
                    desc.description,
                    contents,
                    format!("-> {}", path).cyan(),
                    width = label_width
                )?,
                None => wprintln!(
                    writer,
                    "{}{:<width$} {}",
                    indent,
                    desc.description,
                    contents,
                    width = label_width
                )?,
            }
        }
    }
    Ok(())
}
