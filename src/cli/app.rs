use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "fsvis")]
#[command(about = "Decode and navigate on-disk structures in a raw disk image")]
#[command(version)]
pub struct Cli {
    /// Control colored output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Read the image into memory instead of memory-mapping it
    #[arg(long = "no-mmap", global = true)]
    pub no_mmap: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Describe the root structure and each structure reached along a path
    Describe {
        /// Path to the raw disk image
        #[arg(short, long)]
        file: String,

        /// Byte offset of the root structure
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Root schema (mbr or ext2)
        #[arg(short, long, default_value = "mbr")]
        schema: String,

        /// Path components to follow, each like 1.4 (links are dereferenced)
        paths: Vec<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Hex dump of the bytes of one node
    Dump {
        /// Path to the raw disk image
        #[arg(short, long)]
        file: String,

        /// Byte offset of the root structure
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Root schema (mbr or ext2)
        #[arg(short, long, default_value = "mbr")]
        schema: String,

        /// Path of the node to dump (default: the whole root)
        path: Option<String>,

        /// Dereference the node if it is a link and dump the target
        #[arg(long)]
        follow: bool,

        /// Output raw binary bytes (no formatting)
        #[arg(long)]
        raw: bool,
    },

    /// Show the offset and length of every node in a schema
    Layout {
        /// Schema to lay out (mbr or ext2)
        #[arg(short, long, default_value = "mbr")]
        schema: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}
