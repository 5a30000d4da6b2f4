use clap::{Command, CommandFactory};
use clap_complete::{Generator, Shell};
use clap_mangen::Man;
use std::error::Error;
use std::path::{Path, PathBuf};

// Include the CLI definition from the library crate
include!("src/cli/app.rs");

const BIN_NAME: &str = "fsvis";

/// Render `cmd` as a roff man page into `dir/<page>.1`.
fn write_man_page(cmd: Command, page: &str, dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut buf = Vec::new();
    Man::new(cmd).render(&mut buf)?;
    std::fs::write(dir.join(format!("{page}.1")), buf)?;
    Ok(())
}

/// `fsvis.1` plus one `fsvis-<subcommand>.1` page per subcommand.
fn man_pages(dir: &Path) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let cmd = Cli::command();
    for sub in cmd.get_subcommands() {
        let page = format!("{}-{}", BIN_NAME, sub.get_name());
        write_man_page(sub.clone(), &page, dir)?;
    }
    write_man_page(cmd, BIN_NAME, dir)
}

fn completions(dir: &Path) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let mut cmd = Cli::command();
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
        let mut buf = Vec::new();
        clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut buf);
        std::fs::write(dir.join(shell.file_name(BIN_NAME)), buf)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = std::env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/man"));

    man_pages(&out_dir.join("man"))?;
    completions(&out_dir.join("completions"))?;

    println!("cargo:rerun-if-changed=src/cli/app.rs");
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
