use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use satchel::{ContentPackage, ContentRef, DirContentStore, DirExportStore, Exporter, NamedFile};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "satchel")]
#[command(about = "Satchel CLI - export content packages to portable archives")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export a directory-backed package to a single archive
    Export {
        /// Directory holding the package files
        #[arg(short, long)]
        input: PathBuf,

        /// Destination directory for finished archives
        #[arg(short, long)]
        output: PathBuf,

        /// Package kind (selects the archive extension)
        #[arg(short, long, value_enum, default_value_t = Kind::Beatmap)]
        kind: Kind,

        /// Display name for the package (defaults to the input directory name)
        #[arg(long)]
        name: Option<String>,

        /// Skip revealing the finished archive in the file browser
        #[arg(long)]
        no_reveal: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Beatmap,
    Skin,
    Replay,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            kind,
            name,
            no_reveal,
        } => run_export(&input, &output, kind, name, no_reveal),
    }
}

fn run_export(
    input: &Path,
    output: &Path,
    kind: Kind,
    name: Option<String>,
    no_reveal: bool,
) -> Result<()> {
    if !input.is_dir() {
        bail!("input {:?} is not a directory", input);
    }

    let display_name = match name {
        Some(n) => n,
        None => input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("cannot derive a package name from the input path")?,
    };

    let mut files = Vec::new();
    collect_files(input, input, &mut files)
        .with_context(|| format!("failed to enumerate {:?}", input))?;
    if files.is_empty() {
        bail!("input {:?} contains no files", input);
    }

    tracing::info!("Exporting {:?} ({} files)", display_name, files.len());

    let package = ContentPackage::new(display_name, files);
    let content = DirContentStore::new(input);
    let exports = DirExportStore::new(output)?;
    let exporter = match kind {
        Kind::Beatmap => Exporter::beatmap(content, exports),
        Kind::Skin => Exporter::skin(content, exports),
        Kind::Replay => Exporter::replay(content, exports),
    };

    let path = if no_reveal {
        exporter.export_without_reveal(&package)?
    } else {
        exporter.export(&package)?
    };

    println!("Export complete: {}", path.display());
    Ok(())
}

/// Walk `dir` collecting files as archive entries named by their
/// `/`-separated path relative to `root`.
fn collect_files(root: &Path, dir: &Path, files: &mut Vec<NamedFile>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(root, &path, files)?;
        } else {
            let relative = path
                .strip_prefix(root)
                .context("walked path escaped the input root")?;
            let logical = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push(NamedFile::new(logical.clone(), ContentRef::new(logical)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_uses_slash_separated_names() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("sfx/normal")).unwrap();
        fs::write(temp.path().join("map.osu"), b"x").unwrap();
        fs::write(temp.path().join("sfx/normal/hit.wav"), b"y").unwrap();

        let mut files = Vec::new();
        collect_files(temp.path(), temp.path(), &mut files).unwrap();
        let mut names: Vec<_> = files.iter().map(|f| f.filename.clone()).collect();
        names.sort();

        assert_eq!(names, vec!["map.osu", "sfx/normal/hit.wav"]);
    }

    #[test]
    fn test_export_end_to_end() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("pkg");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("map.osu"), b"osu file format").unwrap();

        run_export(
            &input,
            &temp.path().join("exports"),
            Kind::Beatmap,
            Some("My Beatmap".into()),
            true,
        )
        .unwrap();

        assert!(temp.path().join("exports/My Beatmap.osz").exists());
    }
}
