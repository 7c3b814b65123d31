//! Main entry point for the zipmap CLI application.
//!
//! This binary provides an unzip-style command-line interface on top of
//! the memory-mapped archive reader.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Component, Path, PathBuf};
use tracing_subscriber::EnvFilter;

use zipmap::{Cli, ZipArchive, ZipEntry, ZipExtractor};

/// Application entry point.
///
/// Parses command-line arguments, opens the archive and dispatches to the
/// listing or extraction handler. The archive is closed explicitly so that
/// the mapping is released before the process reports success.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let archive = ZipArchive::open_with(&cli.file, cli.load_options())
        .with_context(|| format!("cannot open {}", cli.file))?;
    let extractor = ZipExtractor::new(archive);

    process_zip(&extractor, &cli).await?;

    extractor.close()?;
    Ok(())
}

/// Process a ZIP archive based on CLI options.
///
/// This function handles the comment, listing and extraction modes:
/// - Comment mode (`-z`): Print the archive comment
/// - List mode (`-l` or `-v`): Display archive contents
/// - Extract mode: Extract files matching the specified filters
async fn process_zip(extractor: &ZipExtractor, cli: &Cli) -> Result<()> {
    if cli.comment {
        println!("{}", String::from_utf8_lossy(extractor.archive().comment()));
        return Ok(());
    }

    // List mode: display archive contents and exit
    if cli.list || cli.verbose {
        list_files(extractor, cli.verbose);
        return Ok(());
    }

    // Apply filters to determine which files to extract:
    // 1. If specific files are requested, only include matching entries
    // 2. Exclude files matching the exclusion patterns
    // Directories never appear in the entry list; they are created on demand.
    let files_to_extract: Vec<_> = extractor
        .list_files()
        .iter()
        .filter(|e| {
            if !cli.files.is_empty() {
                let matches = cli.files.iter().any(|f| {
                    if has_glob_chars(f) {
                        glob_match(f, e.name())
                    } else {
                        // No wildcards: exact match on filename or full path
                        let basename = Path::new(e.name())
                            .file_name()
                            .map(|s| s.to_string_lossy())
                            .unwrap_or_default();
                        e.name() == f.as_str() || basename == *f
                    }
                });
                if !matches {
                    return false;
                }
            }

            !cli
                .exclude
                .iter()
                .any(|x| e.name().contains(x.as_str()) || glob_match(x, e.name()))
        })
        .collect();

    // Extract each matching file
    let multiple_files = cli.pipe && files_to_extract.len() > 1;
    for entry in files_to_extract {
        extract_file(extractor, entry, cli, multiple_files)
            .await
            .with_context(|| format!("cannot extract {}", entry.name()))?;
    }

    Ok(())
}

/// List files in the ZIP archive.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just file names, one per line
/// - Verbose format (`-v`): Table with size, compressed size, ratio and method
fn list_files(extractor: &ZipExtractor, verbose: bool) {
    let entries = extractor.list_files();

    if verbose {
        println!(
            "{:>10}  {:>10}  {:>5}  {:>7}  Name",
            "Length", "Size", "Cmpr", "Method"
        );
        println!("{}", "-".repeat(60));
    }

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;

    for entry in entries {
        if verbose {
            println!(
                "{:>10}  {:>10}  {}  {:>7}  {}",
                entry.size(),
                entry.compressed_size(),
                ratio(entry.compressed_size(), entry.size()),
                method_name(entry),
                entry.name()
            );
            total_uncompressed += entry.size();
            total_compressed += entry.compressed_size();
        } else {
            println!("{}", entry.name());
        }
    }

    if verbose {
        println!("{}", "-".repeat(60));
        println!(
            "{:>10}  {:>10}  {}  {:>7}  {} files",
            total_uncompressed,
            total_compressed,
            ratio(total_compressed, total_uncompressed),
            "",
            entries.len()
        );
    }
}

/// Compression ratio as percentage saved.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        "  0%".to_string()
    }
}

fn method_name(entry: &ZipEntry) -> String {
    match entry.compression_method() {
        zipmap::CompressionMethod::Stored => "Stored".to_string(),
        zipmap::CompressionMethod::Deflate => "Defl:N".to_string(),
        zipmap::CompressionMethod::Unknown(code) => format!("Unk:{code:03}"),
    }
}

/// Extract a single file from the archive.
///
/// Handles various extraction options:
/// - Pipe mode (`-p`): Write to stdout instead of file
/// - Custom output directory (`-d`): Extract to specified directory
/// - Junk paths (`-j`): Ignore directory structure in archive
/// - Overwrite control (`-n`, `-o`): Handle existing files
async fn extract_file(
    extractor: &ZipExtractor,
    entry: &ZipEntry,
    cli: &Cli,
    show_filename: bool,
) -> Result<()> {
    if cli.pipe {
        if show_filename {
            println!("--- {} ---", entry.name());
        }
        return Ok(extractor.extract_to_stdout(entry).await?);
    }

    let Some(output_path) = output_path(entry.name(), cli) else {
        if !cli.is_very_quiet() {
            eprintln!("Skipping: {} (unsafe path)", entry.name());
        }
        return Ok(());
    };

    // Handle existing files based on overwrite options
    if output_path.exists() && (cli.never_overwrite || !cli.overwrite) {
        if !cli.is_very_quiet() {
            let hint = if cli.never_overwrite {
                "file exists"
            } else {
                "use -o to overwrite"
            };
            eprintln!("Skipping: {} ({hint})", entry.name());
        }
        return Ok(());
    }

    if !cli.is_quiet() {
        println!("  extracting: {}", entry.name());
    }

    extractor.extract_to_file(entry, &output_path).await?;

    Ok(())
}

/// Where the entry called `name` lands on disk, honoring `-d` and `-j`.
///
/// Returns `None` for names that would escape the extraction directory.
fn output_path(name: &str, cli: &Cli) -> Option<PathBuf> {
    let relative = contained_path(name)?;
    let relative = if cli.junk_paths {
        // Junk paths: use only the base filename, ignore directory structure
        PathBuf::from(relative.file_name()?)
    } else {
        relative
    };

    Some(match cli.extract_dir {
        Some(ref dir) => PathBuf::from(dir).join(relative),
        None => relative,
    })
}

/// `name` as a relative path made only of normal components.
///
/// Absolute names, drive prefixes and `..` are rejected rather than
/// stripped; `.` components are dropped.
fn contained_path(name: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!path.as_os_str().is_empty()).then_some(path)
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            // Star matches zero characters, or one and stays for more
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}
