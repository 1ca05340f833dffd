use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use std::{error, process};

use arith_codec_core::{
    compress_bytes, decompress_bytes, required_precision, Archive, CoderParams,
};
use clap::Parser;

/// Extension given to compressed archives
const ARCHIVE_SUFFIX: &str = ".arith.json";

/// Command line argument parser
#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct MyArgs {
    /// Path to a single file to compress (or to an `.arith.json` archive,
    /// with --decompress)
    #[clap(short, long)]
    pub(crate) input: Option<PathBuf>,

    /// Compress every regular file in this directory (non-recursive),
    /// skipping existing archives
    #[clap(short, long)]
    pub(crate) all: Option<PathBuf>,

    /// Directory to write outputs into. Defaults to the source file's
    /// directory
    #[clap(short, long)]
    pub(crate) outdir: Option<PathBuf>,

    /// Decompress instead of compressing
    #[clap(short, long, action)]
    pub(crate) decompress: bool,

    /// Suppress per-file reporting
    #[clap(short, long, action)]
    pub(crate) quiet: bool,
}

fn main() -> Result<(), Box<dyn error::Error>> {
    let args: MyArgs = MyArgs::parse();
    let params = CoderParams::default();

    let stdout = io::stdout();
    let mut handle = io::BufWriter::new(stdout.lock());

    match (&args.input, &args.all) {
        (Some(path), None) => {
            if args.decompress {
                decompress_file(path, args.outdir.as_deref(), &params, args.quiet, &mut handle)?;
            } else {
                compress_file(path, args.outdir.as_deref(), &params, args.quiet, &mut handle)?;
            }
        }
        (None, Some(dir)) => {
            compress_all_in_dir(dir, args.outdir.as_deref(), &params, args.quiet, &mut handle)?;
        }
        _ => {
            eprintln!("specify exactly one of --input <FILE> or --all <DIR>");
            process::exit(2);
        }
    }

    handle.flush()?;
    Ok(())
}

/// Compress one file into a sibling (or `outdir`) archive, reporting the
/// alphabet, derived precision and timing.
fn compress_file<W: Write>(
    path: &Path,
    outdir: Option<&Path>,
    params: &CoderParams,
    quiet: bool,
    handle: &mut W,
) -> Result<PathBuf, Box<dyn error::Error>> {
    let data = fs::read(path)?;

    let start = Instant::now();
    let archive = compress_bytes(&data, params)?;
    let elapsed = start.elapsed();

    let out_path = output_path(path, outdir, ARCHIVE_SUFFIX)?;
    let writer = io::BufWriter::new(fs::File::create(&out_path)?);
    archive.write_to(writer)?;

    if !quiet {
        let precision = required_precision(&archive.distribution, archive.length, params);
        writeln!(handle, "{}", path.display())?;
        writeln!(handle, "\tInput size: {} bytes", data.len())?;
        writeln!(handle, "\tAlphabet size: {}", archive.symbols.len())?;
        writeln!(handle, "\tPrecision: {precision} bits")?;
        writeln!(handle, "\tEncoded in {:.4} s", elapsed.as_secs_f64())?;
        let compressed_size = fs::metadata(&out_path)?.len();
        writeln!(handle, "\tArchive size: {compressed_size} bytes")?;
        writeln!(handle, "\tWrote {}", out_path.display())?;
    }

    Ok(out_path)
}

/// Decompress one archive back to bytes, writing `<stem>.decoded`.
fn decompress_file<W: Write>(
    path: &Path,
    outdir: Option<&Path>,
    params: &CoderParams,
    quiet: bool,
    handle: &mut W,
) -> Result<PathBuf, Box<dyn error::Error>> {
    let reader = io::BufReader::new(fs::File::open(path)?);
    let archive = Archive::read_from(reader)?;

    let start = Instant::now();
    let data = decompress_bytes(&archive, params)?;
    let elapsed = start.elapsed();

    let out_path = output_path(path, outdir, ".decoded")?;
    fs::write(&out_path, &data)?;

    if !quiet {
        writeln!(handle, "{}", path.display())?;
        writeln!(handle, "\tDecoded {} bytes in {:.4} s", data.len(), elapsed.as_secs_f64())?;
        writeln!(handle, "\tWrote {}", out_path.display())?;
    }

    Ok(out_path)
}

/// Compress every regular file in a directory, non-recursive. Per-file
/// failures are reported and skipped rather than aborting the batch.
fn compress_all_in_dir<W: Write>(
    dir: &Path,
    outdir: Option<&Path>,
    params: &CoderParams,
    quiet: bool,
    handle: &mut W,
) -> Result<Vec<PathBuf>, Box<dyn error::Error>> {
    let mut out_paths = Vec::new();
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        if !path.is_file() || path.to_string_lossy().ends_with(ARCHIVE_SUFFIX) {
            continue;
        }
        match compress_file(&path, outdir, params, quiet, handle) {
            Ok(out) => out_paths.push(out),
            Err(e) => eprintln!("failed to compress {}: {e}", path.display()),
        }
    }

    if !quiet {
        writeln!(handle, "Compressed {} file(s)", out_paths.len())?;
    }
    Ok(out_paths)
}

/// Place `<stem><suffix>` next to the source, or in `outdir` if given.
fn output_path(
    path: &Path,
    outdir: Option<&Path>,
    suffix: &str,
) -> Result<PathBuf, Box<dyn error::Error>> {
    let name = path
        .file_name()
        .ok_or_else(|| format!("{} has no file name", path.display()))?
        .to_string_lossy()
        .into_owned();
    let stem = match name.strip_suffix(ARCHIVE_SUFFIX) {
        Some(stripped) => stripped.to_string(),
        None => path
            .file_stem()
            .unwrap_or(path.as_os_str())
            .to_string_lossy()
            .into_owned(),
    };
    let file_name = format!("{stem}{suffix}");

    let folder = match outdir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            dir.to_path_buf()
        }
        None => path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
    };
    Ok(folder.join(file_name))
}
