use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use glob::MatchOptions;
use rayon::prelude::*;

use svgtrim::{CompactMinifier, SvgFile};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

#[derive(Parser)]
#[command(name = "svgtrim")]
#[command(about = "Normalizes SVG files before minification", long_about = None)]
struct Cli {
    /// Input file glob (e.g. "icons/*.svg")
    input: Option<String>,

    /// Explicit output file; only valid when exactly one file matches
    output: Option<PathBuf>,

    /// Keep the originals and write minified files as <name>.min.svg
    #[arg(long)]
    keep: bool,

    /// Verbose error reporting
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!();
    println!("svgtrim");
    println!();

    let Some(input) = &cli.input else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Dotfiles are excluded by requiring literal leading dots;
    // directories are filtered below.
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::default()
    };
    let files: Vec<PathBuf> = glob::glob_with(input, options)
        .with_context(|| format!("invalid glob pattern '{}'", input))?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        println!("{}Warning:{} no files found for input '{}'.", YELLOW, RESET, input);
        return Ok(());
    }

    if files.len() > 1 && cli.output.is_some() {
        bail!("can't use an explicit output file name if more than one file is about to be transformed");
    }

    // Each file is an independent unit of work; one failure never
    // aborts the siblings.
    files.par_iter().for_each(|path| {
        if let Err(err) = process_file(path, &cli) {
            report_error(&err, path, cli.verbose);
        }
    });

    Ok(())
}

fn process_file(path: &Path, cli: &Cli) -> anyhow::Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading input file '{}' failed", path.display()))?;

    let file = SvgFile::new(path, content);
    let result = file.minify(&CompactMinifier)?;

    let out_path = output_path(path, cli);
    fs::write(&out_path, &result.data)
        .with_context(|| format!("writing output file '{}' failed", out_path.display()))?;

    // One whole line per file, so parallel reports don't interleave.
    println!(
        "{}Minified{} {} -> {}{}{}: {}",
        GREEN,
        RESET,
        path.display(),
        YELLOW,
        out_path.display(),
        RESET,
        file.format_savings(result.data.len())
    );

    Ok(())
}

fn output_path(input: &Path, cli: &Cli) -> PathBuf {
    if let Some(output) = &cli.output {
        return output.clone();
    }

    if cli.keep {
        input.with_extension("min.svg")
    } else {
        input.to_path_buf()
    }
}

fn report_error(err: &anyhow::Error, path: &Path, verbose: bool) {
    eprintln!("{}Error in '{}':{} {}", RED, path.display(), RESET, err);
    if verbose {
        eprintln!("{:?}", err);
    }
}
