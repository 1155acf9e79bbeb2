//! notice-check CLI
//!
//! Fails when the checked-in NOTICE file differs from the generated one.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use notice_check_core::{CheckError, Document, TextEncoding};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod config;
mod logging;
mod report;

use config::Config;
use report::Report;

const EXIT_MISMATCH: u8 = 1;
const EXIT_FAILURE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "notice-check", version)]
#[command(about = "Verify that the NOTICE file matches the generated one", long_about = None)]
struct Cli {
    /// Generated notice contents (`-` for stdin)
    #[arg(long, value_name = "PATH")]
    expected: PathBuf,

    /// Checked-in NOTICE file [default: NOTICE]
    #[arg(long, value_name = "PATH")]
    notice: Option<PathBuf>,

    /// Directory for the expected artifact [default: target]
    #[arg(long, value_name = "DIR")]
    build_dir: Option<PathBuf>,

    /// File name of the expected artifact [default: NOTICE.expected]
    #[arg(long, value_name = "NAME")]
    expected_name: Option<String>,

    /// Character encoding of both files [default: UTF-8]
    #[arg(long, value_name = "CHARSET")]
    encoding: Option<TextEncoding>,

    /// Skip the diff when either file has more lines than this
    #[arg(long, value_name = "N")]
    max_diff_lines: Option<usize>,

    /// Config file [default: ./notice-check.toml]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format for the report on stdout
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Config {
        Config {
            notice_file: self.notice.clone(),
            build_dir: self.build_dir.clone(),
            expected_file_name: self.expected_name.clone(),
            encoding: self.encoding,
            max_diff_lines: self.max_diff_lines,
        }
    }
}

fn read_expected(source: &Path, encoding: TextEncoding) -> Result<Document> {
    let bytes = if source == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read expected NOTICE contents from stdin")?;
        buf
    } else {
        std::fs::read(source).with_context(|| {
            format!("Failed to read expected NOTICE contents from {}", source.display())
        })?
    };
    Ok(Document::from_bytes(&bytes, encoding))
}

fn print_report(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = Config::load(cli.config.as_deref(), &cwd)?.merged(cli.overrides());

    let expected = read_expected(&cli.expected, config.encoding())?;
    let check = config.to_check();

    match check.run(&expected) {
        Ok(()) => {
            if cli.format == Format::Json {
                print_report(&Report::up_to_date(check.notice_file()))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(CheckError::ContentMismatch(mismatch)) => {
            if cli.format == Format::Json {
                print_report(&Report::from_mismatch(&mismatch))?;
            }
            Ok(ExitCode::from(EXIT_MISMATCH))
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
