//! zxpack command-line front-end
//!
//! Compresses a file into a Hrust block for ZX Spectrum loaders.
//!
//! ## Usage
//!
//! ```bash
//! # Hrust 2.1 (default); writes <input>.hr21
//! zxpack screen.scr
//!
//! # Hrust 1; writes <input>.HR
//! zxpack --format hrust1 screen.scr
//!
//! # Explicit output path
//! zxpack screen.scr packed.bin
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use zxpack::{Error, Format, Progress};

#[derive(Parser, Debug)]
#[command(name = "zxpack")]
#[command(version)]
#[command(about = "Optimal Hrust compressor for ZX Spectrum data", long_about = None)]
struct Args {
    /// File to compress
    input: PathBuf,

    /// Output path; defaults to the input path plus the format extension
    output: Option<PathBuf>,

    /// Target bitstream format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Hrust2)]
    format: FormatArg,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FormatArg {
    /// Hrust 1 ("HR" header)
    Hrust1,
    /// Hrust 2.1 ("hr21" header)
    Hrust2,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Format {
        match arg {
            FormatArg::Hrust1 => Format::Hrust1,
            FormatArg::Hrust2 => Format::Hrust2,
        }
    }
}

/// Progress sink driving an indicatif bar.
struct BarProgress(ProgressBar);

impl BarProgress {
    fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {percent:>3}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        };
        Self(bar)
    }
}

impl Progress for BarProgress {
    fn report(&mut self, total: usize, done: usize) {
        self.0.set_length(total as u64);
        self.0.set_position(done as u64);
    }

    fn done(&mut self) {
        self.0.finish_and_clear();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("failed to set up logging");
        return ExitCode::from(2);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(match err {
                Error::InputTooLarge { .. } | Error::InputTooSmall { .. } => 3,
                Error::PackedTooLarge { .. } => 4,
                Error::Io(_) => 5,
                Error::Inconsistency { .. } => 6,
            })
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let format: Format = args.format.into();
    let input = std::fs::read(&args.input)?;

    let output_path = args.output.clone().unwrap_or_else(|| {
        let mut name = args.input.as_os_str().to_owned();
        name.push(".");
        name.push(format.extension());
        PathBuf::from(name)
    });

    info!("compressing {} ({} bytes)", args.input.display(), input.len());

    let mut bar = BarProgress::new(args.quiet);
    let started = Instant::now();
    let packed = zxpack::pack_with_progress(&input, format, &mut bar)?;
    let elapsed = started.elapsed();

    let ratio = packed.len() as f64 / input.len().max(1) as f64;
    info!(
        "compression: {} / {} = {:.3}{} in {:.3}s",
        packed.len(),
        input.len(),
        ratio,
        if packed.stored { "  (stored)" } else { "" },
        elapsed.as_secs_f64()
    );

    info!("writing {}", output_path.display());
    if let Err(err) = std::fs::write(&output_path, &packed.data) {
        // do not leave a truncated block behind
        let _ = std::fs::remove_file(&output_path);
        return Err(err.into());
    }

    Ok(())
}
