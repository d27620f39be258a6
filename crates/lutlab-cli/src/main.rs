//! lutlab - LUT conversion CLI
//!
//! Converts LUTs between formats, sizes and shapes, samples transfer
//! curves into LUTs, and prints colorspace conversion matrices.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lutlab_lut::{Dimensionality, Direction, Interpolation, Precision};
use lutlab_math::Adaptation;
use lutlab_primaries::MatrixFormat;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "lutlab")]
#[command(author, version, about = "LUT conversion, curve sampling and colorspace matrices")]
#[command(long_about = "
Converts LUT files between formats, sizes and shapes, samples named
transfer curves into LUTs, and builds colorspace conversion matrices.

Examples:
  lutlab convert look.cube -o look.3dl --size 17    # Resize into Lustre 3dl
  lutlab convert shaper.spi1d -o shaper.cube        # 1D is promoted to 2D
  lutlab convert gamma.cube -o inv.cube --inverse   # Invert a 1D/2D LUT
  lutlab convert log.spi1d look.cube --to 3dl       # Chain into log+look_export.3dl
  lutlab convert film.spi1d -o out/ --smooth-size 17 # Smooth, write out/film.spi1d
  lutlab curve sRGB srgb.spi1d --size 4096          # Lin to sRGB curve
  lutlab curve LogC3 logc.cube --direction decode
  lutlab matrix sRGB                                # RGB<->XYZ matrices
  lutlab matrix ACEScg --to sRGB --format spimtx -o acescg_to_srgb.spimtx
  lutlab batch 'luts/*.cube' --to 3dl --out-dir out -j 8
  lutlab formats
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write logs to FILE
    #[arg(long, global = true, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Number of threads for batch conversion (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert (and chain) LUT files to another format, size or shape
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Sample a transfer curve into a LUT file
    Curve(CurveArgs),

    /// Print RGB/XYZ or RGB to RGB conversion matrices
    #[command(visible_alias = "m")]
    Matrix(MatrixArgs),

    /// Convert many LUT files in parallel
    Batch(BatchArgs),

    /// List supported LUT formats
    Formats,

    /// List registered transfer curves
    Curves,

    /// List known colorspaces
    Colorspaces,
}

/// Output settings shared by `convert` and `curve`.
#[derive(Args, Clone, Default)]
struct ExportArgs {
    /// Output format tag or extension (default: from the output extension)
    #[arg(long)]
    to: Option<String>,

    /// Samples per dimension
    #[arg(short, long)]
    size: Option<usize>,

    /// Output shape: 1d, 2d or 3d
    #[arg(long = "type", value_name = "TYPE")]
    lut_type: Option<Dimensionality>,

    /// Output precision: 8, 10, 12, 16, half or float
    #[arg(short = 'b', long)]
    bit_depth: Option<Precision>,

    /// Rescale output values to [MIN, MAX]
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    output_range: Option<Vec<f32>>,

    /// LUT title
    #[arg(long)]
    title: Option<String>,

    /// Export preset: a JSON file, or a name looked up in $LUTLAB_PRESETS
    #[arg(short, long)]
    preset: Option<String>,

    /// Let explicit options override preset values
    #[arg(long)]
    overwrite_preset: bool,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input LUT files, applied in order
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output LUT file or directory (default: <inputs>_export next to the first input)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Input format tag or extension (default: from the input extension)
    #[arg(long)]
    from: Option<String>,

    /// 3D interpolation
    #[arg(short, long, value_enum, default_value_t = InterpolationArg::Trilinear)]
    interpolation: InterpolationArg,

    /// Invert the input (1D/2D only)
    #[arg(long)]
    inverse: bool,

    /// Smooth through N points before resizing (1D/2D only)
    #[arg(long, value_name = "N")]
    smooth_size: Option<usize>,

    /// Resample onto input domain [MIN, MAX]
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    input_range: Option<Vec<f32>>,

    #[command(flatten)]
    export: ExportArgs,
}

#[derive(Args)]
struct CurveArgs {
    /// Curve name, e.g. sRGB, LogC3, gamma:2.4
    name: String,

    /// Output LUT file
    output: PathBuf,

    /// encode (linear to signal) or decode (signal to linear)
    #[arg(short, long, value_enum, default_value_t = DirectionArg::Encode)]
    direction: DirectionArg,

    /// Curve input range
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    domain: Option<Vec<f32>>,

    /// Sample the curve's natural input range instead of [0, 1]
    #[arg(long)]
    process_input_range: bool,

    #[command(flatten)]
    export: ExportArgs,
}

#[derive(Args)]
struct MatrixArgs {
    /// Source colorspace (omit with --primaries)
    colorspace: Option<String>,

    /// Destination colorspace; prints RGB to XYZ and XYZ to RGB when omitted
    #[arg(long)]
    to: Option<String>,

    /// Output layout
    #[arg(short, long, value_enum, default_value_t = MatrixFormatArg::Matrix)]
    format: MatrixFormatArg,

    /// Unscaled primaries matrix, no white point normalization
    #[arg(long)]
    primaries_only: bool,

    /// Chromatic adaptation between differing white points
    #[arg(short, long, value_enum, default_value_t = AdaptationArg::Cat02)]
    adaptation: AdaptationArg,

    /// Custom source primaries
    #[arg(long, num_args = 6, value_names = ["RX", "RY", "GX", "GY", "BX", "BY"], requires = "white")]
    primaries: Option<Vec<f64>>,

    /// Custom source white point
    #[arg(long, num_args = 2, value_names = ["WX", "WY"], requires = "primaries")]
    white: Option<Vec<f64>>,

    /// Write the matrices to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct BatchArgs {
    /// Input glob pattern, e.g. "luts/*.cube"
    input: String,

    /// Output format tag
    #[arg(long)]
    to: String,

    /// Output directory
    #[arg(short, long = "out-dir", value_name = "DIR")]
    output_dir: PathBuf,

    /// Samples per dimension
    #[arg(short, long)]
    size: Option<usize>,

    /// Output shape: 1d, 2d or 3d
    #[arg(long = "type", value_name = "TYPE")]
    lut_type: Option<Dimensionality>,

    /// Output precision
    #[arg(short = 'b', long)]
    bit_depth: Option<Precision>,

    /// 3D interpolation
    #[arg(short, long, value_enum, default_value_t = InterpolationArg::Trilinear)]
    interpolation: InterpolationArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum InterpolationArg {
    Trilinear,
    Tetrahedral,
}

impl From<InterpolationArg> for Interpolation {
    fn from(arg: InterpolationArg) -> Self {
        match arg {
            InterpolationArg::Trilinear => Self::Trilinear,
            InterpolationArg::Tetrahedral => Self::Tetrahedral,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Encode,
    Decode,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Encode => Self::Encode,
            DirectionArg::Decode => Self::Decode,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MatrixFormatArg {
    Matrix,
    Simple,
    Spimtx,
}

impl From<MatrixFormatArg> for MatrixFormat {
    fn from(arg: MatrixFormatArg) -> Self {
        match arg {
            MatrixFormatArg::Matrix => Self::Matrix,
            MatrixFormatArg::Simple => Self::Simple,
            MatrixFormatArg::Spimtx => Self::Spimtx,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AdaptationArg {
    None,
    Bradford,
    Cat02,
    VonKries,
}

impl From<AdaptationArg> for Adaptation {
    fn from(arg: AdaptationArg) -> Self {
        match arg {
            AdaptationArg::None => Self::None,
            AdaptationArg::Bradford => Self::Bradford,
            AdaptationArg::Cat02 => Self::Cat02,
            AdaptationArg::VonKries => Self::VonKries,
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let _log_guard = logging::init(cli.verbose, cli.log.as_deref())?;

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Convert(args) => commands::convert::run(args, cli.verbose),
        Commands::Curve(args) => commands::curve::run(args, cli.verbose),
        Commands::Matrix(args) => commands::matrix::run(args, cli.verbose),
        Commands::Batch(args) => commands::batch::run(args, cli.verbose),
        Commands::Formats => commands::list::formats(),
        Commands::Curves => commands::list::curves(),
        Commands::Colorspaces => commands::list::colorspaces(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(commands::exit_code(&e))
        }
    }
}
