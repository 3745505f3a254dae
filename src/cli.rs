use clap::{CommandFactory, Parser};
use std::ffi::OsString;

pub const BIN_NAME: &str = "convert2webp";

/// Flag set shared by the one-shot invocation and every interactive prompt line.
///
/// Quality, level and minimal are kept as raw strings: out-of-range values are
/// downgraded to defaults by the validator instead of being rejected here.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = BIN_NAME,
    about = "Convert images to WebP, one file or a whole directory tree",
    long_about = "convert2webp converts raster images (JPEG, PNG, GIF, BMP, TIFF, WebP) into WebP. \
                  Run it with flags for a single conversion, or without arguments to enter an \
                  interactive prompt that accepts the same flags on every line.",
    version,
    after_help = "EXAMPLES:\n  \
    convert2webp -i photo.jpg -q 75\n  \
    convert2webp -d ./images -o ./webp -l 3\n  \
    convert2webp -d ./images -m true\n  \
    convert2webp              (interactive mode)"
)]
pub struct Args {
    #[arg(short = 'i', long, value_name = "PATH", help = "Input file path")]
    pub input: Option<String>,

    #[arg(
        short = 'd',
        long,
        value_name = "PATH",
        help = "Input directory path (choose one with -i)",
        long_help = "Input directory path. Every file below it is converted, subdirectories included. \
                     Cannot be combined with -i."
    )]
    pub directory: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "PATH",
        help = "Output directory path (defaults to the folder of -i or -d)",
        long_help = "Output directory path. Must already exist. \
                     If not specified, outputs are written next to the input file (-i) or into the input directory (-d)."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'q',
        long,
        value_name = "NUMBER",
        default_value = "80",
        allow_negative_numbers = true,
        help = "Image quality (1-100)",
        long_help = "Encoder quality from 1 (smallest) to 100 (best). Invalid values fall back to 80."
    )]
    pub quality: String,

    #[arg(
        short = 'l',
        long,
        value_name = "NUMBER",
        default_value = "1",
        allow_negative_numbers = true,
        help = "Compression level (1: lossy, 2: near-lossless, 3: lossless)",
        long_help = "Compression level: 1 lossy, 2 near-lossless, 3 lossless. Invalid values fall back to 1."
    )]
    pub lossless: String,

    #[arg(
        short = 'm',
        long,
        value_name = "BOOLEAN",
        default_value = "false",
        help = "Force minimal file size regardless of compression level",
        long_help = "When 'true', encode with maximum effort and keep the smaller of a lossy and a lossless \
                     encoding. The compression level is ignored."
    )]
    pub minimal: String,

    #[arg(short = 'v', long, help = "Print extra detail for each file")]
    pub verbose: bool,

    #[arg(long, help = "Only print errors")]
    pub quiet: bool,

    #[arg(
        long,
        conflicts_with_all = ["input", "directory", "output", "quality", "lossless", "minimal"],
        help = "Start the interactive prompt",
        long_help = "Start the interactive prompt. Conversion flags are typed on each prompt line instead; \
                     --quiet and --verbose given here apply to the whole session."
    )]
    pub interactive: bool,
}

impl Args {
    /// Parses one prompt line with a fresh parser. Help and version requests come
    /// back as errors rather than terminating the process.
    pub fn from_line(line: &str) -> Result<Self, clap::Error> {
        let tokens = tokenize(line);
        Self::try_parse_from(std::iter::once(BIN_NAME).chain(tokens))
    }

    /// True when the binary was started without any argument.
    pub fn is_bare(raw_args: &[OsString]) -> bool {
        raw_args.len() <= 1
    }
}

/// Splits a prompt line on whitespace.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

pub fn render_help() -> String {
    Args::command().render_help().to_string()
}
