#[macro_use]
pub mod logger;

pub mod batch;
pub mod cli;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod formats;
pub mod processing;
pub mod shell;
pub mod utils;
pub mod validation;

pub use batch::{collect_files, run_batch, run_conversion, RunSummary};
pub use cli::Args;
pub use encoder::{encode, EncoderOptions};
pub use error::{ConvertError, Result};
pub use processing::{
    apply_orientation, convert_file, load_oriented, unique_output_path, ConversionOutcome,
    ConversionResult,
};
pub use shell::{interpret_line, run_interactive, run_shell, SessionFlags, ShellCommand, ShellExit};
pub use validation::{CompressionLevel, InputType, RunConfig};
