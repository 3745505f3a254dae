pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const DEFAULT_COMPRESSION_LEVEL: u8 = 1;

/// libwebp `method`: 0 is fastest, 6 is slowest / smallest.
pub const DEFAULT_EFFORT: u8 = 4;
pub const MAX_EFFORT: u8 = 6;

/// Largest width or height a WebP bitstream can carry.
pub const WEBP_MAX_DIMENSION: u32 = 16383;

pub const OUTPUT_SUFFIX: &str = "-generated";
pub const OUTPUT_EXTENSION: &str = "webp";

/// Bytes read from the head of a file when sniffing its format.
pub const PROBE_HEADER_LEN: usize = 64;

pub const PROGRESS_BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

pub const PROMPT: &str = "Please enter command parameters: ";
pub const FAREWELL: &str = "Thank you for using, goodbye!";
pub const EXIT_WORDS: &[&str] = &["exit", "quit"];
pub const HELP_WORDS: &[&str] = &["h", "help"];
pub const HELP_FLAGS: &[&str] = &["-h", "--help"];

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const FAILURE_PREFIX: &str = "❌";
pub const WARNING_PREFIX: &str = "⚠️";
pub const INFO_PREFIX: &str = "📋";
pub const VERBOSE_PREFIX: &str = "🔍";
