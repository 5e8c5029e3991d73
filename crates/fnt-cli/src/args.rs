use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the fnt binary.
#[derive(Parser, Debug)]
#[command(
    name = "fnt",
    version,
    about = "Structural function type front-end - parse declarations and dump interned shapes"
)]
pub struct CliArgs {
    /// Source file to parse.
    pub input: Option<PathBuf>,

    /// Parse an inline snippet instead of a file.
    #[arg(long, conflicts_with = "input")]
    pub eval: Option<String>,

    /// Emit interned shapes (with their nullability tag streams) as JSON.
    #[arg(long = "emit-shapes")]
    pub emit_shapes: bool,

    /// Tracing filter, e.g. "fnt_solver=trace" (falls back to RUST_LOG).
    #[arg(long)]
    pub log: Option<String>,
}
