//! Common test utilities for the locale-exporter binary tests

use clap::Parser;
use locale_exporter::cli::Args;
use std::path::{Path, PathBuf};

/// Parse command line arguments as the binary would
#[allow(dead_code)]
pub fn parse_args(args: &[&str]) -> Args {
    Args::parse_from(std::iter::once("locale-exporter").chain(args.iter().copied()))
}

/// Path of a file under the repository's demos directory
#[allow(dead_code)]
pub fn demo_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}
