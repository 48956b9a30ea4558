use std::path::Path;

use clap::Parser;
use tox::interpreter::loader::LoaderConfig;

/// Tox is a small statically typed scripting language with packages,
/// structs, methods and first-class maps and arrays.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the entry source file.
    path: String,

    /// Project package prefix stripped from the front of import paths.
    #[arg(long, default_value = "")]
    prefix: String,

    /// Source directory searched for imported packages (repeatable).
    #[arg(long = "src-dir", default_value = "src")]
    src_dirs: Vec<String>,
}

fn main() {
    let args = Args::parse();

    let config = LoaderConfig { package_prefix: args.prefix,
                                source_dirs:    args.src_dirs, };

    if let Err(e) = tox::run_file(Path::new(&args.path), &config) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
