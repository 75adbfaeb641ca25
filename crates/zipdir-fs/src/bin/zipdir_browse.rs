//! zipdir-browse: Resolve one selector the way the server would.
//!
//! Selectors that cross into a ZIP archive are served from the archive's
//! interior; everything else comes from the document root.
//!
//! # Usage
//!
//! ```bash
//! # List the inside of an archive
//! zipdir-browse --root /srv/gopher /pub/site.zip/docs
//!
//! # Print a member
//! zipdir-browse --root /srv/gopher /pub/site.zip/docs/index.txt
//! ```

use clap::Parser;
use env_logger::Env;
use log::{debug, error, info};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::rc::Rc;
use zipdir_fs::{ArchiveHandler, FsError, HandlerSelector, RealFs, ServerConfig, Vfs};

/// Resolve a selector against a document root, browsing into ZIP archives.
#[derive(Parser, Debug)]
#[command(name = "zipdir-browse")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Selector to resolve (e.g. /pub/site.zip/docs)
    #[arg(value_name = "SELECTOR")]
    selector: String,

    /// Document root (overrides the config file)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Stand-in for the server's handler selection: directories are listed,
/// files are copied to stdout.
struct Render;

impl HandlerSelector for Render {
    type Output = ();

    fn select(&self, selector: &str, vfs: Rc<dyn Vfs>) -> zipdir_fs::Result<()> {
        let mut out = io::stdout().lock();

        if vfs.is_dir(selector) {
            let mut names = vfs.list_dir(selector)?;
            names.sort();
            for name in names {
                let child = format!("{}/{}", selector.trim_end_matches('/'), name);
                let stat = vfs.stat(&child)?;
                let kind = if stat.is_dir() { 'd' } else { '-' };
                let modified = stat
                    .modified()
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                writeln!(out, "{} {:>10} {} {}", kind, stat.size, modified, name)?;
            }
            return Ok(());
        }

        if vfs.is_file(selector) {
            let mut stream = vfs.open(selector)?;
            io::copy(&mut stream, &mut out)?;
            return Ok(());
        }

        Err(FsError::NotFound(selector.to_string()))
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    let mut config = match &args.config {
        Some(path) => match ServerConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to load config {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => ServerConfig::default(),
    };
    if let Some(root) = args.root {
        config.root = root;
    }

    if !config.root.is_dir() {
        error!("Document root not found: {}", config.root.display());
        process::exit(1);
    }

    debug!("Document root: {}", config.root.display());
    let upstream: Rc<dyn Vfs> = Rc::new(RealFs::new(&config.root));
    let handler = match ArchiveHandler::new(&config.handlers.zip, Rc::clone(&upstream)) {
        Ok(h) => h,
        Err(e) => {
            error!("Invalid handler configuration: {}", e);
            process::exit(1);
        }
    };

    // The archive handler goes first; if it declines, fall through to the
    // plain filesystem.
    let result = match handler.handle(&args.selector, &Render) {
        Ok(Some(())) => Ok(()),
        Ok(None) => {
            info!("{} is not inside an archive", args.selector);
            Render.select(&zipdir_fs::normalize_selector(&args.selector), upstream)
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("{}: {}", args.selector, e);
        process::exit(1);
    }
}
