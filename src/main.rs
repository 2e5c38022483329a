use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use log::info;
use zettel_graph::logging::init_logging;
use zettel_graph::notes::{JsonFileStore, NOTES_COLLECTION};
use zettel_graph::{NoteSource, ZettelGraphApp};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding `<user>/<collection>.json` note files.
    #[arg(long, default_value = "sample-data")]
    store_dir: PathBuf,

    #[arg(long, default_value = "default")]
    user: String,

    #[arg(long, default_value = NOTES_COLLECTION)]
    collection: String,

    /// Log filter such as `info` or `zettel_graph=debug`; `RUST_LOG` wins when set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write rotating log files here instead of stderr.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = init_logging(&args.log_level, args.log_dir.as_deref())?;

    info!("note store at {}", args.store_dir.display());
    let source = NoteSource {
        store: Arc::new(JsonFileStore::new(args.store_dir)),
        user: args.user,
        collection: args.collection,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "zettel-graph",
        options,
        Box::new(move |cc| Ok(Box::new(ZettelGraphApp::new(cc, source)))),
    )
    .map_err(|error| anyhow!("failed to run the viewer: {error}"))
}
