//! # Shrub - HTML/CSS/JS Playground
//!
//! Composes a markup file, a stylesheet and a script into one previewable
//! document.
//!
//! ## Quick Start
//!
//! ```bash
//! # Compose the starter files to stdout
//! cargo run -- compose
//!
//! # Scaffold a project, then keep a sandboxed preview page up to date
//! cargo run -- init site
//! cargo run -- compose site -o preview.html --host-page --watch
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shrub_core::{Config, Playground, RenderSink, Workspace};
use shrub_preview::{FileSink, HostPage, PageFormat, WriterSink};

/// Shrub - a live HTML/CSS/JS playground
#[derive(Parser, Debug)]
#[command(name = "shrub")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a directory (or the starter files) into one document
    Compose {
        /// Directory holding .html, .css and .js files
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Wrap the document in a sandboxed host page
        #[arg(long)]
        host_page: bool,

        /// Keep recomposing as files in DIR change
        #[arg(short, long, requires_all = ["dir", "output"])]
        watch: bool,
    },

    /// Write the starter files into a directory
    Init {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Shrub v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };

    match args.command {
        Command::Init { dir } => {
            let written = Workspace::init(&dir)
                .with_context(|| format!("Failed to initialize {}", dir.display()))?;
            for path in written {
                println!("created {}", path.display());
            }
            Ok(())
        }
        Command::Compose {
            dir,
            output,
            host_page,
            watch,
        } => {
            let format = if host_page {
                PageFormat::Hosted(HostPage::new(config.preview.title.clone()))
            } else {
                PageFormat::Bare
            };

            let sink: Box<dyn RenderSink> = match &output {
                Some(path) => Box::new(FileSink::new(path, format)),
                None => Box::new(WriterSink::new(std::io::stdout(), format)),
            };

            let Some(dir) = dir else {
                let mut playground = Playground::with_config(config, sink);
                publish(&mut playground);
                return Ok(());
            };

            let mut workspace = Workspace::open(&dir)
                .with_context(|| format!("Failed to open {}", dir.display()))?;
            if let Some(path) = &output {
                if let Err(e) = workspace.ignore(path) {
                    tracing::warn!("Cannot exclude {} from {}: {}", path.display(), dir.display(), e);
                }
            }
            let store = workspace.load_store()?;
            let mut playground = Playground::with_store(store, config, sink);
            publish(&mut playground);

            if watch {
                let runtime = tokio::runtime::Runtime::new()?;
                runtime.block_on(watch_workspace(workspace, playground))?;
            }
            Ok(())
        }
    }
}

/// Makes sure the sink holds the current document.
///
/// With `preview.auto_refresh` off the compositor only loads on an explicit
/// refresh, but `compose` always has to write its output.
fn publish<S: RenderSink>(playground: &mut Playground<S>) {
    if !playground.config().preview.auto_refresh {
        playground.refresh();
    }
}

/// Applies directory changes to the playground until Ctrl-C.
async fn watch_workspace(
    mut workspace: Workspace,
    mut playground: Playground<Box<dyn RenderSink>>,
) -> anyhow::Result<()> {
    let mut changes = workspace.start_watching()?;
    eprintln!("Watching {} (Ctrl-C to stop)", workspace.root().display());

    loop {
        tokio::select! {
            change = changes.recv() => {
                let Some(change) = change else { break };
                match workspace.apply_change(&mut playground, &change) {
                    Ok(true) => {
                        publish(&mut playground);
                        tracing::info!("Recomposed after change to {}", change.path().display());
                    }
                    Ok(false) => {}
                    Err(e) => tracing::warn!("Skipping {}: {}", change.path().display(), e),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    workspace.stop_watching();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shrub_core::FileChange;
    use tempfile::tempdir;

    fn manual_refresh_config() -> Config {
        let mut config = Config::default();
        config.preview.auto_refresh = false;
        config
    }

    #[test]
    fn test_compose_writes_without_auto_refresh() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.html");

        let mut playground =
            Playground::with_config(manual_refresh_config(), FileSink::new(&out, PageFormat::Bare));
        assert_eq!(playground.sink().writes(), 0);
        publish(&mut playground);

        assert_eq!(playground.sink().writes(), 1);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), playground.export().as_str());
    }

    #[test]
    fn test_publish_does_not_write_twice_with_auto_refresh() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.html");

        let mut playground = Playground::with_config(Config::default(), FileSink::new(&out, PageFormat::Bare));
        publish(&mut playground);

        assert_eq!(playground.sink().writes(), 1);
    }

    #[test]
    fn test_watched_change_is_written_without_auto_refresh() {
        let dir = tempdir().unwrap();
        Workspace::init(dir.path()).unwrap();
        let out = dir.path().join("preview.html");

        let mut workspace = Workspace::open(dir.path()).unwrap();
        workspace.ignore(&out).unwrap();
        let store = workspace.load_store().unwrap();
        let mut playground =
            Playground::with_store(store, manual_refresh_config(), FileSink::new(&out, PageFormat::Bare));
        publish(&mut playground);

        let css = workspace.root().join("styles.css");
        std::fs::write(&css, "body { margin: 10px }").unwrap();
        assert!(workspace.apply_change(&mut playground, &FileChange::Modified(css)).unwrap());
        publish(&mut playground);

        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.contains("<style>body { margin: 10px }</style>"));
        assert_eq!(playground.sink().writes(), 2);

        let created = FileChange::Created(workspace.root().join("preview.html"));
        assert!(!workspace.apply_change(&mut playground, &created).unwrap());
        assert!(!playground.store().contains("preview.html"));
    }

    #[test]
    fn test_compose_args() {
        let args = Args::parse_from(["shrub", "compose"]);
        match args.command {
            Command::Compose { dir, output, host_page, watch } => {
                assert!(dir.is_none());
                assert!(output.is_none());
                assert!(!host_page);
                assert!(!watch);
            }
            _ => panic!("expected compose"),
        }
    }

    #[test]
    fn test_watch_requires_dir_and_output() {
        assert!(Args::try_parse_from(["shrub", "compose", "--watch"]).is_err());
        assert!(Args::try_parse_from(["shrub", "compose", "site", "--watch"]).is_err());
        assert!(Args::try_parse_from(["shrub", "compose", "site", "-o", "out.html", "--watch"]).is_ok());
    }

    #[test]
    fn test_init_args() {
        let args = Args::parse_from(["shrub", "-vv", "init", "site"]);
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.command, Command::Init { ref dir } if dir == &PathBuf::from("site")));
    }
}
