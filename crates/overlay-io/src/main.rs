//! `overlay-embed`: make an overlay document self-contained.
//!
//! Reads a document, inlines every image it references as a `data:` URL and
//! writes the result (pretty JSON) to stdout or a file:
//!
//! ```text
//! overlay-embed <input.json> [--root <dir>] [--out <file>]
//! ```
//!
//! Relative and root-relative image paths resolve against `--root`, or the
//! input file's directory when omitted. `RUST_LOG=debug` shows progress.

use overlay_core::OverlayDocument;
use overlay_io::{FsFetcher, embed_images, export};
use std::path::PathBuf;
use std::process::ExitCode;

struct Args {
    input: PathBuf,
    root: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut input = None;
    let mut root = None;
    let mut out = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--root" => root = Some(PathBuf::from(args.next().ok_or("--root needs a directory")?)),
            "--out" => out = Some(PathBuf::from(args.next().ok_or("--out needs a file")?)),
            _ if input.is_none() => input = Some(PathBuf::from(&arg)),
            _ => return Err(format!("unexpected argument `{arg}`")),
        }
    }
    Ok(Args {
        input: input.ok_or("usage: overlay-embed <input.json> [--root <dir>] [--out <file>]")?,
        root,
        out,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("overlay-embed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> overlay_core::Result<()> {
    let text = tokio::fs::read_to_string(&args.input).await?;
    let mut document = OverlayDocument::from_json(&text)?;

    let root = args.root.unwrap_or_else(|| {
        args.input
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    });
    let report = embed_images(&mut document, &FsFetcher::with_root(root)).await;
    if report.retained > 0 {
        log::warn!("{} image(s) could not be embedded", report.retained);
    }
    if document.exported_at.is_none() {
        document.exported_at = Some(export::timestamp());
    }

    let bytes = export::encode(&document, true)?;
    match args.out {
        Some(path) => tokio::fs::write(&path, bytes).await?,
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
