//! A debugging tool that parses wikitext, dumps the node tree with source
//! positions, and verifies the round trip.

use anyhow::Context;
use mw_parse::{FileMap, inspectors};
use std::fs;

fn usage<T>(error: &'static str) -> anyhow::Result<T> {
    let exe = std::env::args().next().unwrap_or_default();
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("Usage: {exe} [options] [<file.wikitext>]\n");
    println!("Options:");
    println!("    --text <wikitext>: parse a literal string instead of a file");
    println!();
    Err(anyhow::Error::msg(error))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return usage("help requested");
    }

    let text = if let Some(text) = args.opt_value_from_str::<_, String>("--text")? {
        text
    } else if let Some(path) = args.opt_free_from_str::<std::path::PathBuf>()? {
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?
    } else {
        return usage("missing input");
    };

    let rest = args.finish();
    if !rest.is_empty() {
        return usage("unexpected extra arguments");
    }

    let tree = mw_parse::parse(&text);
    println!(
        "{:#?}",
        inspectors::inspect(&FileMap::new(&text), tree.root())
    );

    let round_trip = tree.serialize();
    anyhow::ensure!(round_trip == text, "round trip mismatch");
    println!("round trip OK ({} bytes)", text.len());
    Ok(())
}
