//! Top-level CLI: classify the catalog and render the requested table.
//!
//! The binary keeps the public `permtag (all | mutating)` interface stable
//! while the library owns loading, validation, and rendering. Output goes to
//! stdout as an aligned table by default, to a file as CSV with `--csv`, or
//! to stdout as NDJSON with `--json` so it can sit in shell pipelines.

use anyhow::{Context, Result, anyhow, bail};
use permtag::{
    CatalogIndex, Classification, create_mutating_table, create_permissions_table, find_repo_root,
    ndjson_row, render_table, resolve_catalog_path, write_csv,
};
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    let repo_root = find_repo_root().ok();
    let catalog_path = resolve_catalog_path(repo_root.as_deref(), cli.catalog_path.as_deref())?;
    let index = CatalogIndex::load(&catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;
    let classification = Classification::classify(&index);

    let rows = match cli.command {
        TableSelect::All => create_permissions_table(&classification),
        TableSelect::Mutating => create_mutating_table(&classification),
    };

    match cli.output {
        OutputMode::Table => {
            let mut rendered = String::new();
            render_table(&rows, &mut rendered).context("rendering table")?;
            print!("{rendered}");
        }
        OutputMode::Csv(path) => {
            let file = File::create(&path)
                .with_context(|| format!("creating CSV output {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_csv(&rows, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("writing CSV output {}", path.display()))?;
        }
        OutputMode::Ndjson => {
            for row in &rows {
                let compact = serde_json::to_string(&ndjson_row(row))?;
                println!("{compact}");
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TableSelect {
    All,
    Mutating,
}

enum OutputMode {
    Table,
    Csv(PathBuf),
    Ndjson,
}

struct Cli {
    command: TableSelect,
    catalog_path: Option<PathBuf>,
    output: OutputMode,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os();
        let _program = args.next();

        let Some(command_arg) = args.next() else {
            usage(1);
        };
        let command = match command_arg.to_str() {
            Some("all") => TableSelect::All,
            Some("mutating") => TableSelect::Mutating,
            Some("--help") | Some("-h") => usage(0),
            _ => usage(1),
        };

        let mut catalog_path = None;
        let mut csv_path = None;
        let mut json = false;

        while let Some(arg) = args.next() {
            let arg_str = arg
                .to_str()
                .ok_or_else(|| anyhow!("invalid UTF-8 in argument"))?;
            match arg_str {
                "--csv" => csv_path = Some(next_path("--csv", &mut args)?),
                "--catalog" => catalog_path = Some(next_path("--catalog", &mut args)?),
                "--json" => json = true,
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument: {other}"),
            }
        }

        let output = match (csv_path, json) {
            (Some(_), true) => bail!("--csv and --json are mutually exclusive"),
            (Some(path), false) => OutputMode::Csv(path),
            (None, true) => OutputMode::Ndjson,
            (None, false) => OutputMode::Table,
        };

        Ok(Self {
            command,
            catalog_path,
            output,
        })
    }
}

fn next_path(flag: &str, args: &mut env::ArgsOs) -> Result<PathBuf> {
    let value = args
        .next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))?;
    let path = PathBuf::from(
        value
            .into_string()
            .map_err(|_| anyhow!("{flag} must be valid UTF-8"))?,
    );
    if path.as_os_str().is_empty() {
        bail!("{flag} must not be empty");
    }
    Ok(path)
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: permtag (all | mutating) [--csv PATH] [--json] [--catalog PATH]\n\nCommands:\n  all            Print every (service, permission) row with its tag booleans.\n  mutating       Print only rows tagged MUTATING or SIDE_EFFECT.\n\nOptions:\n  --csv PATH     Write CSV rows (header + data) to PATH instead of printing a table.\n  --json         Emit one JSON object per row (NDJSON) instead of a table.\n  --catalog PATH Override the permission catalog path (or set PERMTAG_CATALOG).\n  --help         Show this help text.\n\nExamples:\n  permtag all\n  permtag mutating --csv mutating.csv\n  permtag all --json | jq 'select(.tags.MUTATING)'"
    );
    std::process::exit(code);
}
