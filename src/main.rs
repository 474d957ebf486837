//! LimeSheet - CSV spreadsheet with formulas and an AI data assistant.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use limesheet_core::assistant::{AssistantClient, AssistantConfig, parse_reply};
use limesheet_core::{Document, Settings};
use limesheet_engine::{CellRef, evaluate};

fn print_usage() {
    eprintln!("Usage: limesheet <COMMAND> [OPTIONS]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  view  <FILE>                    Print the evaluated table");
    eprintln!("  eval  <FILE> <FORMULA>          Evaluate a formula against the dataset");
    eprintln!("  apply <FILE> <COL> <PATTERN>    Fill a column from a {{{{row}}}} pattern");
    eprintln!("  ask   <FILE> <PROMPT>           Send the dataset and a request to the assistant");
    eprintln!("  import <URL>                    Fetch a remote CSV (or Google Sheet) and save it");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <FILE>   Write the resulting CSV here (apply/ask: default in place;");
    eprintln!("                        import: default imported.csv)");
    eprintln!("  -h, --help            Print help");
    eprintln!();
    eprintln!("The assistant needs an API key: set LIMESHEET_API_KEY or put api_key in");
    eprintln!("the limesheet config.toml.");
}

struct Cli {
    command: String,
    args: Vec<String>,
    output: Option<PathBuf>,
}

fn parse_args() -> Option<Cli> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let mut command = None;
    let mut args = Vec::new();
    let mut output = None;

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => return None,
            "-o" | "--output" => {
                i += 1;
                if i >= argv.len() {
                    eprintln!("Error: --output requires a file path");
                    std::process::exit(1);
                }
                output = Some(PathBuf::from(&argv[i]));
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                std::process::exit(1);
            }
            arg => {
                if command.is_none() {
                    command = Some(arg.to_string());
                } else {
                    args.push(arg.to_string());
                }
            }
        }
        i += 1;
    }

    command.map(|command| Cli {
        command,
        args,
        output,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(cli) = parse_args() else {
        print_usage();
        return;
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.as_str() {
        "view" => {
            let doc = load_document(&cli.args, "view <FILE>")?;
            print_table(&doc);
            Ok(())
        }
        "eval" => {
            let doc = load_document(&cli.args, "eval <FILE> <FORMULA>")?;
            let formula = cli
                .args
                .get(1)
                .context("usage: eval <FILE> <FORMULA>")?;
            println!("{}", evaluate(formula, doc.sheet()));
            Ok(())
        }
        "apply" => {
            let mut doc = load_document(&cli.args, "apply <FILE> <COL> <PATTERN>")?;
            let (col_arg, pattern) = match (cli.args.get(1), cli.args.get(2)) {
                (Some(c), Some(p)) => (c, p),
                _ => bail!("usage: apply <FILE> <COL> <PATTERN>"),
            };
            let col = resolve_column(&doc, col_arg)?;
            doc.apply_column_formula(col, pattern)?;
            write_csv(&doc, cli.output.as_deref(), &cli.args[0])?;
            print_table(&doc);
            Ok(())
        }
        "ask" => {
            let mut doc = load_document(&cli.args, "ask <FILE> <PROMPT>")?;
            let prompt = cli.args.get(1).context("usage: ask <FILE> <PROMPT>")?;

            let settings = Settings::load()?;
            let key = settings.require_api_key()?;
            let client =
                AssistantClient::new(AssistantConfig::new(key, settings.model.clone()));

            let raw = client.ask(&doc.to_csv(), prompt)?;
            let reply = parse_reply(&raw)?;

            println!("{}", reply.prose);

            if let Some(csv) = &reply.replacement_csv {
                let (headers, rows) = limesheet_core::storage::parse_csv(csv)?;
                doc.set_data(headers, rows);
                write_csv(&doc, cli.output.as_deref(), &cli.args[0])?;
                println!();
                print_table(&doc);
            }

            if let Some(chart) = &reply.chart {
                println!();
                println!("Chart proposal: {}", serde_json::to_string_pretty(chart)?);
            }
            Ok(())
        }
        "import" => {
            let url = cli.args.first().context("usage: import <URL>")?;
            let text = limesheet_core::storage::fetch_csv(url)?;

            let target = cli
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from("imported.csv"));
            let name = target
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "imported".to_string());

            let doc = Document::from_csv(&text, &name)?;
            std::fs::write(&target, doc.to_csv())
                .with_context(|| format!("failed to write {}", target.display()))?;
            println!("Wrote {}", target.display());
            print_table(&doc);
            Ok(())
        }
        other => {
            eprintln!("Error: Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn load_document(args: &[String], usage: &str) -> anyhow::Result<Document> {
    let path = args.first().with_context(|| format!("usage: {}", usage))?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path))?;
    let name = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone());
    Ok(Document::from_csv(&text, &name)?)
}

/// A column given either by header name (exact match) or by its letters.
fn resolve_column(doc: &Document, arg: &str) -> anyhow::Result<usize> {
    if let Some(idx) = doc.headers().iter().position(|h| h == arg) {
        return Ok(idx);
    }
    if let Some(col) = CellRef::letters_to_col(arg)
        && col < doc.headers().len()
    {
        return Ok(col);
    }
    bail!("no such column: {}", arg);
}

fn write_csv(doc: &Document, output: Option<&Path>, input: &str) -> anyhow::Result<()> {
    let target = output.unwrap_or_else(|| Path::new(input));
    std::fs::write(target, doc.to_csv())
        .with_context(|| format!("failed to write {}", target.display()))?;
    println!("Wrote {}", target.display());
    Ok(())
}

/// Print the evaluated table as a markdown-style grid.
fn print_table(doc: &Document) {
    let rows = doc.evaluated_rows();
    let headers = doc.headers();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let print_row = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = w))
            .collect();
        println!("| {} |", padded.join(" | "));
    };

    print_row(&headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("|-{}-|", rule.join("-|-"));
    for row in &rows {
        print_row(row);
    }
}
