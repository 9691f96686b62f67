use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lisp2sparql::{compile_with_options, CompilerOptions};
use log::{error, info};
use serde_json::json;

/// lisp2sparql - compiles s-expression logical forms into SPARQL queries
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Logical form to compile; reads stdin when omitted and --file is not given
    logical_form: Option<String>,

    /// File with logical forms: one per line, or a JSON array of strings
    #[arg(long)]
    file: Option<PathBuf>,

    /// Emit a JSON array of {logical_form, sparql} objects instead of plain text
    #[arg(long)]
    json: bool,

    /// Compiler options file (JSON; missing fields fall back to defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep going after a failed form instead of exiting on the first error
    #[arg(long)]
    keep_going: bool,
}

// Batch input is either a JSON array of strings (the dataset export format)
// or plain text with one logical form per line; blank lines are skipped.
fn parse_forms(contents: &str) -> anyhow::Result<Vec<String>> {
    if contents.trim_start().starts_with('[') {
        let forms: Vec<String> =
            serde_json::from_str(contents).context("expected a JSON array of strings")?;
        return Ok(forms);
    }
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn main() -> anyhow::Result<()> {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let options = match &cli.config {
        Some(path) => CompilerOptions::from_file(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => CompilerOptions::default(),
    };

    let forms: Vec<String> = if let Some(path) = &cli.file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading logical forms from {}", path.display()))?;
        parse_forms(&contents)
            .with_context(|| format!("parsing logical forms from {}", path.display()))?
    } else if let Some(logical_form) = &cli.logical_form {
        vec![logical_form.clone()]
    } else {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading logical forms from stdin")?;
        parse_forms(&buffer).context("parsing logical forms from stdin")?
    };

    let mut results = Vec::with_capacity(forms.len());
    let mut failures = 0usize;
    for form in &forms {
        match compile_with_options(form, &options) {
            Ok(sparql) => results.push((form.clone(), sparql)),
            Err(e) => {
                failures += 1;
                error!("failed to compile '{}': {}", form, e);
                if !cli.keep_going {
                    anyhow::bail!("failed to compile '{}': {}", form, e);
                }
            }
        }
    }

    if cli.json {
        let records: Vec<_> = results
            .iter()
            .map(|(logical_form, sparql)| json!({ "logical_form": logical_form, "sparql": sparql }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for (i, (_, sparql)) in results.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{}", sparql);
        }
    }

    if forms.len() > 1 {
        info!("compiled {}/{} logical forms", results.len(), forms.len());
    }
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
