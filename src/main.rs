use clap::{Parser, Subcommand};
use journal_cards::extract::{DocsEntryExtractor, EntriesManifest, ExtractConfig};
use journal_cards::{config, extract, output, render};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "journal-cards")]
#[command(about = "Journal entries and title cards from a Google Doc")]
#[command(long_about = "\
Journal entries and title cards from a Google Doc

The input is the JSON returned by the Docs API `documents.get` call. Each
paragraph is read as one block:

  2025-06-01             # date line: starts a new day
                         # one blank paragraph: ignored
  09:00                  # time line, optionally with an offset (09:00-07:00)
  TRIP|HIKE              # tag line: pipe-separated
  Ridge Walk             # bold paragraph: title
  Walked along the...    # anything else: body
                         # two blank paragraphs in a row: end of entry

Pipeline:

  extract   document.json → <temp-dir>/entries.json
  render    <temp-dir>/entries.json → <output>/ (one PNG per entry,
            cards.json, rows.json)

Run 'journal-cards gen-config' to generate a documented journal.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "journal.toml", global = true)]
    config: PathBuf,

    /// Docs API document JSON
    #[arg(long, default_value = "document.json", global = true)]
    document: PathBuf,

    /// Output directory for title cards
    #[arg(long, default_value = "images", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (entries manifest)
    #[arg(long, default_value = ".journal-cards-temp", global = true)]
    temp_dir: PathBuf,

    /// Log progress details (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract entries from the document into a manifest
    Extract,
    /// Render a title card for every extracted entry
    Render,
    /// Run the full pipeline: extract → render
    Build,
    /// Extract and list entries without writing anything
    Check,
    /// Print a stock journal.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Extract => {
            let config = config::load_config(&cli.config)?;
            let manifest = run_extract(&config, &cli.document)?;
            write_entries(&manifest, &cli.temp_dir)?;
            output::print_extract_output(&manifest);
        }
        Command::Render => {
            let config = config::load_config(&cli.config)?;
            run_render(&config, &entries_path(&cli.temp_dir), &cli.output)?;
        }
        Command::Build => {
            let config = config::load_config(&cli.config)?;

            println!("==> Stage 1: Extracting {}", cli.document.display());
            let manifest = run_extract(&config, &cli.document)?;
            let entries_path = write_entries(&manifest, &cli.temp_dir)?;
            output::print_extract_output(&manifest);

            println!("==> Stage 2: Rendering cards → {}", cli.output.display());
            run_render(&config, &entries_path, &cli.output)?;

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            println!("==> Checking {}", cli.document.display());
            let manifest = run_extract(&config, &cli.document)?;
            output::print_extract_output(&manifest);
            println!("==> Document is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log at `info` by default, `debug` with `--verbose`; `RUST_LOG` wins.
fn default_log_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn init_logging(verbose: bool) {
    let default_level = default_log_level(verbose);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn entries_path(temp_dir: &Path) -> PathBuf {
    temp_dir.join("entries.json")
}

fn run_extract(
    config: &config::JournalConfig,
    document: &Path,
) -> Result<EntriesManifest, Box<dyn std::error::Error>> {
    let extractor = DocsEntryExtractor::new(ExtractConfig::from_entries_config(&config.entries));
    Ok(extract::extract_document(&extractor, document)?)
}

fn write_entries(
    manifest: &EntriesManifest,
    temp_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let path = entries_path(temp_dir);
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

fn run_render(
    config: &config::JournalConfig,
    entries_path: &Path,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_render_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = render::render(entries_path, output_dir, config, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    let manifest = result?;
    output::print_render_output(&manifest, output_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_defaults_to_info() {
        assert_eq!(default_log_level(false), "info");
        assert_eq!(default_log_level(true), "debug");
    }
}
