use budget_resize::imaging::has_supported_extension;
use budget_resize::output::{self, FailureReport, ResizeReport};
use budget_resize::persist;
use budget_resize::{ResizeEvent, ResizeOptions, ResizeRequest, config, resize_to_budget};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use walkdir::WalkDir;

/// Budget and encoder flags shared by `resize` and `batch`.
#[derive(clap::Args, Clone)]
struct BudgetArgs {
    /// Largest acceptable encoded size in bytes [default: 524288]
    #[arg(long, short = 'm')]
    max_bytes: Option<u64>,

    /// Encode as PNG instead of JPEG
    #[arg(long, conflicts_with = "lossy")]
    lossless: bool,

    /// Encode as JPEG even if the config file asks for PNG
    #[arg(long)]
    lossy: bool,

    /// Stop the width search after this many trial encodes
    #[arg(long)]
    max_trials: Option<u32>,

    /// Write the result next to the source as <name>.jpg / <name>.png
    #[arg(long)]
    save: bool,

    /// Directory for saved results (implies --save)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl BudgetArgs {
    fn request(&self, path: &Path, config: &config::ResizerConfig) -> ResizeRequest {
        let lossless = if self.lossy {
            false
        } else {
            self.lossless || config.encoder.lossless
        };
        ResizeRequest::new(path)
            .max_bytes(self.max_bytes.unwrap_or(config.budget.max_bytes))
            .lossless(lossless)
    }

    fn options(&self, config: &config::ResizerConfig) -> ResizeOptions {
        let mut options = config.resize_options();
        if let Some(max_trials) = self.max_trials {
            options.search.max_trials = Some(max_trials);
        }
        options
    }

    fn saving(&self) -> bool {
        self.save || self.output_dir.is_some()
    }
}

#[derive(Parser)]
#[command(name = "budget-resize")]
#[command(about = "Shrink images until their encoded size fits a byte budget")]
#[command(long_about = "\
Shrink images until their encoded size fits a byte budget

The image keeps its aspect ratio. Its width is binary-searched: each step
resizes and encodes a trial copy and measures the bytes. The widest size that
fits is encoded once more and returned.

Encoders:
  JPEG (default)  quality 95, 4:2:0 chroma subsampling
  PNG             --lossless

Settings are read from ./budget-resize.toml when present (see gen-config).
Command-line flags override the file.")]
#[command(version)]
struct Cli {
    /// Config file [default: ./budget-resize.toml if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize a single image to fit the budget
    Resize {
        /// Image to resize
        path: PathBuf,

        #[command(flatten)]
        budget: BudgetArgs,

        /// Print a JSON report instead of progress
        #[arg(long)]
        json: bool,
    },
    /// Resize every image under a directory
    Batch {
        /// Directory to walk
        dir: PathBuf,

        #[command(flatten)]
        budget: BudgetArgs,
    },
    /// Print a stock budget-resize.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Resize { path, budget, json } => {
            let config = config::load_config(cli.config.as_deref())?;
            let request = budget.request(&path, &config);
            let options = budget.options(&config);

            let (events, printer) = if json {
                (None, None)
            } else {
                let (tx, printer) = spawn_printer();
                (Some(tx), Some(printer))
            };
            let result = resize_to_budget(&request, &options, events);
            if let Some(printer) = printer {
                printer.join().map_err(|_| "output thread panicked")?;
            }

            let result = match result {
                Ok(result) => result,
                Err(err) if json => {
                    let report = FailureReport::new(&path, &err);
                    println!("{}", serde_json::to_string_pretty(&report)?);
                    std::process::exit(1);
                }
                Err(_) => {
                    println!("Unable to process file.");
                    std::process::exit(1);
                }
            };

            let saved = if budget.saving() {
                persist::save(&path, &result, budget.output_dir.as_deref())?
            } else {
                None
            };

            if json {
                let report = ResizeReport::new(&path, saved.as_deref(), &result);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if let Some(target) = saved {
                println!("Saved {}", target.display());
            }
        }
        Command::Batch { dir, budget } => {
            let config = config::load_config(cli.config.as_deref())?;
            let options = budget.options(&config);
            let mut succeeded = 0;
            let mut failed = 0;

            for path in collect_images(&dir)? {
                let request = budget.request(&path, &config);
                let outcome = resize_to_budget(&request, &options, None);
                let saved = match &outcome {
                    Ok(result) if budget.saving() => {
                        persist::save(&path, result, budget.output_dir.as_deref()).map(|_| ())
                    }
                    _ => Ok(()),
                };

                match saved {
                    Err(err) => {
                        println!("{}", output::format_save_failure(&path, &err));
                        failed += 1;
                    }
                    Ok(()) => {
                        println!("{}", output::format_batch_line(&path, &outcome));
                        if outcome.is_ok() {
                            succeeded += 1;
                        } else {
                            failed += 1;
                        }
                    }
                }
            }

            println!("{}", output::format_batch_summary(succeeded, failed));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Drain progress events on a separate thread so rendering never blocks a run.
fn spawn_printer() -> (Sender<ResizeEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_event(&event);
        }
    });
    (tx, printer)
}

/// Decodable images under `dir`, in a stable order.
fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && has_supported_extension(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
