use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use celparse::config::{self, Config};
use celparse::diagnostics::Diagnostics;

#[derive(Parser)]
#[command(name = "celparse", version, about = "Parse and format CEL expressions")]
struct Cli {
    /// Config file path (defaults to the nearest celparse.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an expression and print its syntax tree
    Parse {
        #[command(flatten)]
        input: Input,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Debug)]
        format: Format,
    },
    /// Parse an expression and print it back in canonical form
    Fmt {
        #[command(flatten)]
        input: Input,
        /// Override the wrap column from the config
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        wrap_column: Option<u64>,
    },
    /// Parse each file and report syntax errors
    Check {
        /// Files containing one expression each
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Debug,
    Json,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Input {
    /// Expression text
    expr: Option<String>,
    /// Read the expression from a file
    #[arg(long)]
    file: Option<PathBuf>,
}

impl Input {
    /// Returns the display name and the source text.
    fn read(self) -> (String, String) {
        match (self.expr, self.file) {
            (Some(expr), _) => ("<expr>".to_string(), expr),
            (None, Some(path)) => {
                let source = read_file(&path);
                (path.display().to_string(), source)
            }
            // clap's arg group guarantees one of the two
            (None, None) => fail("no expression given"),
        }
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("error: {msg}");
    std::process::exit(1);
}

fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("cannot read {}: {e}", path.display())))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Config {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    config::resolve(explicit, &cwd).unwrap_or_else(|err| fail(&err.to_string()))
}

fn report(diags: &Diagnostics, source: &str, name: &str) {
    eprint!("{}", diags.render(source, name));
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Parse { input, format } => {
            let (name, source) = input.read();
            match celparse::parse_with_options(&source, config.parser) {
                Ok(expr) => match format {
                    Format::Debug => println!("{expr:#?}"),
                    Format::Json => match serde_json::to_string_pretty(&expr) {
                        Ok(json) => println!("{json}"),
                        Err(e) => fail(&format!("cannot serialize syntax tree: {e}")),
                    },
                },
                Err(diags) => {
                    report(&diags, &source, &name);
                    std::process::exit(1);
                }
            }
        }
        Commands::Fmt { input, wrap_column } => {
            let (name, source) = input.read();
            let mut options = config.unparse;
            if let Some(column) = wrap_column {
                options.wrap_on_column = usize::try_from(column).unwrap_or(usize::MAX);
            }
            match celparse::parse_with_options(&source, config.parser) {
                Ok(expr) => println!("{}", celparse::unparse_with_options(&expr, &options)),
                Err(diags) => {
                    report(&diags, &source, &name);
                    std::process::exit(1);
                }
            }
        }
        Commands::Check { files } => {
            let mut failed = 0usize;
            for path in &files {
                let name = path.display().to_string();
                let source = match std::fs::read_to_string(path) {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("error: cannot read {name}: {e}");
                        failed += 1;
                        continue;
                    }
                };
                match celparse::parse_with_options(&source, config.parser) {
                    Ok(_) => tracing::debug!(file = %name, "ok"),
                    Err(diags) => {
                        tracing::debug!(file = %name, errors = diags.len(), "failed");
                        report(&diags, &source, &name);
                        failed += 1;
                    }
                }
            }
            tracing::info!(checked = files.len(), failed, "check finished");
            if failed > 0 {
                eprintln!("{failed} of {} file(s) failed", files.len());
                std::process::exit(1);
            }
        }
    }
}
