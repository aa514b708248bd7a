//! `gradedoc` - grading reports from schema-less model output

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use gradedoc_cli::config::{Config, CONFIG_FILE_NAME, DEFAULT_CONFIG};
use gradedoc_cli::{correct, CommandGenerator};
use gradedoc_core::{
    assemble, inspect, JsonOptions, JsonSerializer, Labels, Language, MarkdownSerializer,
};
use gradedoc_render::{PageSize, RenderOptions, ReportRenderer};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if output should be shown (not quiet)
    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Default log filter for this level
    const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
enum OutputFormat {
    /// PDF report (default)
    Pdf,
    /// Markdown
    Markdown,
    /// JSON report model
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "gradedoc",
    about = "Turn AI grading results into readable reports",
    long_about = "Turn grading data produced by a language model into a paginated PDF report.\n\
                  \n\
                  Field roles are inferred from key names, so inputs do not need a fixed schema.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Use this configuration file on top of the discovered ones
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render grading data to a PDF, Markdown or JSON report
    #[command(long_about = "Render grading data to a report.\n\
                      \n\
                      The input is a JSON mapping with a `corrections` list, a list of\n\
                      records, or a single record. Use - to read from stdin.")]
    Render {
        /// Input JSON file, or - for stdin
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (default: <output_dir>/report.pdf for PDF, stdout otherwise)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: OutputFormat,

        /// Report language (fr or en)
        #[arg(long, value_name = "LANG")]
        lang: Option<Language>,

        /// Paper size (letter or a4)
        #[arg(long, value_name = "SIZE")]
        page_size: Option<PageSize>,

        /// Fail instead of writing the plain fallback report
        #[arg(long)]
        no_fallback: bool,

        /// Compact JSON output (no pretty-printing)
        #[arg(long)]
        compact: bool,
    },

    /// Show how the keys of an input are interpreted
    Inspect {
        /// Input JSON file, or - for stdin
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Extract a rubric, grade a student copy and write the report
    #[command(long_about = "Extract a rubric from an exam, grade a student copy and write the report.\n\
                      \n\
                      The generator program receives each prompt on stdin and must print JSON\n\
                      on stdout. Prints the outcome as JSON, or {\"error\": ...} on failure.")]
    Correct {
        /// Exam paper text file
        #[arg(long, value_name = "FILE")]
        exam: PathBuf,

        /// Student copy text file
        #[arg(long, value_name = "FILE")]
        student: PathBuf,

        /// Output PDF (default: <output_dir>/report.pdf)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Generator program (overrides [generator] command)
        #[arg(long, value_name = "PROGRAM")]
        generator: Option<String>,

        /// Argument passed to the generator program (repeatable)
        #[arg(long = "generator-arg", value_name = "ARG", allow_hyphen_values = true)]
        generator_args: Vec<String>,

        /// Report language (fr or en)
        #[arg(long, value_name = "LANG")]
        lang: Option<Language>,
    },

    /// Manage configuration files
    #[command(long_about = "Manage gradedoc configuration files.\n\
                      \n\
                      Configuration files are loaded in this order (later overrides earlier):\n\
                      1. ~/.gradedoc.toml\n\
                      2. ./.gradedoc.toml\n\
                      3. --config PATH")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Create a new .gradedoc.toml configuration file
    Init {
        /// Create in the user home directory instead of the current directory
        #[arg(long)]
        user: bool,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Display the current effective configuration
    Show {
        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);

    let env = env_logger::Env::default().default_filter_or(verbosity.log_filter());
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();

    if let Err(e) = run(args, verbosity) {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run(args: Args, verbosity: Verbosity) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    log::debug!("effective configuration: {config:?}");

    match args.command {
        Commands::Render {
            input,
            output,
            format,
            lang,
            page_size,
            no_fallback,
            compact,
        } => {
            let options = RenderOptions {
                language: config.resolve_language(lang),
                page_size: config.resolve_page_size(page_size),
            };
            let input = read_json(&input)?;
            match format {
                OutputFormat::Pdf => {
                    let destination = config.resolve_output(output);
                    let fallback = config.fallback_enabled(no_fallback);
                    render_pdf(&input, options, &destination, fallback, verbosity)
                }
                OutputFormat::Markdown => {
                    let doc = assemble(&input, &Labels::for_language(options.language))?;
                    let markdown = MarkdownSerializer::new().serialize(&doc)?;
                    emit(output.as_deref(), &markdown, verbosity)
                }
                OutputFormat::Json => {
                    let doc = assemble(&input, &Labels::for_language(options.language))?;
                    let json = JsonSerializer::with_options(JsonOptions { pretty: !compact })
                        .serialize(&doc)?;
                    emit(output.as_deref(), &json, verbosity)
                }
            }
        }

        Commands::Inspect { input } => {
            let inspection = inspect(&read_json(&input)?)?;
            println!("{}", serde_json::to_string_pretty(&inspection)?);
            Ok(())
        }

        Commands::Correct {
            exam,
            student,
            output,
            generator,
            generator_args,
            lang,
        } => {
            let exam_text = fs::read_to_string(&exam)
                .with_context(|| format!("Failed to read exam: {}", exam.display()))?;
            let student_text = fs::read_to_string(&student)
                .with_context(|| format!("Failed to read student copy: {}", student.display()))?;
            let Some((program, program_args)) = config.resolve_generator(generator, generator_args)
            else {
                bail!(
                    "No generator configured: pass --generator or set [generator] command in {CONFIG_FILE_NAME}"
                );
            };

            let generator = CommandGenerator::new(program).with_args(program_args);
            let renderer = ReportRenderer::with_options(RenderOptions {
                language: config.resolve_language(lang),
                page_size: config.resolve_page_size(None),
            });
            let destination = config.resolve_output(output);

            match correct(&generator, &exam_text, &student_text, &renderer, &destination) {
                Ok(outcome) => {
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                    Ok(())
                }
                Err(e) => {
                    println!("{}", serde_json::json!({ "error": e.to_string() }));
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Init { user, force } => config_init(user, force, verbosity),
            ConfigAction::Show { json } => config_show(&config, json),
        },
    }
}

/// Read a JSON document from a file, or stdin for `-`
fn read_json(path: &Path) -> Result<Value> {
    let (content, source) = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        (buffer, "stdin".to_string())
    } else {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input: {}", path.display()))?;
        (content, path.display().to_string())
    };
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {source}"))
}

fn render_pdf(
    input: &Value,
    options: RenderOptions,
    destination: &Path,
    fallback: bool,
    verbosity: Verbosity,
) -> Result<()> {
    let renderer = ReportRenderer::with_options(options);
    let path = if fallback {
        let outcome = renderer.render_with_fallback(input, destination)?;
        if outcome.used_fallback && verbosity.should_show_output() {
            eprintln!(
                "{} Structured report failed, wrote the plain fallback report instead",
                "Warning:".yellow().bold()
            );
        }
        outcome.path
    } else {
        renderer.render(input, destination)?
    };

    if verbosity.should_show_output() {
        println!(
            "{} Report written to {}",
            "Success:".green().bold(),
            path.display()
        );
    }
    Ok(())
}

/// Write text to a file, or stdout when no file is given
fn emit(output: Option<&Path>, text: &str, verbosity: Verbosity) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, text)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            if verbosity.should_show_output() {
                println!("{} Wrote {}", "Success:".green().bold(), path.display());
            }
        }
        None if text.ends_with('\n') => print!("{text}"),
        None => println!("{text}"),
    }
    Ok(())
}

/// Create a new configuration file from the commented template
fn config_init(user: bool, force: bool, verbosity: Verbosity) -> Result<()> {
    let config_path = if user {
        Config::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
    } else {
        Config::project_config_path()
    };

    if config_path.exists() && !force {
        eprintln!(
            "{} Configuration file already exists: {}",
            "Error:".red().bold(),
            config_path.display()
        );
        eprintln!("{} Use --force to overwrite", "Hint:".cyan().bold());
        std::process::exit(1);
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    if verbosity.should_show_output() {
        println!(
            "{} Created configuration file: {}",
            "Success:".green().bold(),
            config_path.display()
        );
    }
    Ok(())
}

/// Display the current effective configuration
fn config_show(config: &Config, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}
