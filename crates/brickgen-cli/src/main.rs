//! brickgen - bindings generator entry point
//!
//! Loads the device configs once and runs the requested generators over them.

mod config;

use anyhow::{bail, Context, Result};
use brickgen_bindings::csharp::{CSharp, CSharpBindingsGenerator, CSharpExamplesGenerator};
use brickgen_bindings::json::{Json, JsonBindingsGenerator};
use brickgen_bindings::{run, DocGenerator, GeneratorContext, ZipGenerator};
use brickgen_core::{DeviceRegistry, Language};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "brickgen")]
#[command(about = "Generate bindings, documentation and release archives from device configs")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "brickgen.toml")]
    config: PathBuf,

    /// Repository root, overrides the configuration file
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate all device configs
    Check,
    /// Print all devices
    List {
        /// Only released devices
        #[arg(long)]
        released: bool,
    },
    /// Generate bindings source files
    Bindings { bindings: Bindings },
    /// Generate example programs
    Examples { bindings: Bindings },
    /// Generate API documentation
    Doc {
        bindings: Bindings,
        /// Documentation language, overrides the configuration file
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Package the released files into a ZIP archive
    Zip { bindings: Bindings },
    /// Bindings, examples, documentation and archive in one go
    All {
        bindings: Bindings,
        #[arg(long)]
        lang: Option<Language>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Bindings {
    Csharp,
    Json,
}

impl Bindings {
    fn name(self) -> &'static str {
        match self {
            Self::Csharp => "csharp",
            Self::Json => "json",
        }
    }

    fn has_examples(self) -> bool {
        self == Self::Csharp
    }
}

fn context(config: &Config, bindings: Bindings, language: Language) -> GeneratorContext {
    let ctx = GeneratorContext::new(&config.generator.root, bindings.name(), language)
        .with_configs_dir(config.configs_dir());
    match &config.zip.tmp_dir {
        Some(tmp_dir) => ctx.with_tmp_dir(tmp_dir),
        None => ctx,
    }
}

fn load_registry(config: &Config) -> Result<DeviceRegistry> {
    let dir = config.configs_dir();
    DeviceRegistry::load_dir(&dir)
        .with_context(|| format!("Failed to load device configs from {}", dir.display()))
}

fn generate_bindings(
    ctx: &GeneratorContext,
    registry: &DeviceRegistry,
    bindings: Bindings,
) -> Result<()> {
    match bindings {
        Bindings::Csharp => run(ctx, registry, &mut CSharpBindingsGenerator::new()),
        Bindings::Json => run(ctx, registry, &mut JsonBindingsGenerator::new()),
    }
    .with_context(|| format!("Failed to generate {} bindings", bindings.name()))?;
    Ok(())
}

fn generate_examples(
    ctx: &GeneratorContext,
    registry: &DeviceRegistry,
    bindings: Bindings,
) -> Result<()> {
    if !bindings.has_examples() {
        bail!("{} bindings have no example programs", bindings.name());
    }
    run(ctx, registry, &mut CSharpExamplesGenerator::new())
        .with_context(|| format!("Failed to generate {} examples", bindings.name()))?;
    Ok(())
}

fn generate_doc(
    ctx: &GeneratorContext,
    registry: &DeviceRegistry,
    bindings: Bindings,
) -> Result<()> {
    match bindings {
        Bindings::Csharp => run(ctx, registry, &mut DocGenerator::new(CSharp)),
        Bindings::Json => run(ctx, registry, &mut DocGenerator::new(Json)),
    }
    .with_context(|| format!("Failed to generate {} documentation", bindings.name()))?;
    Ok(())
}

fn generate_zip(
    ctx: &GeneratorContext,
    registry: &DeviceRegistry,
    bindings: Bindings,
) -> Result<()> {
    let mut generator = ZipGenerator::new();
    run(ctx, registry, &mut generator)
        .with_context(|| format!("Failed to package {} bindings", bindings.name()))?;
    if let Some(archive) = generator.archive() {
        println!("{}", archive.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("brickgen v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load_config(&args.config)?;
    if let Some(root) = args.root {
        config.generator.root = root;
    }

    info!(
        root = %config.generator.root.display(),
        configs = %config.configs_dir().display(),
        "Configuration loaded"
    );

    let registry = load_registry(&config)?;
    let doc_language = config.generator.doc_language;

    match args.command {
        Command::Check => {
            println!("{} device configs are valid", registry.len());
        }
        Command::List { released } => {
            for device in registry.devices().filter(|d| d.released || !released) {
                let mut flags = Vec::new();
                if device.released {
                    flags.push("released");
                }
                if device.documented {
                    flags.push("documented");
                }
                println!(
                    "{:>5}  {} [{}]",
                    device.identifier,
                    device.long_display_name(),
                    flags.join(", ")
                );
            }
        }
        Command::Bindings { bindings } => {
            generate_bindings(&context(&config, bindings, doc_language), &registry, bindings)?;
        }
        Command::Examples { bindings } => {
            generate_examples(&context(&config, bindings, doc_language), &registry, bindings)?;
        }
        Command::Doc { bindings, lang } => {
            let ctx = context(&config, bindings, lang.unwrap_or(doc_language));
            generate_doc(&ctx, &registry, bindings)?;
        }
        Command::Zip { bindings } => {
            generate_zip(&context(&config, bindings, doc_language), &registry, bindings)?;
        }
        Command::All { bindings, lang } => {
            let ctx = context(&config, bindings, lang.unwrap_or(doc_language));
            generate_bindings(&ctx, &registry, bindings)?;
            if bindings.has_examples() {
                generate_examples(&ctx, &registry, bindings)?;
            }
            generate_doc(&ctx, &registry, bindings)?;
            generate_zip(&ctx, &registry, bindings)?;
        }
    }

    Ok(())
}
