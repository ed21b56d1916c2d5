//! protoc-gen-jsonschema CLI
//!
//! Runs as a protoc plugin when invoked without arguments, or generates
//! schemas straight from a descriptor set file with `--descriptor-set`.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use prost::Message;
use protoc_gen_jsonschema_common::{EnumType, GeneratorConfig};
use protoc_gen_jsonschema_generator::{generate_from_request, generate_from_source, DirectorySink};
use protoc_gen_jsonschema_parser::DescriptorSource;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protoc-gen-jsonschema")]
#[command(version, about = "Generate JSON Schema documents from protobuf messages", long_about = None)]
#[command(after_help = "EXAMPLES:\n  \
    # As a protoc plugin\n  \
    protoc --jsonschema_out=./schemas --jsonschema_opt=enum_type=integer user.proto\n\n  \
    # From a descriptor set\n  \
    protoc --include_imports --include_source_info \\\n    \
    --descriptor_set_out=api.pb user.proto\n  \
    protoc-gen-jsonschema --descriptor-set api.pb --out ./schemas")]
struct Cli {
    /// FileDescriptorSet to generate from instead of a plugin request on stdin
    #[arg(short, long, value_name = "FILE")]
    descriptor_set: Option<PathBuf>,

    /// Output directory [default: .]
    #[arg(short, long, value_name = "DIR", requires = "descriptor_set")]
    out: Option<PathBuf>,

    /// Proto file to generate, repeatable (defaults to every non-library file in the set)
    #[arg(short, long = "file", value_name = "NAME", requires = "descriptor_set")]
    files: Vec<String>,

    /// Rendering of enum fields
    #[arg(long, value_enum, requires = "descriptor_set")]
    enum_type: Option<EnumTypeArg>,

    /// Inline referenced messages as local definitions
    #[arg(long, value_name = "BOOL", requires = "descriptor_set")]
    repeated_defs: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EnumTypeArg {
    /// Value names
    String,
    /// Value numbers
    Integer,
}

impl From<EnumTypeArg> for EnumType {
    fn from(arg: EnumTypeArg) -> Self {
        match arg {
            EnumTypeArg::String => EnumType::String,
            EnumTypeArg::Integer => EnumType::Integer,
        }
    }
}

impl Cli {
    fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::default();
        if let Some(enum_type) = self.enum_type {
            config.enum_type = enum_type.into();
        }
        if let Some(value) = &self.repeated_defs {
            config
                .set("repeated_defs", Some(value.as_str()))
                .context("Invalid --repeated-defs value")?;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match &cli.descriptor_set {
        Some(descriptor_set) => standalone_command(&cli, descriptor_set),
        None => plugin_command(),
    }
}

/// Logs always go to stderr: in plugin mode stdout carries the response
fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))
}

fn plugin_command() -> Result<()> {
    let mut request = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut request)
        .context("Failed to read CodeGeneratorRequest from stdin")?;

    let response = generate_from_request(&request).context("Failed to process plugin request")?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&response.encode_to_vec())
        .context("Failed to write CodeGeneratorResponse")?;
    stdout.flush().context("Failed to write CodeGeneratorResponse")?;
    Ok(())
}

fn standalone_command(cli: &Cli, descriptor_set: &Path) -> Result<()> {
    println!(
        "{} Loading descriptors from: {}",
        "→".cyan(),
        descriptor_set.display()
    );

    let config = cli.generator_config()?;
    let source = DescriptorSource::from_file(descriptor_set, &cli.files)
        .context("Failed to load FileDescriptorSet")?;
    let out = cli.out.clone().unwrap_or_else(|| PathBuf::from("."));

    if cli.verbose {
        println!("  Files: {}", source.files_to_generate().join(", "));
        println!("  Enum type: {}", config.enum_type);
        println!("  Repeated defs: {}", config.repeated_defs);
        println!("  Output: {}", out.display());
    }

    println!("{} Generating schemas...", "→".cyan());
    let mut sink = DirectorySink::new(&out).context("Failed to prepare output directory")?;
    let emitted = generate_from_source(&source, config, &mut sink)
        .context("Failed to generate schemas")?;

    if emitted == 0 {
        println!("{} No messages to generate", "⚠".yellow());
        return Ok(());
    }

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    for path in sink.written() {
        println!("  📄 {}", path.display());
    }

    Ok(())
}
