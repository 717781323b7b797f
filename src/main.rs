//! spec-builder - command-line front end for the specification store.
//!
//! Every command loads the persisted specification, applies one operation and
//! saves it back through the configured key-value store.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use thiserror::Error;

use spec_builder::adapters::{FileKeyValueStore, InMemoryKeyValueStore, PulldownMarkdownRenderer};
use spec_builder::application::DocumentStore;
use spec_builder::config::{AppConfig, ConfigError, HtmlRenderer, StorageBackend};
use spec_builder::domain::export::{ExportFormat, Exporter};
use spec_builder::domain::foundation::{DomainError, SectionId};
use spec_builder::domain::specification::{content_map, MetadataUpdate, NewSection};
use spec_builder::domain::templates::TemplateRegistry;
use spec_builder::ports::KeyValueStore;
use spec_builder::telemetry::{self, TelemetryError};

/// Specification builder
#[derive(Parser)]
#[command(name = "spec-builder")]
#[command(about = "Assemble, validate and export structured specifications")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Optional TOML configuration file
    #[arg(short, long, global = true, env = "SPEC_BUILDER_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new empty specification
    Init {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        /// Semver version (default from configuration)
        #[arg(long)]
        version: Option<String>,
    },

    /// Append a section
    AddSection {
        /// Template id of the section
        #[arg(long = "type")]
        section_type: String,

        #[arg(long)]
        title: Option<String>,

        /// Section content as a JSON object
        #[arg(long)]
        content: Option<String>,
    },

    /// Remove a section by id
    RemoveSection { id: String },

    /// List registered templates
    Templates {
        #[arg(long)]
        category: Option<String>,
    },

    /// Validate the specification and print the report
    Validate,

    /// Export the specification
    Export {
        /// markdown, md, json or html (default from configuration)
        #[arg(short, long)]
        format: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid section content: {0}")]
    InvalidContent(String),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Failed to {0} the specification")]
    Persistence(&'static str),

    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = AppConfig::load_from(cli.config.as_deref())?;
    config.validate().map_err(ConfigError::from)?;
    telemetry::init(&config.logging)?;

    let registry = Arc::new(TemplateRegistry::with_defaults());
    let mut store = build_store(&config, registry.clone());

    match cli.command {
        Commands::Init {
            title,
            author,
            version,
        } => {
            store.clear();
            let mut update = MetadataUpdate::new().title(title).author(author);
            if let Some(version) = version {
                update = update.version(version);
            }
            store.update_metadata(update);
            persist(&mut store).await?;
            println!("Initialised specification \"{}\"", store.metadata().title);
        }

        Commands::AddSection {
            section_type,
            title,
            content,
        } => {
            restore(&mut store).await?;
            let mut input = NewSection::new();
            input.title = title;
            if let Some(raw) = content {
                input.content = Some(parse_content(&raw)?);
            }
            let section = store.add_section(&section_type, input);
            persist(&mut store).await?;
            println!("{}", section.id);
        }

        Commands::RemoveSection { id } => {
            restore(&mut store).await?;
            if !store.remove_section(&SectionId::from_raw(id.as_str())) {
                return Err(CliError::SectionNotFound(id));
            }
            persist(&mut store).await?;
        }

        Commands::Templates { category } => {
            for template in registry.get_all_templates(category.as_deref()) {
                println!(
                    "{:<18} {:<4} {:<10} {}",
                    template.id, template.icon, template.category, template.name
                );
            }
        }

        Commands::Validate => {
            restore(&mut store).await?;
            let report = store.validate();
            println!("{}", report.format());
            if !report.valid {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Export { format, output } => {
            restore(&mut store).await?;
            let format: ExportFormat = match format {
                Some(name) => name.parse()?,
                None => config.export.format().map_err(ConfigError::from)?,
            };
            let content = store.export_as(format)?;
            match output {
                Some(path) => tokio::fs::write(&path, content)
                    .await
                    .map_err(|source| CliError::Output { path, source })?,
                None => println!("{}", content),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn build_store(config: &AppConfig, registry: Arc<TemplateRegistry>) -> DocumentStore {
    let storage: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
        StorageBackend::File => Arc::new(FileKeyValueStore::new(&config.storage.path)),
    };

    let mut exporter = Exporter::new(registry.clone());
    if config.export.html_renderer == HtmlRenderer::Pulldown {
        exporter = exporter.with_renderer(Arc::new(PulldownMarkdownRenderer::new()));
    }

    DocumentStore::new(registry, storage)
        .with_settings(config.store_settings())
        .with_exporter(exporter)
}

fn parse_content(raw: &str) -> Result<spec_builder::domain::specification::ContentMap, CliError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| CliError::InvalidContent(e.to_string()))?;
    if !value.is_object() {
        return Err(CliError::InvalidContent("expected a JSON object".to_string()));
    }
    Ok(content_map(value))
}

async fn restore(store: &mut DocumentStore) -> Result<(), CliError> {
    if store.load(None).await {
        Ok(())
    } else {
        Err(CliError::Persistence("load"))
    }
}

async fn persist(store: &mut DocumentStore) -> Result<(), CliError> {
    if store.save().await {
        Ok(())
    } else {
        Err(CliError::Persistence("save"))
    }
}
