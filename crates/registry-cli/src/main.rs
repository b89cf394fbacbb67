//! # registry-cli
//!
//! CLI for the schema registry engine: validate payloads and types against
//! attribute definitions, inspect definition files, and run a registration
//! flow against the in-memory store.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use registry_introspect::{
    load_attributes_from_file, load_descriptor_from_file,
};
use registry_lifecycle::{
    ApproveSchemaRequest, CreateSchemaRequest, ProcessorHub, SchemaContext, SchemaEvent,
};
use registry_model::ValidationType;
use registry_store::{CounterVersionIds, MemoryRepository};
use registry_validation::ValidationEngine;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sreg")]
#[command(about = "Schema registry engine CLI")]
#[command(version)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Validate a JSON payload against an attribute definition file
    Validate {
        /// Attribute definition file (JSON or YAML)
        #[arg(short, long)]
        schema: PathBuf,

        /// Payload file (JSON)
        payload: PathBuf,

        /// Validation strictness
        #[arg(short, long, value_enum, default_value_t = Mode::Matching)]
        mode: Mode,
    },

    /// Check a type descriptor against an attribute definition file
    Check {
        /// Attribute definition file (JSON or YAML)
        #[arg(short, long)]
        schema: PathBuf,

        /// Type descriptor file (JSON or YAML)
        descriptor: PathBuf,

        /// Validation strictness
        #[arg(short, long, value_enum, default_value_t = Mode::Matching)]
        mode: Mode,
    },

    /// Parse an attribute definition file and print its wire form
    Show {
        /// Attribute definition file (JSON or YAML)
        schema: PathBuf,
    },

    /// Run a registration flow against an in-memory store
    Register {
        /// Create request file (JSON)
        request: PathBuf,

        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Acting user's email
        #[arg(short, long)]
        email: String,

        /// Also approve the created version
        #[arg(long)]
        approve: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Undeclared extra fields are violations
    Strict,

    /// Undeclared extra fields are tolerated
    Matching,
}

impl From<Mode> for ValidationType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Strict => ValidationType::Strict,
            Mode::Matching => ValidationType::Matching,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            schema,
            payload,
            mode,
        } => {
            tracing::info!("Validating {} against {}", payload.display(), schema.display());

            let attributes = load_attributes_from_file(&schema)
                .with_context(|| format!("loading schema {}", schema.display()))?;
            let document: serde_json::Value = serde_json::from_str(
                &std::fs::read_to_string(&payload)
                    .with_context(|| format!("reading payload {}", payload.display()))?,
            )
            .context("parsing payload JSON")?;

            let messages =
                ValidationEngine::new().validate_payload(&document, mode.into(), &attributes);

            if messages.is_empty() {
                println!("OK: payload matches {} attributes", attributes.len());
            } else {
                for message in &messages {
                    println!("{message}");
                }
                std::process::exit(1);
            }
        }
        Commands::Check {
            schema,
            descriptor,
            mode,
        } => {
            tracing::info!("Checking {} against {}", descriptor.display(), schema.display());

            let attributes = load_attributes_from_file(&schema)
                .with_context(|| format!("loading schema {}", schema.display()))?;
            let descriptor = load_descriptor_from_file(&descriptor)
                .with_context(|| format!("loading descriptor {}", descriptor.display()))?;

            let violations = ValidationEngine::new().validate_against_type(
                &attributes,
                mode.into(),
                &descriptor,
            );

            if violations.is_empty() {
                println!("OK: {} is shape-compatible", descriptor.name);
            } else {
                for violation in &violations {
                    println!("{} [{}]", violation.message, violation.root_type);
                }
                std::process::exit(1);
            }
        }
        Commands::Show { schema } => {
            let attributes = load_attributes_from_file(&schema)
                .with_context(|| format!("loading schema {}", schema.display()))?;

            for attribute in &attributes {
                attribute
                    .validate()
                    .with_context(|| format!("attribute '{}'", attribute.name))?;
            }

            println!("{}", serde_json::to_string_pretty(&attributes)?);
        }
        Commands::Register {
            request,
            user,
            email,
            approve,
        } => {
            let request: CreateSchemaRequest = serde_json::from_str(
                &std::fs::read_to_string(&request)
                    .with_context(|| format!("reading request {}", request.display()))?,
            )
            .context("parsing create request")?;

            let hub = ProcessorHub::builder()
                .repository(Arc::new(MemoryRepository::new()))
                .version_ids(Arc::new(CounterVersionIds::new()))
                .build()?;

            let mut context = SchemaContext::with_actor(&user, &email);
            let namespace = request.namespace.clone();
            let schema_name = request.schema_name.clone();
            context.put_create_request(request);
            hub.process(SchemaEvent::Create, &mut context)?;

            if approve {
                let version = context.details()?.schema_key.version.clone();
                let mut approval = SchemaContext::with_actor(&user, &email);
                approval.put_approve_request(ApproveSchemaRequest {
                    namespace,
                    schema_name,
                    version,
                });
                hub.process(SchemaEvent::Approve, &mut approval)?;
                context = approval;
            }

            println!("{}", serde_json::to_string_pretty(context.details()?)?);
        }
    }

    Ok(())
}
