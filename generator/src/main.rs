mod cli;
mod generators;

use std::io::{self, Write};

use clap::Parser;
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use cli::{Command, OutputFormat};
use dt_datamod::{resolve, resolve_fields, IdentifierRules, KnownTables, NameValidator};
use generators::{GenerateError, Generator};

#[derive(Debug, Error)]
enum CliError {
    #[error("{failed} of {total} descriptor(s) failed to resolve")]
    Resolve { failed: usize, total: usize },
    #[error(transparent)]
    Fields(#[from] dt_datamod::ResolveErrors),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid row name {0:?}")]
    RowName(String),
}

fn run_resolve(
    out: &mut impl Write,
    descriptors: &[String],
    tables: &KnownTables,
    format: OutputFormat,
) -> Result<(), CliError> {
    let mut failed = 0;
    for descriptor in descriptors {
        let field_type = match resolve(descriptor, tables) {
            Ok(field_type) => field_type,
            Err(err) => {
                error!("{err}");
                failed += 1;
                continue;
            }
        };
        match format {
            OutputFormat::Text => writeln!(
                out,
                "{descriptor}: kind={:?} size={} host={} solidity={:?} encode={} decode={}",
                field_type.kind(),
                field_type.size(),
                field_type.host_type(),
                field_type.solidity_type(),
                field_type.encode_func().unwrap_or("-"),
                field_type.decode_func().unwrap_or("-"),
            )?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&field_type)?)?,
        }
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(CliError::Resolve {
            failed,
            total: descriptors.len(),
        })
    }
}

fn run_generate(
    out: &mut impl Write,
    name: &str,
    fields: &[(String, String)],
    tables: &KnownTables,
    generator: Generator,
) -> Result<(), CliError> {
    if !IdentifierRules.is_valid_name(name) {
        return Err(CliError::RowName(name.to_owned()));
    }

    let fields = fields.iter().map(|(n, d)| (n.as_str(), d.as_str()));
    let fields = resolve_fields(fields, tables).map_err(|errors| {
        for err in errors.errors() {
            error!("{err}");
        }
        errors
    })?;
    debug!(row = name, fields = fields.len(), ?generator, "generating bindings");

    let output = generator.generate(name, &fields)?;
    out.write_all(output.as_bytes())?;
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let result = match cli.command {
        Command::Resolve {
            descriptors,
            tables,
            format,
        } => run_resolve(
            &mut io::stdout().lock(),
            &descriptors,
            &tables.into_iter().collect(),
            format,
        ),
        Command::Generate {
            name,
            fields,
            tables,
            generator,
        } => run_generate(
            &mut io::stdout().lock(),
            &name,
            &fields,
            &tables.into_iter().collect(),
            generator,
        ),
    };

    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }
}
