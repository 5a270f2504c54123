use clap::{Parser, Subcommand, ValueEnum};

use crate::generators::Generator;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the resolved metadata of each type descriptor
    Resolve {
        #[arg(required = true, help = "Type descriptors, e.g. uint64 or \"table Order\"")]
        descriptors: Vec<String>,

        #[arg(long = "table", value_name = "NAME", help = "Declare a table that may be referenced")]
        tables: Vec<String>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Generate bindings for a row of fields
    Generate {
        #[arg(long, help = "Name of the generated row type")]
        name: String,

        #[arg(
            long = "field",
            value_name = "NAME=DESCRIPTOR",
            value_parser = parse_field,
            required = true
        )]
        fields: Vec<(String, String)>,

        #[arg(long = "table", value_name = "NAME", help = "Declare a table that may be referenced")]
        tables: Vec<String>,

        #[arg(long, value_enum, default_value_t)]
        generator: Generator,
    },
}

fn parse_field(arg: &str) -> Result<(String, String), String> {
    let (name, descriptor) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=DESCRIPTOR, got {arg:?}"))?;
    Ok((name.to_owned(), descriptor.to_owned()))
}
