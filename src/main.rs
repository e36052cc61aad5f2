use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use tabular_prep::data::columnar::pretty_format;
use tabular_prep::data::encode::CodeOrder;
use tabular_prep::data::writer::write_file;
use tabular_prep::pipeline::{average_salary_line, employee_table, prepare_dataset, PrepareOptions};

#[derive(Parser)]
#[command(name = "tabular-prep", version)]
#[command(about = "Prepare labeled tabular datasets and print summary statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dataset, drop identifier columns and encode the label column
    Prepare {
        /// Input file (.csv, .json or .parquet)
        path: PathBuf,

        /// JSON file with preparation options; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Declared column names, replacing the file header
        #[arg(long, value_delimiter = ',', conflicts_with = "use_header")]
        names: Option<Vec<String>>,

        /// Keep the file's own header names
        #[arg(long)]
        use_header: bool,

        /// The CSV file has no header row
        #[arg(long)]
        no_header: bool,

        /// Column to drop (repeatable)
        #[arg(long = "drop")]
        drop: Vec<String>,

        /// Label column to encode
        #[arg(long)]
        label: Option<String>,

        /// Name of the generated code column
        #[arg(long)]
        code_column: Option<String>,

        /// Order in which labels receive codes
        #[arg(long, value_enum)]
        order: Option<CodeOrder>,

        /// Also write the prepared table (.csv, .json or .parquet)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the average salary of the built-in employee table
    Average,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare {
            path,
            config,
            names,
            use_header,
            no_header,
            drop,
            label,
            code_column,
            order,
            output,
        } => {
            let mut options = match &config {
                Some(config) => PrepareOptions::from_json_file(config)
                    .with_context(|| format!("reading config {}", config.display()))?,
                None => PrepareOptions::default(),
            };
            if names.is_some() {
                options.column_names = names;
            }
            if use_header {
                options.column_names = None;
            }
            if no_header {
                options.has_header = false;
            }
            if !drop.is_empty() {
                options.drop = drop;
            }
            if let Some(label) = label {
                options.label_column = label;
            }
            if let Some(code_column) = code_column {
                options.code_column = code_column;
            }
            if let Some(order) = order {
                options.order = order;
            }

            let prepared = prepare_dataset(&path, &options)
                .with_context(|| format!("preparing {}", path.display()))?;

            println!("{}", pretty_format(&prepared.table)?);
            for (code, label) in prepared.categories.legend_entries() {
                info!("{} {code} = {label}", options.code_column);
            }

            if let Some(output) = output {
                write_file(&prepared.table, &output)
                    .with_context(|| format!("writing {}", output.display()))?;
            }
            println!("finished");
        }
        Commands::Average => {
            let table = employee_table()?;
            println!("{}", average_salary_line(&table)?);
        }
    }

    Ok(())
}
