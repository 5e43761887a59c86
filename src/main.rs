use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use envoy_accesslog::{
    AccessLogConfig, FormatKind, FormatSource, Result, catalog, fields, required_extensions,
    violations,
};

#[derive(Parser)]
#[command(name = "envoy-accesslog")]
#[command(about = "Envoy access log format validator", long_about = None)]
struct Cli {
    /// Emit diagnostics as JSON lines on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an access log configuration file (JSON).
    Check {
        #[arg(long)]
        config: String,
    },

    /// Validate a raw Envoy format string and report every violation.
    Format {
        format: String,

        /// Append the trailing newline shells make awkward to pass.
        #[arg(long)]
        append_newline: bool,
    },

    /// Resolve a JSON field list and print the resulting field map.
    Fields {
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Print the formatter extensions a format string or field list needs.
    Extensions {
        #[arg(long, default_value = "envoy")]
        format: FormatKind,

        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// List the recognized operators.
    Operators,
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.cmd {
        Commands::Check { config } => {
            let parsed = AccessLogConfig::from_json_file(&config)?;
            parsed
                .validate()
                .with_context(|| format!("invalid access log config {}", config))?;

            println!("ok");
            println!("format: {}", parsed.format);
            println!("level: {}", parsed.level);
            if parsed.format == FormatKind::Json {
                println!("{}", serde_json::to_string_pretty(&parsed.field_map())?);
            }
            for extension in parsed.required_extensions() {
                println!("extension: {}", extension);
            }
        }
        Commands::Format {
            mut format,
            append_newline,
        } => {
            if append_newline {
                format.push('\n');
            }
            let errors = violations(&format);
            if !errors.is_empty() {
                for err in &errors {
                    eprintln!("{}", err);
                }
                bail!("{} violation(s) in format string", errors.len());
            }
            println!("ok");
        }
        Commands::Fields { items } => {
            fields::validate(&items)?;
            let map = fields::canonicalize(&items);
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Commands::Extensions { format, inputs } => {
            let found = match format {
                FormatKind::Envoy => {
                    let [format_string] = inputs.as_slice() else {
                        bail!("envoy format takes exactly one format string");
                    };
                    required_extensions(FormatSource::Envoy(format_string))
                }
                FormatKind::Json => {
                    let map = fields::canonicalize(&inputs);
                    required_extensions(FormatSource::Json(&map))
                }
            };
            for extension in found {
                println!("{}", extension);
            }
        }
        Commands::Operators => {
            for op in catalog::operators() {
                let mut flags = Vec::new();
                if op.args_optional {
                    flags.push("args-optional");
                }
                if op.truncate_disallowed {
                    flags.push("no-truncate");
                }
                println!("{:<48} {:<8} {}", op.name, op.class.to_string(), flags.join(","));
            }
        }
    }

    Ok(())
}
