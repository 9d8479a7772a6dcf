use clap::{Parser as ClapParser, Subcommand};
use mql_pipeline::cli::{self, CliError, RenderOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "mql")]
#[command(about = "mql - build and normalize aggregation pipelines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild a JSON pipeline through the typed stages and print the wire form
    Render {
        /// JSON array of stage documents (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show the value kind a JSON value coerces to, and its rendered form
    Coerce {
        /// JSON value (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render { input, pretty } => run_render(input, pretty),
        Commands::Coerce { input } => run_coerce(input),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_render(input: Option<String>, pretty: bool) -> Result<(), CliError> {
    let options = RenderOptions {
        input: read_input(input)?,
        pretty,
    };

    let output = cli::execute_render(&options)?;
    let json = if options.pretty {
        mql_pipeline::to_json_pretty(&output)
    } else {
        mql_pipeline::to_json(&output)
    };
    println!("{}", json);
    Ok(())
}

fn run_coerce(input: Option<String>) -> Result<(), CliError> {
    let input = read_input(input)?;
    let result = cli::execute_coerce(input.as_deref())?;

    match result.kind {
        Some(kind) => println!("kind: {}", kind),
        None => println!("kind: unchanged"),
    }
    println!("{}", mql_pipeline::to_json(&result.rendered));
    Ok(())
}
