use clap::{Parser as ClapParser, Subcommand};
use sieve_filter::{
    LogicalOperator,
    cli::{self, CheckOptions, CheckResult, CliError, GroupOptions, StringifyCommand},
};
use std::io::{self, Read};
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "sieve")]
#[command(about = "Sieve - parse, normalize, and group OData-style filter expressions")]
#[command(version)]
struct Cli {
    /// Log parser and grouping steps to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a filter and print it in canonical form
    Check {
        /// The filter to check
        query: String,

        /// Only validate syntax, don't print the canonical form
        #[arg(long)]
        syntax_only: bool,

        /// Keep unrecognized value tokens as bare strings
        #[arg(long)]
        lenient: bool,
    },

    /// Group a filter's values per field and operator, printed as JSON
    Group {
        /// The filter to group
        query: String,

        /// Comma-separated list of allowed fields
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Keep unrecognized value tokens as bare strings
        #[arg(long)]
        lenient: bool,
    },

    /// Render grouped JSON back into a filter
    Stringify {
        /// Grouped JSON (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Operator joining the groups
        #[arg(long, default_value = "and", value_parser = parse_logical)]
        operator: LogicalOperator,

        /// Operator joining the values inside a group
        #[arg(long, default_value = "or", value_parser = parse_logical)]
        sub_operator: LogicalOperator,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'sieve docs' to list categories)
        category: String,
    },
}

fn parse_logical(s: &str) -> Result<LogicalOperator, String> {
    match s.parse::<LogicalOperator>() {
        Ok(LogicalOperator::Not) | Err(_) => Err(format!("expected 'and' or 'or', got '{}'", s)),
        Ok(op) => Ok(op),
    }
}

fn setup_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        debug!("Logger has already been set up, continuing...");
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logger(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            query,
            syntax_only,
            lenient,
        } => run_check(query, syntax_only, lenient),
        Commands::Group {
            query,
            keys,
            pretty,
            lenient,
        } => run_group(query, keys, pretty, lenient),
        Commands::Stringify {
            input,
            operator,
            sub_operator,
        } => run_stringify(input, operator, sub_operator),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(query: String, syntax_only: bool, lenient: bool) -> Result<(), CliError> {
    let options = CheckOptions {
        query,
        syntax_only,
        lenient,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Canonical(text) => println!("{}", text),
    }
    Ok(())
}

fn run_group(query: String, keys: Vec<String>, pretty: bool, lenient: bool) -> Result<(), CliError> {
    let options = GroupOptions {
        query,
        keys,
        lenient,
    };

    let output = cli::execute_group(&options)?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_stringify(
    input: Option<String>,
    operator: LogicalOperator,
    sub_operator: LogicalOperator,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let command = StringifyCommand {
        input,
        operator,
        sub_operator,
    };
    println!("{}", cli::execute_stringify(&command)?);
    Ok(())
}
