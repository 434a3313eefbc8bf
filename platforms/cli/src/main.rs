use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracetm::{simulate, MachineCatalog, MachineLoader, NtmError, Program, DEFAULT_MAX_STEPS};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Traces a non-deterministic Turing machine breadth-first over one or more inputs.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tracetm --machine machines/equal-01s.csv 10101
  tracetm --builtin \"Contains 11\" --json 0110 000
  tracetm --list")]
struct Cli {
    /// The machine description file to execute
    #[clap(short, long, conflicts_with = "builtin")]
    machine: Option<PathBuf>,

    /// The name of a built-in machine to execute
    #[clap(short, long)]
    builtin: Option<String>,

    /// The input strings to simulate, one run each
    #[clap(required_unless_present = "list")]
    input: Vec<String>,

    /// Stop a run after this many steps
    #[clap(short = 's', long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Explore until every run is decided, however long it takes
    #[clap(long, conflicts_with = "max_steps")]
    no_limit: bool,

    /// Print one JSON document per input instead of the text report
    #[clap(long)]
    json: bool,

    /// List the built-in machines and exit
    #[clap(short, long)]
    list: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list {
        for name in MachineCatalog::names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let program = match load(&cli) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let table = match program.table() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let max_steps = (!cli.no_limit).then_some(cli.max_steps);

    if !cli.json {
        println!("Machine Name: {}", program.name);
    }

    for input in &cli.input {
        let trace = simulate(&table, input, max_steps);

        if cli.json {
            match serde_json::to_string(&trace) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{trace}");
        }
    }

    ExitCode::SUCCESS
}

/// Loads the machine named on the command line, defaulting to the first built-in one.
fn load(cli: &Cli) -> Result<Program, NtmError> {
    match (&cli.machine, &cli.builtin) {
        (Some(path), _) => MachineLoader::load_program(path),
        (None, Some(name)) => MachineCatalog::get_by_name(name),
        (None, None) => MachineCatalog::get_by_index(0),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
