use std::env;
use std::fs;
use std::io::{self, Read, Write};

use anyhow::Error;
use clap::{value_t, values_t, App, AppSettings, Arg, ArgMatches};
use env_logger::{fmt, Builder, Target};
use log::{error, info};
use log::{Level, LevelFilter, Record};

use bucketsat::config::{SolverConfig, SolverConfigUpdate};
use bucketsat::solver::Solver;

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            error!("{}", err);
            1
        }
        Ok(exit_code) => exit_code,
    };
    std::process::exit(exit_code);
}

/// Write a log message as DIMACS comment lines.
///
/// Every line of a multi-line message gets its own `c ` prefix.
fn write_comment(out: &mut impl Write, level: Level, message: &str) -> io::Result<()> {
    let mut lines = message.lines();
    let first = lines.next().unwrap_or("");
    if level == Level::Info {
        writeln!(out, "c {}", first)?;
    } else {
        writeln!(out, "c {}: {}", level, first)?;
    }
    for line in lines {
        writeln!(out, "c {}", line)?;
    }
    Ok(())
}

fn init_logging(filter: LevelFilter) {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        write_comment(buf, record.level(), &record.args().to_string())
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stdout)
        .format(format)
        .filter(None, filter);

    if let Ok(ref env_var) = env::var("BUCKETSAT_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn banner() {
    info!("This is bucketsat {}", env!("BUCKETSAT_VERSION"));
    info!(
        "  {} build - {}",
        env!("BUCKETSAT_PROFILE"),
        env!("BUCKETSAT_RUSTC_VERSION")
    );
}

/// Log filter for a `--verbosity` value.
fn verbosity_filter(verbosity: &str) -> LevelFilter {
    match verbosity {
        "quiet" => LevelFilter::Error,
        "full" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Collect the configuration from the config file, `-C` options and `--jobs`.
fn config_update(matches: &ArgMatches) -> Result<SolverConfigUpdate, Error> {
    let mut config_update = SolverConfigUpdate::new();

    if let Some(config_path) = matches.value_of("config-file") {
        let mut config_contents = String::new();
        fs::File::open(config_path)?.read_to_string(&mut config_contents)?;

        config_update.merge(toml::from_str(&config_contents)?);
    }

    for config_option in values_t!(matches, "config-option", String).unwrap_or_default() {
        config_update.merge(toml::from_str(&config_option)?);
    }

    if matches.is_present("jobs") {
        config_update.worker_count = Some(value_t!(matches, "jobs", usize)?);
    }

    Ok(config_update)
}

fn main_with_err() -> Result<i32, Error> {
    let matches = App::new("bucketsat")
        .version(env!("BUCKETSAT_VERSION"))
        .setting(AppSettings::DisableHelpSubcommand)
        .arg_from_usage("[INPUT] 'The input file to use (stdin if omitted)'")
        .arg_from_usage("[config-file] --config=[FILE] 'Read parameters from configuration file'")
        .arg(
            Arg::from_usage("[config-option] -C --config-option")
                .value_name("OPTION>=<VALUE")
                .help(
                    "Specify a single config option, see 'bucketsat -C help' for a list of \
                     options.",
                )
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::from_usage("[jobs] -j --jobs=[N] 'Number of worker threads (0 for all cores)'")
                .validator(|value| {
                    value
                        .parse::<usize>()
                        .map(|_| ())
                        .map_err(|err| err.to_string())
                }),
        )
        .arg(
            Arg::from_usage("[verbosity] --verbosity=[LEVEL] 'Amount of diagnostic output.'")
                .possible_values(&["quiet", "progress", "full"])
                .default_value("progress")
                .case_insensitive(true),
        )
        .get_matches();

    if values_t!(matches, "config-option", String)
        .unwrap_or_default()
        .iter()
        .any(|option| option == "help")
    {
        print!("{}", SolverConfig::help());
        return Ok(0);
    }

    let verbosity = matches
        .value_of("verbosity")
        .unwrap_or("progress")
        .to_ascii_lowercase();

    init_logging(verbosity_filter(&verbosity));
    banner();

    let mut solver = Solver::new();

    solver.config(&config_update(&matches)?)?;

    let stdin = io::stdin();

    let mut locked_stdin;
    let mut opened_file;

    let file = match matches.value_of("INPUT") {
        Some(path) => {
            info!("Reading file '{}'", path);
            opened_file = fs::File::open(path)?;
            &mut opened_file as &mut dyn io::Read
        }
        None => {
            info!("Reading from stdin");
            locked_stdin = stdin.lock();
            &mut locked_stdin as &mut dyn io::Read
        }
    };

    solver.add_dimacs_cnf(file)?;

    let sat = solver.solve()?;

    let stats = solver.stats();
    info!(
        "Loaded {} clauses ({} tautologies, {} duplicates) in {:.3}s",
        stats.input_clauses,
        stats.tautological_inputs,
        stats.duplicate_inputs,
        stats.load_time.as_secs_f64()
    );

    if sat {
        println!("s SATISFIABLE");
        Ok(10)
    } else {
        println!("s UNSATISFIABLE");
        Ok(20)
    }
}
