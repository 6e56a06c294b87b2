//! `main.rs` contains the command-line interface for citelink. It collects the
//! values and options, sets up the logger, assembles the configuration, and
//! passes the configuration to the main function.
#[macro_use]
extern crate slog;

use ansi_term::Color;
use citelink::config::{CitelinkConfig, LinkConfig, Output};
use clap::{crate_version, App, Arg};
use slog::{debug, error, Drain, Level};
use std::{fs::OpenOptions, process, sync::Mutex};

fn main() {
    // Get the command-line arguments and options
    let matches = App::new("citelink")
        .version(crate_version!())
        .about("Links in-text citations in an XHTML chapter to its bibliography")
        .arg(
            Arg::with_name("chapter")
                .value_name("CHAPTER FILE")
                .help("The XHTML chapter containing the citations")
                .index(1)
                .required(true),
        )
        .arg(
            Arg::with_name("bibliography")
                .value_name("BIBLIOGRAPHY FILE")
                .help("The XHTML bibliography with one <li id=\"...\"> per entry")
                .index(2)
                .required(true),
        )
        .arg(
            Arg::with_name("output")
                .value_name("OUTPUT FILE")
                .help("The linked chapter (blank outputs to terminal)")
                .index(3)
                .required(false),
        )
        .arg(
            Arg::with_name("bib_name")
                .short('b')
                .long("bib-name")
                .value_name("NAME")
                .help("The bibliography file name used in links (defaults to the BIBLIOGRAPHY file name)"),
        )
        .arg(
            Arg::with_name("class")
                .short('c')
                .long("class")
                .value_name("CLASS")
                .help("The class given to each link")
                .default_value("xref"),
        )
        .arg(
            Arg::with_name("report")
                .short('r')
                .long("report")
                .value_name("REPORT FILE")
                .help("Writes a JSON report of the links created and citations left unmatched"),
        )
        .arg(
            Arg::with_name("force_overwrite")
                .short('W')
                .long("force_overwrite")
                .takes_value(false)
                .help("Required to overwrite the chapter file with the output"),
        )
        .arg(
            Arg::with_name("debug")
                .short('d')
                .long("debug")
                .takes_value(false)
                .help("Outputs debug log to citelink-log.json")
                .hidden_short_help(true)
                .hidden_long_help(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short('v')
                .long("verbose")
                .value_name("NUMBER")
                .help("Verbosity level between 0 and 5")
                .hidden_short_help(true)
                .hidden_long_help(true)
                .default_value("1"),
        )
        .get_matches();

    // Setup the logger.
    //
    // If the debug flag is set, the log is also output to a file
    // `citelink-log.json`. Otherwise, all logging goes to the terminal.
    let debug = matches.is_present("debug");
    let min_log_level = match matches.value_of("verbose") {
        Some("0") => Level::Critical,
        Some("1") => Level::Error,
        Some("2") => Level::Warning,
        Some("3") => Level::Info,
        Some("4") => Level::Debug,
        Some("5") => Level::Trace,
        _ => Level::Info,
    };

    let term_decorator = slog_term::TermDecorator::new().build();
    let term_drain = slog_term::CompactFormat::new(term_decorator).build().fuse();
    let term_drain = term_drain.filter_level(min_log_level).fuse();

    let _guard: slog_scope::GlobalLoggerGuard = if debug {
        // Setup the file AND terminal loggers
        let log_file = match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open("./citelink-log.json")
        {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "{} Cannot open citelink-log.json: {}",
                    Color::Red.paint("ERRO"),
                    e
                );
                process::exit(1);
            }
        };
        let file_drain = slog_json::Json::new(log_file)
            .set_pretty(true)
            .add_default_keys()
            .build()
            .fuse();
        let file_drain = file_drain.filter_level(Level::Trace).fuse();
        let dual_logger = slog::Logger::root(
            Mutex::new(slog::Duplicate(term_drain, file_drain)).fuse(),
            o!("version" => crate_version!()),
        );
        slog_scope::set_global_logger(dual_logger)
    } else {
        // Setup just the terminal logger
        let term_logger = slog::Logger::root(
            Mutex::new(term_drain).fuse(),
            o!("version" => crate_version!()),
        );
        slog_scope::set_global_logger(term_logger)
    };

    debug!(slog_scope::logger(), "Logger setup");

    // Files. The two positional inputs are required, so clap has already
    // rejected a missing one.
    let chapter = matches.value_of("chapter").unwrap_or_default();
    let bibliography = matches.value_of("bibliography").unwrap_or_default();
    let output = matches.value_of("output");
    let report = matches.value_of("report");

    // Link options
    let bib_name = matches.value_of("bib_name");
    let class = matches.value_of("class");
    let force_overwrite = matches.is_present("force_overwrite");

    // Deal with command-line errors.
    //
    // If the chapter and output are the same file and force_overwrite has not
    // been used, print an error and exit.
    if output == Some(chapter) && !force_overwrite {
        eprintln!("{} The chapter file ({}) and output file ({}) are the same,\n     but the force overwrite option was not set.\n     If you want to overwrite the chapter file, use -W/--force_overwrite.", Color::Red.paint("ERRO"), Color::Blue.paint(chapter), Color::Blue.paint(chapter));
        process::exit(1);
    }

    // Determine the output
    let output_option = match output {
        Some(f) => Output::File(f),
        None => Output::StandardOut,
    };

    // Create the configuration
    let config = CitelinkConfig::new(
        chapter,
        bibliography,
        output_option,
        LinkConfig::new(bib_name, class),
        report,
    );

    // Run the program.
    if let Err(e) = citelink::citelink(config) {
        error!(slog_scope::logger(), "citelink error: {}", e);
        eprintln!("{} {}", Color::Red.paint("ERRO"), e);
        process::exit(1);
    }
}
