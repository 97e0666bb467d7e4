use std::fs;
use std::io::{self, prelude::*};
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use log::{error, info};

use mzfilter::filter::{FilterLineParser, TailPolicy};
use mzfilter::instrument::InstrumentInfo;

/// Parse Thermo scan filter lines, one per input line, and describe them
#[derive(Debug, Parser)]
struct App {
    /// A file with one filter line per line, or `-` for standard input
    #[arg(default_value = "-")]
    inpath: String,

    /// Treat unrecognized trailing tokens as an error
    #[arg(short, long)]
    strict: bool,

    /// Print each recognized field as a controlled vocabulary term
    #[arg(short, long)]
    params: bool,

    /// The name of the instrument model that wrote the filter lines
    #[arg(short, long)]
    instrument: Option<String>,
}

fn open(inpath: &str) -> io::Result<Box<dyn BufRead>> {
    if inpath == "-" {
        Ok(Box::new(io::BufReader::new(io::stdin())))
    } else {
        let path = PathBuf::from(inpath);
        Ok(Box::new(io::BufReader::new(fs::File::open(path)?)))
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = App::parse();

    let policy = if args.strict {
        TailPolicy::Reject
    } else {
        TailPolicy::Warn
    };
    let parser = FilterLineParser::new().with_tail_policy(policy);

    if let Some(name) = args.instrument.as_deref() {
        let info = InstrumentInfo::from_model_name(name);
        println!("{} ({})", info.model, info.manufacturer);
        for p in info.to_params() {
            println!("\t{p}");
        }
    }

    let mut failures = 0usize;
    let mut total = 0usize;
    for (i, line) in open(&args.inpath)?.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        total += 1;
        match parser.parse(&line) {
            Ok(filter) => {
                println!(
                    "{}\tms{}\t{}\t{}",
                    i + 1,
                    filter.ms_level(),
                    filter.scan_type(),
                    filter
                );
                if args.params {
                    for p in filter.to_params() {
                        println!("\t{p}");
                    }
                }
            }
            Err(e) => {
                error!("Line {}: {e}", i + 1);
                failures += 1;
            }
        }
    }
    info!("Parsed {} of {total} filter lines", total - failures);
    if failures > 0 {
        exit(1)
    }
    Ok(())
}
