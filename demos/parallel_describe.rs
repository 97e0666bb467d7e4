use std::env;
use std::fs;
use std::io;
use std::time::Instant;

use mzfilter::filter::FilterLineParser;
use mzfilter::provider::par_parse_lines;

fn main() -> io::Result<()> {
    env_logger::init();
    let inpath = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Please provide a path to a file of filter lines");
        std::process::exit(1)
    });

    let text = fs::read_to_string(inpath)?;
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    let start = Instant::now();
    let parsed = par_parse_lines(&FilterLineParser::default(), &lines);
    let elapsed = start.elapsed();

    let mut levels = [0usize; 11];
    let mut failures = 0;
    for result in parsed.iter() {
        match result {
            Ok(filter) => levels[(filter.ms_level() as usize).min(10)] += 1,
            Err(_) => failures += 1,
        }
    }
    println!("Parsed {} lines in {:0.3}s", lines.len(), elapsed.as_secs_f64());
    for (level, count) in levels.iter().enumerate().filter(|(_, c)| **c > 0) {
        println!("MS{level}: {count}");
    }
    println!("Failures: {failures}");
    Ok(())
}
