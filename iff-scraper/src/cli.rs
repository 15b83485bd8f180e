use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use getopts::Options;

use crate::cache;

#[derive(Debug)]
pub struct Args {
    pub output: PathBuf,
    pub cache: cache::Config,
    pub delay: Duration,
    pub json: bool,
}

enum Parsed {
    Run(Args),
    Help(String),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "o",
        "output",
        "File to write the calendar to [Default: iff2019.ics, iff2019.json with --json]",
        "PATH",
    );
    opts.optopt(
        "c",
        "cache-dir",
        "Directory holding downloaded pages [Default: .cache]",
        "DIR",
    );
    opts.optflag("", "no-cache", "Always download pages, never store them");
    opts.optopt(
        "d",
        "delay",
        "Pause between day pages [Default: 1]",
        "SECONDS",
    );
    opts.optflag("", "json", "Write the scraped events as JSON instead");
    opts
}

fn try_parse(args: Vec<String>) -> Result<Parsed, String> {
    let opts = opts();
    let matches = opts.parse(args).map_err(|fail| fail.to_string())?;

    if matches.opt_present("help") {
        let usage = opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME")));
        return Ok(Parsed::Help(usage));
    }

    let json = matches.opt_present("json");

    let output = matches.opt_str("output").map_or_else(
        || PathBuf::from(if json { "iff2019.json" } else { "iff2019.ics" }),
        PathBuf::from,
    );

    let cache = cache::Config {
        enabled: !matches.opt_present("no-cache"),
        dir: matches
            .opt_str("cache-dir")
            .map_or_else(|| PathBuf::from(".cache"), PathBuf::from),
    };

    let delay = matches
        .opt_get_default("delay", 1)
        .map(Duration::from_secs)
        .map_err(|err| format!("Provided value for option 'delay' is invalid: {err}"))?;

    Ok(Parsed::Run(Args {
        output,
        cache,
        delay,
        json,
    }))
}

pub fn parse(args: Vec<String>) -> Args {
    match try_parse(args) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help(usage)) => {
            println!("{usage}");
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
