use std::env;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use minid::{Minid, MinidError, MinidGen, Mode, parse_minid, validate_minid};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the default suffix length.
const RAND_LENGTH_ENV: &str = "MINID_RAND_LENGTH";

#[derive(Debug, Clone, PartialEq)]
struct GenerateOpts {
    mode: Mode,
    count: usize,
    rand_length: Option<usize>,
}

impl Default for GenerateOpts {
    fn default() -> Self {
        Self {
            mode: Mode::Random,
            count: 1,
            rand_length: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct InspectOpts {
    mode: Mode,
    rand_length: Option<usize>,
    json: bool,
}

impl Default for InspectOpts {
    fn default() -> Self {
        Self {
            mode: Mode::Random,
            rand_length: None,
            json: false,
        }
    }
}

fn print_help() {
    eprintln!(
        "minid - sortable short id generator\n\n\
Usage:\n  minid [r|s|ms|us|ns|<count>] [<count>] [--randLength <n> | --rl <n>]\n  minid parse <id> [--mode r|s|ms|us|ns] [--rl <n>] [--json]\n  minid validate <id> [--mode r|s|ms|us|ns] [--rl <n>]\n  minid pack <id>\n  minid unpack <hex>\n  minid bench [--mode r|s|ms|us|ns] [--rl <n>] [--count <n>]\n\n\
Suffix length defaults to 4 for r and 3 for timestamped modes; {RAND_LENGTH_ENV} overrides it.\n\
Logging: RUST_LOG or LOG_LEVEL (default warn), written to stderr.\n"
    );
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
            EnvFilter::try_new(level.to_lowercase())
        })
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    Mode::parse(s).ok_or_else(|| format!("invalid mode: {s} (expected r, s, ms, us or ns)"))
}

fn parse_count(s: &str) -> Result<usize, String> {
    s.parse::<usize>()
        .map_err(|_| format!("invalid count: {s}"))
}

/// `0` means "not set", so the mode or environment default applies.
fn parse_rand_length(s: &str) -> Result<Option<usize>, String> {
    let n = s
        .parse::<usize>()
        .map_err(|_| format!("invalid integer for rand length: {s}"))?;
    Ok((n > 0).then_some(n))
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn parse_generate_args(args: &[String]) -> Result<GenerateOpts, String> {
    let mut opts = GenerateOpts::default();
    let mut positional: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--randLength" | "-randLength" | "--rl" | "-rl") => {
                opts.rand_length = parse_rand_length(flag_value(args, i, flag)?)?;
                i += 2;
            }
            arg if arg.starts_with('-') && arg.parse::<i64>().is_err() => {
                return Err(format!("unknown flag: {arg}"));
            }
            arg => {
                positional.push(arg);
                i += 1;
            }
        }
    }

    match positional.as_slice() {
        [] => {}
        [first] => match Mode::parse(first) {
            Some(mode) => opts.mode = mode,
            None => opts.count = parse_count(first)?,
        },
        [first, second] => {
            // a leading count is still checked, then the second one wins
            match Mode::parse(first) {
                Some(mode) => opts.mode = mode,
                None => opts.count = parse_count(first)?,
            }
            opts.count = parse_count(second)?;
        }
        [_, _, extra, ..] => return Err(format!("unexpected argument: {extra}")),
    }

    Ok(opts)
}

fn parse_inspect_flags(args: &[String]) -> Result<InspectOpts, String> {
    let mut opts = InspectOpts::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--mode" | "-m") => {
                opts.mode = parse_mode(flag_value(args, i, flag)?)?;
                i += 2;
            }
            flag @ ("--randLength" | "-randLength" | "--rl" | "-rl") => {
                opts.rand_length = parse_rand_length(flag_value(args, i, flag)?)?;
                i += 2;
            }
            "--json" => {
                opts.json = true;
                i += 1;
            }
            other => return Err(format!("unknown flag: {other}")),
        }
    }

    Ok(opts)
}

/// Flag value, then `MINID_RAND_LENGTH`, then the mode default.
fn resolve_rand_length(mode: Mode, explicit: Option<usize>) -> Result<usize, String> {
    if let Some(n) = explicit {
        return Ok(n);
    }
    match env::var(RAND_LENGTH_ENV) {
        Ok(raw) => Ok(parse_rand_length(&raw)
            .map_err(|_| format!("invalid integer for {RAND_LENGTH_ENV}: {raw}"))?
            .unwrap_or_else(|| mode.default_suffix_len())),
        Err(_) => Ok(mode.default_suffix_len()),
    }
}

fn run_generate(args: &[String]) -> Result<(), String> {
    let opts = parse_generate_args(args)?;
    let rand_length = resolve_rand_length(opts.mode, opts.rand_length)?;
    tracing::debug!(
        mode = opts.mode.as_str(),
        count = opts.count,
        rand_length,
        "generating"
    );

    let mut generator = MinidGen::new(opts.mode, rand_length).map_err(|e| e.to_string())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for _ in 0..opts.count {
        let id = generator.next_minid().map_err(|e| e.to_string())?;
        writeln!(out, "{id}").map_err(|e| e.to_string())?;
    }
    out.flush().map_err(|e| e.to_string())
}

fn run_parse(args: &[String]) -> Result<(), String> {
    let Some((id, rest)) = args.split_first() else {
        return Err("parse requires an id".to_string());
    };
    let opts = parse_inspect_flags(rest)?;
    let rand_length = resolve_rand_length(opts.mode, opts.rand_length)?;

    let parsed = parse_minid(id, opts.mode, rand_length).map_err(|e| e.to_string())?;
    let timestamp = parsed.timestamp.map(|t| t.to_rfc3339());

    if opts.json {
        let payload = json!({
            "raw": parsed.raw,
            "mode": parsed.mode.as_str(),
            "diff": parsed.diff,
            "timestamp": timestamp,
            "suffix": parsed.suffix,
        });
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| e.to_string())?
        );
    } else {
        println!("raw={}", parsed.raw);
        println!("mode={}", parsed.mode.as_str());
        println!(
            "diff={}",
            parsed.diff.map(|d| d.to_string()).unwrap_or_default()
        );
        println!("timestamp={}", timestamp.unwrap_or_default());
        println!("suffix={}", parsed.suffix);
    }

    Ok(())
}

fn run_validate(args: &[String]) -> Result<(), String> {
    let Some((id, rest)) = args.split_first() else {
        return Err("validate requires an id".to_string());
    };
    let opts = parse_inspect_flags(rest)?;
    let rand_length = resolve_rand_length(opts.mode, opts.rand_length)?;

    let ok = validate_minid(id, opts.mode, rand_length);
    println!("{}", if ok { "true" } else { "false" });
    if ok {
        Ok(())
    } else {
        Err("invalid minid".to_string())
    }
}

fn run_pack(args: &[String]) -> Result<(), String> {
    let [id] = args else {
        return Err("pack requires exactly one id".to_string());
    };
    let id: Minid = id.parse().map_err(|e: MinidError| e.to_string())?;
    println!("{}", hex::encode(id.to_bytes()));
    Ok(())
}

fn run_unpack(args: &[String]) -> Result<(), String> {
    let [raw] = args else {
        return Err("unpack requires exactly one hex string".to_string());
    };
    let bytes = hex::decode(raw).map_err(|e| format!("invalid hex: {e}"))?;
    let id = Minid::from_bytes(&bytes).map_err(|e| e.to_string())?;
    println!("{id}");
    Ok(())
}

fn run_bench(args: &[String]) -> Result<(), String> {
    let mut count = 100_000usize;
    let mut tail: Vec<String> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--count" {
            count = parse_count(flag_value(args, i, "--count")?)?;
            i += 2;
        } else {
            tail.push(args[i].clone());
            i += 1;
        }
    }

    let opts = parse_inspect_flags(&tail)?;
    let rand_length = resolve_rand_length(opts.mode, opts.rand_length)?;
    let mut generator = MinidGen::new(opts.mode, rand_length).map_err(|e| e.to_string())?;

    let start = Instant::now();
    for _ in 0..count {
        generator.next_minid().map_err(|e| e.to_string())?;
    }
    let secs = start.elapsed().as_secs_f64().max(1e-9);

    let payload = json!({
        "impl": "rust",
        "mode": opts.mode.as_str(),
        "rand_length": rand_length,
        "n": count,
        "seconds": secs,
        "ids_per_sec": count as f64 / secs,
    });
    println!(
        "{}",
        serde_json::to_string(&payload).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn main() {
    init_logging();
    let args: Vec<String> = env::args().skip(1).collect();

    let (cmd, rest) = match args.split_first() {
        Some((cmd, rest)) => (cmd.as_str(), rest),
        None => ("", &args[..]),
    };

    let res = match cmd {
        "-h" | "--help" | "help" => {
            print_help();
            Ok(())
        }
        "parse" => run_parse(rest),
        "validate" => run_validate(rest),
        "pack" => run_pack(rest),
        "unpack" => run_unpack(rest),
        "bench" => run_bench(rest),
        _ => run_generate(&args),
    };

    if let Err(err) = res {
        tracing::debug!(%err, "command failed");
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
