use std::collections::BTreeMap;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use deboogie::{get_debug_logger, iter_debug_with, CallTracer, Destination};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

const LOGGER_NAME: &str = "boogie";

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Stream {
    Stdout,
    Stderr,
    Tracing,
    Null,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = LOGGER_NAME)]
    name: String,

    #[arg(long, value_enum, default_value_t = Stream::Stdout)]
    stream: Stream,

    #[arg(long, default_value_t = 3)]
    jives: u32,
}

#[derive(Debug, Serialize)]
struct Groove {
    name: &'static str,
    tempo: u32,
    moves: Vec<&'static str>,
}

fn destination(stream: Stream) -> Destination {
    match stream {
        Stream::Stdout => Destination::Stdout,
        Stream::Stderr => Destination::Stderr,
        Stream::Tracing => Destination::Tracing,
        Stream::Null => Destination::Null,
    }
}

fn setup_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_level(true);

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing();

    let debug = get_debug_logger(&args.name, Some(destination(args.stream)));
    debug.log("Git yer gittin it on on and boogie!")?;

    let groove = Groove {
        name: "boogie",
        tempo: 120,
        moves: vec!["shimmy", "slide", "spin"],
    };
    debug.pp(&groove)?;
    debug.pp_json(&groove)?;

    let dejives: Vec<u32> = iter_debug_with(
        "jives",
        1..=args.jives,
        |i| format!("jive {}", i),
        Some(destination(args.stream)),
    )
    .collect();
    info!(count = dejives.len(), "jives passed through");

    let sink = get_debug_logger("calls", Some(destination(args.stream)));
    let tracer = CallTracer::builder()
        .with_input_log(sink.clone())
        .with_output_log(sink)
        .build();
    let f = tracer.wrap("f", |(a, k): ((i32, i32), BTreeMap<&'static str, i32>)| (a, k));
    let result = f(((1, 2), BTreeMap::from([("x", 3)])))?;
    info!(?result, "traced call returned");

    Ok(())
}
