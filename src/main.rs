use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cmdopts::{CommandLine, ParameterOptions, ParameterType, Value};

/// Small demonstration driver: configures a fixed set of parameters, parses
/// the process arguments against them and prints what was recorded. All
/// presentation (messages, exit codes) lives here, outside the library.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut cli = CommandLine::new();
    cli.compile_grammar("[s:|size:][f*|file*][m?|mode?]")
        .context("compiling the demo grammar")?;
    cli.register_parameter(
        "c",
        "count",
        ParameterOptions::new()
            .typed(ParameterType::Int)
            .help("how many times to run", "number of repetitions, a non-negative integer"),
    )?;
    cli.register_parameter(
        "v",
        "verbose",
        ParameterOptions::new().help("chatty output", "print every processing step"),
    )?;
    cli.register_parameter(
        "h",
        "help",
        ParameterOptions::new().help("show this help", "list every parameter with its description"),
    )?;

    let tokens: Vec<String> = std::env::args().skip(1).collect();
    if let Err(error) = cli.parse(tokens) {
        eprintln!("error: {error}");
        std::process::exit(2);
    }

    if cli.value("help").is_some() {
        for (label, text) in cli.help(false, None) {
            println!("{label:<20} {text}");
        }
        return Ok(());
    }

    for (name, value) in cli.values() {
        println!("{name} = {}", render(value));
    }
    for argument in cli.arguments() {
        println!("argument: {argument}");
    }
    Ok(())
}

fn render(value: &Value) -> String {
    match value {
        Value::Bool(flag) => flag.to_string(),
        Value::Int(number) => number.to_string(),
        Value::Str(text) => text.clone(),
        Value::List(items) => items
            .iter()
            .map(render)
            .collect::<Vec<_>>()
            .join(", "),
    }
}
