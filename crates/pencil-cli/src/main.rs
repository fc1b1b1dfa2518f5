//! pencil - render hand-sketched shapes and hachure fills
//!
//! Usage:
//!   pencil shape <kind> [options]   Sketch one shape to SVG, JSON or PNG
//!   pencil hatch [options]          Fill a rectangle with hachure lines
//!   pencil recipe <file.yaml>       Render a YAML scene
//!   pencil shapes                   List available shapes

mod cli;

use std::env;

use cli::{CliError, cmd_hatch, cmd_recipe, cmd_shape, cmd_shapes};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("pencil");

    if let Err(e) = run(prog, &args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(prog: &str, args: &[String]) -> Result<(), CliError> {
    let Some(command) = args.get(1) else {
        print_usage(prog);
        return Ok(());
    };

    match command.as_str() {
        "shape" => cmd_shape(&args[2..]),
        "hatch" => cmd_hatch(&args[2..]),
        "recipe" => cmd_recipe(&args[2..]),
        "shapes" => cmd_shapes(),
        "help" | "--help" | "-h" => {
            print_usage(prog);
            Ok(())
        }
        unknown => {
            print_usage(prog);
            Err(CliError::Usage(format!("Unknown command: {}", unknown)))
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("pencil - seeded hand-sketched shapes and hachure fills");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} shape <kind> [options]        Sketch a single shape", prog);
    eprintln!("  {} hatch [options]               Fill a rectangle with hachure lines", prog);
    eprintln!("  {} recipe <file.yaml> [options]  Render a YAML scene", prog);
    eprintln!("  {} shapes                        List available shapes", prog);
    eprintln!();
    eprintln!("Run '{} <command> --help' for command options.", prog);
    eprintln!();
    eprintln!("Logging:");
    eprintln!("  RUST_LOG=info {} shape circle -o circle.svg", prog);
}
