//! Command line front end: `obj2scene <model.obj>`
//!
//! Reads `obj2scene.cfg` from the working directory, converts the model found
//! in `model.directory` and writes `<model>.db` next to the given path.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use obj2scene::config::Config;
use obj2scene::convert::{database_path_for, Converter};

const CONFIG_FILE: &str = "obj2scene.cfg";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: obj2scene <model.obj>");
        return ExitCode::from(1);
    }

    let input = &args[1];
    let Some(destination) = database_path_for(input) else {
        eprintln!("{input} is not an .obj file");
        return ExitCode::from(2);
    };

    let converter = match Config::load(CONFIG_FILE)
        .and_then(|config| Converter::from_config(&config))
    {
        Ok(converter) => converter,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::from(3);
        }
    };

    match run(&converter, input, &destination) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(4)
        }
    }
}

fn run(converter: &Converter, input: &str, destination: &Path) -> anyhow::Result<()> {
    let report = converter
        .convert(input, destination)
        .with_context(|| format!("failed to convert {input}"))?;

    log::info!(
        "Wrote {} scene nodes, {} vertices, {} materials and {} textures to {}",
        report.nodes,
        report.vertices,
        report.materials,
        report.textures,
        destination.display()
    );
    if report.write.failed_statements > 0 {
        log::warn!("{} SQL statements failed", report.write.failed_statements);
    }
    Ok(())
}
