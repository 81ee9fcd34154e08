use anyhow::{Context, Result, bail};
use richmark_config::Config;
use richmark_engine::{
    Document, DocumentTree, ParseOptions, PluginRegistry, SchemaValidator, parse_with, plugins,
    serialize_with_warnings,
};
use std::{env, path::Path, process};

const USAGE: &str = "Usage: richmark <parse|format|validate|export> <file>";

/// Engine settings derived from the configuration file.
struct Setup {
    registry: PluginRegistry,
    options: ParseOptions,
    validator: SchemaValidator,
}

impl Setup {
    fn from_config(config: &Config) -> Self {
        let enabled = config.plugins.enabled.iter().filter_map(|name| {
            let plugin = plugins::bundled(name);
            if plugin.is_none() {
                log::warn!(
                    "Unknown plugin '{name}' in config; available: {}",
                    plugins::BUNDLED.join(", ")
                );
            }
            plugin
        });
        let registry = PluginRegistry::with_plugins(enabled);
        let validator = SchemaValidator::for_registry(&registry)
            .with_limits(config.validation.max_depth, config.validation.max_nodes);
        Self {
            registry,
            options: ParseOptions {
                footnote_markers: config.footnotes.markers.clone(),
            },
            validator,
        }
    }
}

fn load_config() -> Config {
    match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::debug!("No config file at {}", Config::config_path().display());
            Config::default()
        }
        Err(e) => {
            log::warn!("Ignoring config file: {e}");
            Config::default()
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_cmd(setup: &Setup, path: &Path) -> Result<()> {
    let parsed = parse_with(&read(path)?, &setup.registry, &setup.options);
    for warning in &parsed.warnings {
        log::warn!("{warning}");
    }
    println!("{}", serde_json::to_string_pretty(&parsed.tree.to_tree())?);
    Ok(())
}

fn format_cmd(setup: &Setup, path: &Path) -> Result<()> {
    let parsed = parse_with(&read(path)?, &setup.registry, &setup.options);
    let out = serialize_with_warnings(&parsed.tree, &setup.registry);
    for warning in parsed.warnings.iter().chain(&out.warnings) {
        log::warn!("{warning}");
    }
    print!("{}", out.markdown);
    Ok(())
}

/// Prints the report and returns whether the payload was valid.
fn validate_cmd(setup: &Setup, path: &Path) -> Result<bool> {
    let value: serde_json::Value = serde_json::from_str(&read(path)?)
        .with_context(|| format!("{} is not JSON", path.display()))?;
    let report = setup.validator.validate_value(&value);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report.valid)
}

fn export_cmd(setup: &Setup, path: &Path) -> Result<bool> {
    let value: serde_json::Value = serde_json::from_str(&read(path)?)
        .with_context(|| format!("{} is not JSON", path.display()))?;
    let report = setup.validator.validate_value(&value);
    if !report.valid {
        for error in &report.errors {
            eprintln!("{error}");
        }
        return Ok(false);
    }
    let tree: DocumentTree =
        serde_json::from_value(value).context("Payload is not a document tree")?;
    let doc = Document::from_tree(&tree).context("Failed to import document tree")?;
    let out = serialize_with_warnings(&doc, &setup.registry);
    for warning in &out.warnings {
        log::warn!("{warning}");
    }
    print!("{}", out.markdown);
    Ok(true)
}

fn run(command: &str, path: &Path) -> Result<bool> {
    let setup = Setup::from_config(&load_config());
    match command {
        "parse" => parse_cmd(&setup, path).map(|()| true),
        "format" => format_cmd(&setup, path).map(|()| true),
        "validate" => validate_cmd(&setup, path),
        "export" => export_cmd(&setup, path),
        other => bail!("Unknown command '{other}'\n{USAGE}"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("{USAGE}");
        process::exit(2);
    }

    if !run(&args[1], Path::new(&args[2]))? {
        process::exit(1);
    }
    Ok(())
}
