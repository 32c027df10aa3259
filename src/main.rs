use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pathway::{load_config, Params, Registry};

const DEFAULT_LOG_FILTER: &str = "pathway=info";

fn cli() -> Command {
    Command::new("pathway")
        .about("Match paths against named routes and generate their URLs")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("CONFIG")
                .global(true)
                .help("Path to a YAML or JSON routes file"),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .value_name("FILTER")
                .global(true)
                .help("Log filter, e.g. `debug` or `pathway=trace`"),
        )
        .subcommand(
            Command::new("match")
                .about("Find the first route accepting a path")
                .arg(Arg::new("path").required(true))
                .arg(
                    Arg::new("method")
                        .short('m')
                        .long("method")
                        .value_name("METHOD")
                        .help("Request method to check route constraints against"),
                ),
        )
        .subcommand(
            Command::new("url")
                .about("Generate the URL of a named route")
                .arg(Arg::new("name").required(true))
                .arg(
                    Arg::new("params")
                        .value_name("KEY=VALUE")
                        .action(ArgAction::Append)
                        .help("Route parameters"),
                )
                .arg(
                    Arg::new("protocol")
                        .short('p')
                        .long("protocol")
                        .value_name("PROTOCOL")
                        .help("Ask for an absolute URL with this scheme"),
                ),
        )
        .subcommand(Command::new("routes").about("List registered routes in match order"))
        .subcommand(
            Command::new("compile")
                .about("Show the expression a template compiles to")
                .arg(Arg::new("template").required(true))
                .arg(
                    Arg::new("regex")
                        .short('r')
                        .long("regex")
                        .value_name("KEY=EXPR")
                        .action(ArgAction::Append)
                        .help("Override the expression of a key"),
                ),
        )
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(filter) => tracing_subscriber::EnvFilter::new(filter),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_pairs<'a>(values: impl Iterator<Item = &'a String>) -> anyhow::Result<HashMap<String, String>> {
    values
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => Ok((key.to_string(), value.to_string())),
            None => bail!("expected KEY=VALUE, got '{}'", pair),
        })
        .collect()
}

fn load_registry(matches: &ArgMatches) -> anyhow::Result<Registry> {
    let Some(path) = matches.get_one::<String>("config") else {
        bail!("no routes file given, pass one with --config");
    };
    let path = PathBuf::from(path);
    let config = load_config(&path).with_context(|| format!("failed to load {}", path.display()))?;
    Registry::from_config(&config).with_context(|| format!("failed to register routes from {}", path.display()))
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("match", sub)) => {
            let registry = load_registry(matches)?;
            let path = sub.get_one::<String>("path").map(String::as_str).unwrap_or_default();
            let method = sub.get_one::<String>("method").map(String::as_str);
            let Some(found) = registry.find(path, method) else {
                bail!("no route matches '{}'", path);
            };
            println!("{}", serde_json::to_string_pretty(&json!({ "route": found.name, "params": found.params }))?);
        }
        Some(("url", sub)) => {
            let registry = load_registry(matches)?;
            let name = sub.get_one::<String>("name").map(String::as_str).unwrap_or_default();
            let params: Params = parse_pairs(sub.get_many::<String>("params").into_iter().flatten())?;
            let protocol = sub.get_one::<String>("protocol").map(String::as_str);
            println!("{}", registry.url(name, &params, protocol)?);
        }
        Some(("routes", _)) => {
            let registry = load_registry(matches)?;
            let routes: Vec<_> = registry
                .all()
                .values()
                .map(|entry| {
                    json!({
                        "name": entry.name(),
                        "uri": entry.uri(),
                        "regex": entry.matcher().as_str(),
                        "defaults": entry.defaults(),
                        "external": entry.is_external(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
        Some(("compile", sub)) => {
            let template = sub.get_one::<String>("template").map(String::as_str).unwrap_or_default();
            let overrides = parse_pairs(sub.get_many::<String>("regex").into_iter().flatten())?;
            let matcher = pathway::compile(template, &overrides)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "regex": matcher.as_str(), "keys": matcher.keys() }))?
            );
        }
        _ => bail!("no command given"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_one::<String>("log_level").map(String::as_str));
    run(&matches)
}
