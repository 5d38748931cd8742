use clap::ArgMatches;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use modelctl_core::config::{Document, is_yaml_path, read_deployment_name_path};
use modelctl_core::events;
use modelctl_core::settings;
use modelctl_core::{
    CliSettings, Config, ConfigCache, ConfigError, ModelctlError, OutputFormat, ResourceType,
};

use crate::table::TableFormatter;

/// File holding the project's deployment definition.
const ROOT_DOCUMENT: &str = "modelctl.yaml";

/// Everything a command handler needs for one invocation.
struct Session {
    settings: CliSettings,
    cache: ConfigCache,
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    let mut session = Session {
        settings: load_settings_with_warning(),
        cache: ConfigCache::new(),
    };

    let result = match matches.subcommand() {
        Some(("validate", sub_matches)) => handle_validate_command(sub_matches, &mut session),
        Some(("get", sub_matches)) => handle_get_command(sub_matches, &mut session),
        Some(("deployment-name", _)) => handle_deployment_name_command(),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown();
    result
}

fn load_settings_with_warning() -> CliSettings {
    let (settings, load_error) = settings::load_or_default();
    if let Some(e) = load_error {
        eprintln!(
            "Warning: Could not load settings: {}. Using defaults.\n\
             Tip: Check ~/.modelctl/config.toml and ./.modelctl/config.toml for syntax errors.",
            e
        );
        warn!(
            event = "cli.settings.load_failed",
            error = %e,
            "Settings load failed, using defaults"
        );
    }
    settings
}

/// Report a failed command on stderr and in the log, then hand the error back.
fn fail(command: &'static str, e: ConfigError) -> Box<dyn std::error::Error> {
    eprintln!("❌ {}", e);
    error!(
        event = "cli.command_failed",
        command = command,
        error = %e,
        error_code = e.error_code()
    );
    events::log_app_error(&e);
    Box::new(e)
}

/// Every YAML file under `root`, sorted, skipping hidden directories.
fn collect_yaml_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(event = "cli.project.walk_failed", error = %e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_yaml_path(entry.path()))
        .map(|entry| {
            let path = entry.path();
            path.strip_prefix(".").unwrap_or(path).to_path_buf()
        })
        .collect();
    files.sort();
    files
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

/// Explicit paths win; otherwise every YAML file under the project root.
fn project_files(matches: &ArgMatches, settings: &CliSettings) -> Vec<PathBuf> {
    if let Some(paths) = matches.try_get_many::<String>("paths").ok().flatten() {
        return paths.map(PathBuf::from).collect();
    }

    let root = settings
        .project
        .root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    collect_yaml_files(&root)
}

fn load_config<'a>(
    command: &'static str,
    files: &[PathBuf],
    session: &'a mut Session,
) -> Result<&'a Config, Box<dyn std::error::Error>> {
    session.cache.get_or_load(files).map_err(|e| fail(command, e))
}

fn handle_validate_command(
    matches: &ArgMatches,
    session: &mut Session,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = project_files(matches, &session.settings);
    info!(event = "cli.validate_started", file_count = files.len());

    let config = load_config("validate", &files, session)?;
    let deployment = config
        .deployment
        .as_ref()
        .map(|d| d.resource.name.as_str())
        .unwrap_or_default();

    println!(
        "✅ Configuration is valid: deployment \"{}\" with {} {}",
        deployment,
        config.apis.len(),
        if config.apis.len() == 1 { "API" } else { "APIs" }
    );

    info!(
        event = "cli.validate_completed",
        deployment = deployment,
        api_count = config.apis.len()
    );
    Ok(())
}

fn handle_get_command(
    matches: &ArgMatches,
    session: &mut Session,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = match matches.get_one::<String>("output") {
        Some(f) => OutputFormat::parse(f)?,
        None => session.settings.output_format(),
    };

    let resource_type = match matches.get_one::<String>("type") {
        Some(t) => Some(ResourceType::from_prefix(t).map_err(|e| fail("get", e))?),
        None => None,
    };
    let name = matches.get_one::<String>("name");

    info!(
        event = "cli.get_started",
        resource_type = resource_type.map(|t| t.as_str()),
        name = name.map(String::as_str),
        format = format.as_str()
    );

    let files = project_files(matches, &session.settings);
    let config = load_config("get", &files, session)?;

    match (resource_type, name) {
        (Some(resource_type), Some(name)) => describe_resource(config, resource_type, name, format)?,
        (Some(resource_type), None) => list_resources(config, Some(resource_type), format)?,
        (None, _) => list_resources(config, None, format)?,
    }

    info!(event = "cli.get_completed");
    Ok(())
}

fn list_resources(
    config: &Config,
    resource_type: Option<ResourceType>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let show_deployment = resource_type.is_none_or(|t| t == ResourceType::Deployment);
    let show_apis = resource_type.is_none_or(|t| t == ResourceType::Api);

    if format != OutputFormat::Table {
        let documents: Vec<_> = config
            .documents()
            .into_iter()
            .filter(|doc| match doc {
                Document::Deployment(_) => show_deployment,
                Document::Api(_) => show_apis,
            })
            .collect();
        return print_serialized(&documents, format);
    }

    if show_deployment {
        if let Some(deployment) = &config.deployment {
            TableFormatter::for_deployment(deployment).print_table();
        }
    }
    if show_apis {
        if config.apis.is_empty() {
            println!("No APIs defined.");
        } else {
            TableFormatter::for_apis(&config.apis).print_table();
        }
    }
    Ok(())
}

fn describe_resource(
    config: &Config,
    resource_type: ResourceType,
    name: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    // Resolve first so a wrong type is reported as such
    config
        .resource_of_type(name, &[resource_type])
        .map_err(|e| fail("get", e))?;

    let document = match resource_type {
        ResourceType::Api => Document::Api(config.api(name).map_err(|e| fail("get", e))?),
        _ => match &config.deployment {
            Some(deployment) => Document::Deployment(deployment),
            None => return Err("no deployment defined".into()),
        },
    };

    match (format, document) {
        (OutputFormat::Table, Document::Deployment(deployment)) => {
            TableFormatter::for_deployment(deployment).print_table();
            Ok(())
        }
        (OutputFormat::Table, Document::Api(api)) => {
            TableFormatter::for_apis(std::slice::from_ref(api)).print_table();
            Ok(())
        }
        (format, document) => print_serialized(&document, format),
    }
}

fn print_serialized<T: serde::Serialize>(
    value: &T,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Table => return Err("table output cannot be serialized".into()),
    }
    Ok(())
}

/// Nearest `modelctl.yaml` at or above `start`.
fn find_root_document(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(ROOT_DOCUMENT))
        .find(|candidate| candidate.is_file())
}

fn handle_deployment_name_command() -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.deployment_name_started");

    let cwd = std::env::current_dir()?;
    let Some(path) = find_root_document(&cwd) else {
        eprintln!(
            "❌ No {} found in {} or any parent directory",
            ROOT_DOCUMENT,
            cwd.display()
        );
        error!(event = "cli.deployment_name_failed", reason = "root_document_not_found");
        return Err(format!("{} not found", ROOT_DOCUMENT).into());
    };

    let relative = path
        .strip_prefix(&cwd)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string());
    let name =
        read_deployment_name_path(&path, &relative).map_err(|e| fail("deployment-name", e))?;

    println!("{}", name);
    info!(event = "cli.deployment_name_completed", deployment = %name);
    Ok(())
}
