//! `bounce validate`: load a config file the way `run` would and report
//! what the proxy would serve, without binding a port.
//!
//! On top of field validation this builds the [`RouteTable`], so routes
//! that can never match (an earlier route has the same method and path)
//! show up in the report.

use std::path::Path;

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::Config;
use crate::config::sources::parse_config_str;
use crate::config::validation;
use crate::error::{BounceError, ValidationError};
use crate::proxy::routing::RouteTable;

pub fn execute(args: &ValidateArgs) -> Result<(), BounceError> {
    let path = &args.config;
    let config = read_config(path)?;

    if let Err(errors) = validation::validate(&config) {
        match args.format {
            ValidateFormat::Text => print_errors_text(path, &errors),
            ValidateFormat::Json => println!("{}", errors_json(&errors)),
        }
        return Err(BounceError::ConfigValidation { errors });
    }

    let table = RouteTable::build(config.routes.clone())?;
    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &config)
            );
            if let Some(shadow) = shadow_report(&table) {
                println!("\n{shadow}");
            }
        }
        ValidateFormat::Json => println!("{}", summary_json(&config, &table)),
    }

    Ok(())
}

fn read_config(path: &Path) -> Result<Config, BounceError> {
    if !path.exists() {
        return Err(BounceError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    parse_config_str(ext, &content, &path.display().to_string())
}

fn print_errors_text(path: &Path, errors: &[ValidationError]) {
    let noun = if errors.len() == 1 { "error" } else { "errors" };
    eprintln!("\u{2717} {} has {} {noun}\n", path.display(), errors.len());
    for error in errors {
        eprintln!("{error}");
    }
}

fn errors_json(errors: &[ValidationError]) -> serde_json::Value {
    let errors: Vec<_> = errors
        .iter()
        .map(|e| {
            serde_json::json!({
                "route": e.route,
                "field": e.field,
                "message": e.message,
                "suggestion": e.suggestion,
            })
        })
        .collect();
    serde_json::json!({ "valid": false, "errors": errors })
}

fn summary_json(config: &Config, table: &RouteTable) -> serde_json::Value {
    let shadowed: Vec<_> = table
        .shadowed()
        .into_iter()
        .map(|(index, winner)| serde_json::json!({ "index": index, "shadowed_by": winner }))
        .collect();
    serde_json::json!({
        "valid": true,
        "http.port": config.http_port,
        "routes": config.routes,
        "shadowed": shadowed,
    })
}

/// Lines describing unreachable routes, or `None` when every route can match.
fn shadow_report(table: &RouteTable) -> Option<String> {
    let shadowed = table.shadowed();
    if shadowed.is_empty() {
        return None;
    }

    let routes: Vec<_> = table.iter().collect();
    let mut lines = vec![format!("  {} route(s) will never match:", shadowed.len())];
    for (idx, winner) in shadowed {
        let route = routes[idx];
        lines.push(format!(
            "    #{idx} {} {} (shadowed by #{winner})",
            route.method, route.path
        ));
    }
    Some(lines.join("\n"))
}
