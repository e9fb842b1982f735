//! Service probe and configuration commands.

use tokio::runtime::Runtime;

use crate::catalog::primary::{self, PrimaryClient};
use crate::config::{self, Config};
use crate::transport::{HttpTransport, Payload};

/// Report whether `url` answers with JSON or the HTML sentinel
pub fn cmd_ping(rt: &Runtime, config: &Config, url: Option<&str>) -> anyhow::Result<()> {
    let default_url;
    let url = match url {
        Some(url) => url,
        None => {
            let client = PrimaryClient::new(
                config.primary.base_url_or(primary::DEFAULT_BASE_URL),
                config.primary.timeout(),
            );
            default_url = client.api_url().to_string();
            &default_url
        }
    };

    let transport = HttpTransport::new(config.primary.timeout(), None);
    println!("Pinging {}...", url);

    match rt.block_on(transport.get_json(url, &[])) {
        Ok(payload) => {
            println!("{}", describe_payload(&payload));
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            Err(e.into())
        }
    }
}

/// Print the effective configuration, optionally writing it to disk
pub fn cmd_config(config: &Config, init: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if init {
        match path.as_ref().filter(|p| p.exists()) {
            Some(existing) => println!("Config already exists at {}", existing.display()),
            None => {
                let written = config::save(config)?;
                println!("Wrote {}", written.display());
            }
        }
        return Ok(());
    }

    match &path {
        Some(p) if p.exists() => println!("# {}", p.display()),
        Some(p) => println!("# {} (not created, showing defaults)", p.display()),
        None => println!("# no config directory on this platform"),
    }
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn describe_payload(payload: &Payload) -> String {
    match payload {
        Payload::ServiceAlive => "✓ Service alive (HTML page, no catalog data)".to_string(),
        Payload::Json(serde_json::Value::Object(map)) => {
            let keys: Vec<&str> = map.keys().take(8).map(String::as_str).collect();
            format!("✓ JSON object with {} keys: {}", map.len(), keys.join(", "))
        }
        Payload::Json(value) => format!("✓ JSON {}", json_kind(value)),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
