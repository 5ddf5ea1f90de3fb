//! # Bistro Kiosk Library
//!
//! A terminal front-end for the storefront engine.
//!
//! ## Module Organization
//! ```text
//! bistro_kiosk/
//! ├── lib.rs          ◄─── You are here (startup & command loop)
//! ├── config.rs       ◄─── kiosk.toml + BISTRO_* environment
//! ├── commands.rs     ◄─── Command parsing, session, rendering
//! └── error.rs        ◄─── Kiosk error type
//! ```
//!
//! ## Streams
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin  ──► one command per line                                        │
//! │  stdout ◄── replies; a placed order is a single JSON line               │
//! │  stderr ◄── tracing logs (RUST_LOG) and "error: ..." lines              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;

use std::io::{self, BufRead, Write};
use std::path::Path;

use bistro_core::{Catalog, Storefront};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::{Command, Reply, Session};
use config::KioskConfig;
use error::{KioskError, KioskResult};

/// Runs the kiosk on the process's standard streams.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging                                                  │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration                                                  │
/// │     • defaults → kiosk.toml → BISTRO_* environment, then validated      │
/// │                                                                         │
/// │  3. Load Catalog                                                        │
/// │     • JSON array of products, validated on parse                        │
/// │                                                                         │
/// │  4. Serve                                                               │
/// │     • one command per stdin line until `quit` or end of input           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> KioskResult<()> {
    init_tracing();

    let config = KioskConfig::load(None)?;
    let catalog = load_catalog(&config.catalog.path)?;
    let storefront = Storefront::from_catalog(&catalog, config.engine)?;

    info!(
        store = %config.store.name,
        products = catalog.len(),
        delivery_fee = %config.engine.delivery_fee,
        "Kiosk ready"
    );

    let mut session = Session::new(storefront, config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(&mut session, stdin.lock(), stdout.lock(), io::stderr())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every state transition of the engine
/// - `RUST_LOG=bistro_core=trace` - Trace for the engine only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Reads and validates the catalog JSON at `path`.
pub fn load_catalog(path: &Path) -> KioskResult<Catalog> {
    let contents = std::fs::read_to_string(path).map_err(|source| KioskError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog: Catalog =
        serde_json::from_str(&contents).map_err(|source| KioskError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })?;

    info!(?path, products = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

/// Feeds `input` line by line to the session.
///
/// Command failures are written to `errors` and the loop continues; only
/// stream failures end it early.
pub fn serve<R, W, E>(session: &mut Session, input: R, mut output: W, mut errors: E) -> KioskResult<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let reply = line
            .parse::<Command>()
            .and_then(|command| session.execute(command));

        match reply {
            Ok(Reply::Text(text)) => writeln!(output, "{text}")?,
            Ok(Reply::Order(payload)) => {
                writeln!(output, "{}", payload.to_json()?)?;
                info!(total = %payload.total_price, "Order written");
            }
            Ok(Reply::Quit) => break,
            Err(err) => {
                warn!(command = line, error = %err, "Command failed");
                writeln!(errors, "error: {err}")?;
            }
        }
        output.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::EngineConfig;
    use std::io::Cursor;

    fn session() -> Session {
        let catalog: Catalog = serde_json::from_str(
            r#"[{ "id": "salad", "name": "Nonno Alberto's Salad", "price": 900 }]"#,
        )
        .unwrap();
        let storefront = Storefront::from_catalog(&catalog, EngineConfig::default()).unwrap();
        Session::new(storefront, KioskConfig::default())
    }

    #[test]
    fn test_serve_writes_order_json_to_output() {
        let mut session = session();
        let input = Cursor::new("add salad\n\n# comment\nfly\norder 555-0100 Main Street 1\nquit\nadd salad\n");
        let mut output = Vec::new();
        let mut errors = Vec::new();

        serve(&mut session, input, &mut output, &mut errors).unwrap();

        let output = String::from_utf8(output).unwrap();
        let errors = String::from_utf8(errors).unwrap();

        let json_line = output.lines().last().unwrap();
        let value: serde_json::Value = serde_json::from_str(json_line).unwrap();
        assert_eq!(value["totalPrice"], 2900);
        assert_eq!(value["totalNumber"], 1);
        assert_eq!(value["products"][0]["priceSingle"], 900);

        assert_eq!(errors.trim(), "error: Unknown command 'fly' (try 'help')");
        // Nothing after `quit` runs.
        assert!(session.storefront().cart().is_empty());
    }

    #[test]
    fn test_demo_catalog_loads() {
        let catalog: Catalog =
            serde_json::from_str(include_str!("../../../demos/catalog.json")).unwrap();
        let storefront = Storefront::from_catalog(&catalog, EngineConfig::default()).unwrap();

        assert_eq!(catalog.len(), 3);
        // Defaults are baked into the base price.
        for configurator in storefront.menu().configurators() {
            assert_eq!(configurator.price(), configurator.definition().price);
        }
    }

    #[test]
    fn test_demo_config_parses() {
        let config: KioskConfig = toml::from_str(include_str!("../../../demos/kiosk.toml")).unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_demo_session() {
        let catalog: Catalog =
            serde_json::from_str(include_str!("../../../demos/catalog.json")).unwrap();
        let config: KioskConfig = toml::from_str(include_str!("../../../demos/kiosk.toml")).unwrap();
        let storefront = Storefront::from_catalog(&catalog, config.engine).unwrap();
        let mut session = Session::new(storefront, config);

        let input = Cursor::new(include_str!("../../../demos/session.txt"));
        let mut output = Vec::new();
        let mut errors = Vec::new();
        serve(&mut session, input, &mut output, &mut errors).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(String::from_utf8(errors).unwrap(), "");

        let json_line = output.lines().last().unwrap();
        let order: serde_json::Value = serde_json::from_str(json_line).unwrap();
        // Pizza: 20 − 6 (tomato) + 5 (cream) + 3 (salami) = 22, two of them.
        assert_eq!(order["products"][0]["id"], "pizza");
        assert_eq!(order["products"][0]["amount"], 2);
        assert_eq!(order["products"][0]["priceSingle"], 2000);
        assert_eq!(order["products"][0]["price"], 4400);
        assert_eq!(order["products"][0]["params"]["sauce"]["options"]["cream"], "Sour cream");
        assert!(order["products"][0]["params"]["sauce"]["options"]["tomato"].is_null());
        // Salad bumped to two on its cart line.
        assert_eq!(order["products"][1]["price"], 1800);
        assert_eq!(order["subtotalPrice"], 6200);
        assert_eq!(order["deliveryFee"], 2000);
        assert_eq!(order["totalPrice"], 8200);
        assert_eq!(order["totalNumber"], 4);

        // Parameters appear in the order the catalog lists them.
        let sauce = json_line.find("\"sauce\"").unwrap();
        let toppings = json_line.find("\"toppings\"").unwrap();
        let crust = json_line.find("\"crust\"").unwrap();
        assert!(sauce < toppings && toppings < crust);

        assert!(session.storefront().cart().is_empty());
    }

    #[test]
    fn test_catalog_errors_name_the_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, KioskError::CatalogRead { .. }));
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
