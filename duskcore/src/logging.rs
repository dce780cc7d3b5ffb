//! Tracing bootstrap shared by dusk binaries.
//!
//! Filtering follows `RUST_LOG` (e.g. `RUST_LOG=duskwrite=debug`), defaulting
//! to INFO. The windowing stack is kept quiet.

use tracing::Level;
use tracing_subscriber::{
    filter::Directive, fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const QUIET_TARGETS: &[&str] = &["winit=off", "wgpu=off", "eframe=off", "egui=off", "arboard=warn"];

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let mut filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    for target in QUIET_TARGETS {
        match target.parse::<Directive>() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("[duskcore] bad log directive {target}: {e}"),
        }
    }

    let stdout_layer = layer().with_line_number(true).compact();

    if tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
