use miette::{IntoDiagnostic, Result};
use serde_json::json;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tumbler::{Context, GameState, Random, Resolver, config::ResolverConfig};

fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::CLOSE);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn,tumbler=info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}

fn init_miette() {
    miette::set_panic_hook();
}

/// Play one scripted turn: cargo run -- [seed] [--strict]
fn main() -> Result<()> {
    init_tracing();
    init_miette();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let strict = args.iter().any(|a| a == "--strict");
    let ctx = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map_or_else(Context::from_entropy, |seed| Context::new(seed.as_str()));

    let state = GameState::from_json(json!({
        "round": 1,
        "deck": ["ace", "king", "queen", "jack", "ten"],
        "players": {
            "0": {"hp": 20, "inventory": ["sword", "shield"]},
            "1": {"hp": 14, "inventory": ["staff", "bracers"]}
        }
    }));

    let state = Random::d20(&state, "players.0.savingThrow");
    let state = Random::dice(&state, "players.1.damage", 6, 3);
    let state = Random::shuffle(&state, "deck");
    let state = Random::number(&state, "weather");

    let config = if strict {
        ResolverConfig::strict()
    } else {
        ResolverConfig::default()
    };
    let resolution = Resolver::new(config).resolve_with_report(&state, &ctx)?;
    info!(
        draws = resolution.report.draws,
        applied = resolution.report.total_applied(),
        "turn resolved"
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "state": resolution.state,
            "context": resolution.context,
        }))
        .into_diagnostic()?
    );
    Ok(())
}
