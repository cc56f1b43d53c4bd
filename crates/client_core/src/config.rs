use std::{collections::HashMap, fs, io, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Values a new auction starts from when the creation view opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionDefaults {
    pub reserve_price: u32,
    /// Zero means the auction has no buyout price.
    pub buyout_price: u32,
    pub increment: u32,
    pub duration_hours: u32,
    pub max_duration_hours: u32,
}

impl Default for AuctionDefaults {
    fn default() -> Self {
        Self {
            reserve_price: 100,
            buyout_price: 0,
            increment: 10,
            duration_hours: 24,
            max_duration_hours: 24 * 7,
        }
    }
}

/// Loads creation defaults from an optional TOML file, then applies
/// `AUCTION__*` environment overrides.
///
/// A missing file falls back to [`AuctionDefaults::default`]; values that do
/// not parse as whole numbers are ignored.
pub fn load_defaults(path: Option<&Path>) -> anyhow::Result<AuctionDefaults> {
    let mut defaults = AuctionDefaults::default();

    if let Some(path) = path {
        match fs::read_to_string(path) {
            Ok(raw) => {
                let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
                    .with_context(|| format!("failed to parse '{}'", path.display()))?;
                apply_overrides(&mut defaults, |key| {
                    file_cfg.get(key).map(|value| match value {
                        toml::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                });
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no auction config file; using defaults");
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
            }
        }
    }

    apply_overrides(&mut defaults, |key| {
        std::env::var(format!("AUCTION__{}", key.to_ascii_uppercase())).ok()
    });

    Ok(defaults)
}

fn apply_overrides(defaults: &mut AuctionDefaults, lookup: impl Fn(&str) -> Option<String>) {
    let slots: [(&str, &mut u32); 5] = [
        ("reserve_price", &mut defaults.reserve_price),
        ("buyout_price", &mut defaults.buyout_price),
        ("increment", &mut defaults.increment),
        ("duration_hours", &mut defaults.duration_hours),
        ("max_duration_hours", &mut defaults.max_duration_hours),
    ];

    for (key, slot) in slots {
        let Some(raw) = lookup(key) else {
            continue;
        };
        match raw.trim().parse::<u32>() {
            Ok(parsed) => *slot = parsed,
            Err(_) => tracing::warn!(key, value = %raw, "ignoring non-numeric auction default"),
        }
    }
}
