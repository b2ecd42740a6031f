//! `check` subcommand: report how a configuration is interpreted.

use markmenu_engine::BindingTable;
use menu_config::Config;
use tracing::warn;

/// Render the normalized binding table, the activation key and any
/// unrecognized tokens.
pub fn report(cfg: &Config) -> Vec<String> {
    let table = BindingTable::build(&cfg.bindings);
    let mut out = Vec::new();
    match table.activation_key() {
        Some(k) => out.push(format!("activation key: {}", k.to_spec())),
        None => out.push("activation key: none (bindings are inert)".to_string()),
    }
    if let Some(m) = table.default_menu() {
        out.push(format!("default menu: {m}"));
    }
    for (key, menu) in table.entries() {
        out.push(format!("  {key} -> {menu}"));
    }
    for (spec, tok) in cfg.unknown_tokens() {
        warn!(spec = %spec, token = %tok, "unrecognized binding token");
        out.push(format!("unrecognized token {tok:?} in {spec:?}"));
    }
    out
}
