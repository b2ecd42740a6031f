//! Parse and load user configuration.

use std::{ffi::OsStr, fs, path::Path};

use menu_keys::{BindingKey, Token};
use serde::{Deserialize, Serialize};

use crate::{Bindings, Error, OverlayOpts, Timing};

/// Full controller configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Binding spec → menu identifier.
    #[serde(default)]
    pub bindings: Bindings,
    /// Debounce and transition timings.
    #[serde(default)]
    pub timing: Timing,
    /// Overlay presentation knobs.
    #[serde(default)]
    pub overlay: OverlayOpts,
}

impl Config {
    /// Build a config with default tuning around a bindings table.
    pub fn from_bindings(bindings: Bindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Tokens in the bindings table that are not recognized as a key,
    /// modifier or button, as `(spec, token)` pairs.
    ///
    /// Such entries still load but can never be triggered by physical input.
    pub fn unknown_tokens(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (spec, _) in self.bindings.iter() {
            for tok in BindingKey::split_spec(spec) {
                if Token::parse(tok).is_none() {
                    out.push((spec.to_string(), tok.to_string()));
                }
            }
        }
        out
    }
}

/// Parse a RON document.
pub fn parse_ron(s: &str) -> Result<Config, Error> {
    Ok(ron::from_str(s)?)
}

/// Parse a JSON document.
pub fn parse_json(s: &str) -> Result<Config, Error> {
    Ok(serde_json::from_str(s)?)
}

/// Load a `Config` from disk; the format is chosen by extension (`.ron` or `.json`).
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    let parse: fn(&str) -> Result<Config, Error> = match path.extension().and_then(OsStr::to_str)
    {
        Some("ron") => parse_ron,
        Some("json") => parse_json,
        _ => {
            return Err(Error::Read {
                path: Some(path.to_path_buf()),
                message: "Unsupported config format (expected a .ron or .json file)".to_string(),
            });
        }
    };
    let text = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let cfg = parse(&text).map_err(|e| e.with_path(path))?;
    tracing::debug!(path = %path.display(), bindings = cfg.bindings.len(), "config_loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn ron_full_document() {
        let cfg = parse_ron(
            r#"(
                bindings: { "F12": "start", "F12+SecondaryButton": "radial_b" },
                timing: (single_release_ms: 30),
                overlay: (dim_opacity: 0.25),
            )"#,
        )
        .expect("parse");
        assert_eq!(cfg.bindings.get("F12"), Some("start"));
        assert_eq!(cfg.timing.single_release_ms, 30);
        assert_eq!(cfg.timing.multi_release_ms, 75);
        assert!((cfg.overlay.dim_opacity - 0.25).abs() < f32::EPSILON);
        assert_eq!(cfg.overlay.popup_close_attempts, 10);
    }

    #[test]
    fn json_minimal_document() {
        let cfg = parse_json(r#"{"bindings": {"Key_F12": "start"}}"#).expect("parse");
        assert_eq!(cfg.bindings.len(), 1);
        assert_eq!(cfg.timing, Timing::default());
    }

    #[test]
    fn json_error_has_location() {
        let err = parse_json("{\n  \"bindings\": {\n    \"F12\" \"start\"\n  }\n}")
            .expect_err("should fail");
        match err {
            Error::Parse { line, col, .. } => {
                assert_eq!(line, Some(3));
                assert!(col.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_tokens_are_reported() {
        let cfg = Config::from_bindings(
            [("F12+Hyper", "x"), ("F12", "start")].into_iter().collect(),
        );
        assert_eq!(
            cfg.unknown_tokens(),
            vec![("F12+Hyper".to_string(), "Hyper".to_string())]
        );
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_from_path(&PathBuf::from("/nonexistent/menu.yaml")).expect_err("fail");
        assert!(matches!(err, Error::Read { .. }));
    }
}
