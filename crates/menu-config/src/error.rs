//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone)]
/// Errors produced while loading or parsing a configuration.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// Syntax or shape error in a RON or JSON document.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// Optional 1-based line number.
        line: Option<usize>,
        /// Optional 1-based column number.
        col: Option<usize>,
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Attach a path to an error that was produced from an in-memory document.
    pub fn with_path(self, p: impl Into<PathBuf>) -> Self {
        match self {
            Self::Read { message, .. } => Self::Read {
                path: Some(p.into()),
                message,
            },
            Self::Parse {
                line, col, message, ..
            } => Self::Parse {
                path: Some(p.into()),
                line,
                col,
                message,
            },
        }
    }

    /// Render a human-friendly error message including location when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse {
                path,
                line,
                col,
                message,
            } => {
                let loc = match (line, col) {
                    (Some(l), Some(c)) => format!(":{}:{}", l, c),
                    (Some(l), None) => format!(":{}", l),
                    _ => String::new(),
                };
                match path {
                    Some(p) => format!("Config parse error at {}{}\n{}", p.display(), loc, message),
                    None if loc.is_empty() => format!("Config parse error\n{}", message),
                    None => format!("Config parse error at line{}\n{}", loc, message),
                }
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse {
            path: None,
            line: Some(e.line()),
            col: Some(e.column()),
            message: e.to_string(),
        }
    }
}

impl From<ron::error::SpannedError> for Error {
    fn from(e: ron::error::SpannedError) -> Self {
        // The span is already rendered into the message by ron's Display impl.
        Self::Parse {
            path: None,
            line: None,
            col: None,
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_includes_location() {
        let e = Error::Parse {
            path: None,
            line: Some(3),
            col: Some(7),
            message: "expected value".into(),
        }
        .with_path("/tmp/menu.json");
        let s = e.pretty();
        assert!(s.contains("/tmp/menu.json:3:7"), "{s}");
        assert!(s.contains("expected value"));
    }
}
