//! Configuration for the compiler and the typesetter.
//!
//! Every section is optional in TOML; omitted keys take their defaults.
//!
//! ```toml
//! [compiler.heuristic]
//! macros = ["frac", "sqrt", "vec"]
//!
//! [compiler.links]
//! allowed_schemes = ["https"]
//!
//! [typeset]
//! backend = "mathml"
//! ignored_tags = ["pre", "code", "math"]
//!
//! [[typeset.delimiters]]
//! left = "$$"
//! right = "$$"
//! display = true
//! ```

use crate::error::{ConfigError, Result};
use crate::typeset::math::MathBackend;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub compiler: CompileConfig,
    pub typeset: TypesetConfig,
}

impl Config {
    /// Parse a configuration from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source).map_err(ConfigError::from)?;
        config.typeset.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

/// Options for [`compile_with_config`](crate::compile_with_config).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    pub heuristic: HeuristicConfig,
    pub links: LinkConfig,
}

/// Tuning for the code-versus-math classifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeuristicConfig {
    /// Bare words that mark a code span as LaTeX when they appear as a whole word.
    pub macros: Vec<String>,
    /// Fence language words that always mean math.
    pub math_languages: Vec<String>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            macros: DEFAULT_MACROS.iter().map(|m| m.to_string()).collect(),
            math_languages: ["math", "latex", "tex", "katex"]
                .iter()
                .map(|l| l.to_string())
                .collect(),
        }
    }
}

const DEFAULT_MACROS: &[&str] = &[
    "frac", "sqrt", "sum", "prod", "int", "lim", "alpha", "beta", "gamma", "delta", "theta",
    "lambda", "pi", "sigma", "infty", "cdot", "times", "leq", "geq", "neq", "mathbb", "mathrm",
    "text",
];

/// Link rendering policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    /// URL schemes that may become anchors. Scheme-less URLs are always allowed.
    pub allowed_schemes: Vec<String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            allowed_schemes: vec!["http".into(), "https".into(), "mailto".into()],
        }
    }
}

/// Options for the [`Typesetter`](crate::typeset::Typesetter).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypesetConfig {
    pub backend: MathBackend,
    /// Tried in order at each position, so longer openers must come first.
    pub delimiters: Vec<Delimiter>,
    /// Elements whose contents are never scanned.
    pub ignored_tags: Vec<String>,
    /// Elements carrying one of these classes are never scanned. Renderer
    /// output is marked this way so a second pass leaves it alone.
    pub ignored_classes: Vec<String>,
}

impl TypesetConfig {
    fn validate(&self) -> Result<()> {
        for delimiter in &self.delimiters {
            if delimiter.left.is_empty() || delimiter.right.is_empty() {
                return Err(ConfigError::Delimiter(format!(
                    "empty delimiter in pair {:?} / {:?}",
                    delimiter.left, delimiter.right
                ))
                .into());
            }
        }
        Ok(())
    }
}

impl Default for TypesetConfig {
    fn default() -> Self {
        Self {
            backend: MathBackend::default(),
            delimiters: vec![
                Delimiter::new("$$", "$$", true),
                Delimiter::new("\\[", "\\]", true),
                Delimiter::new("$", "$", false),
                Delimiter::new("\\(", "\\)", false),
            ],
            ignored_tags: [
                "script", "noscript", "style", "textarea", "pre", "code", "option", "math",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            ignored_classes: vec!["typeset".to_string()],
        }
    }
}

/// A math delimiter pair recognized by the typesetter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Delimiter {
    pub left: String,
    pub right: String,
    #[serde(default)]
    pub display: bool,
}

impl Delimiter {
    pub fn new(left: &str, right: &str, display: bool) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
            display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.compiler, CompileConfig::default());
        assert_eq!(config.typeset, TypesetConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml_str(
            r#"
[compiler.heuristic]
macros = ["vec"]

[typeset]
backend = "mathml"
"#,
        )
        .unwrap();

        assert_eq!(config.compiler.heuristic.macros, vec!["vec".to_string()]);
        assert!(config
            .compiler
            .heuristic
            .math_languages
            .contains(&"latex".to_string()));
        assert_eq!(config.typeset.backend, MathBackend::MathML);
        assert_eq!(config.typeset.delimiters.len(), 4);
    }

    #[test]
    fn test_custom_delimiters() {
        let config = Config::from_toml_str(
            r#"
[[typeset.delimiters]]
left = "\\["
right = "\\]"
display = true

[[typeset.delimiters]]
left = "\\("
right = "\\)"
"#,
        )
        .unwrap();

        assert_eq!(
            config.typeset.delimiters,
            vec![
                Delimiter::new("\\[", "\\]", true),
                Delimiter::new("\\(", "\\)", false)
            ]
        );
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let result = Config::from_toml_str(
            r#"
[[typeset.delimiters]]
left = ""
right = "$"
"#,
        );
        assert!(matches!(
            result,
            Err(crate::Error::Config(ConfigError::Delimiter(_)))
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = Config::from_toml_str("[compiler]\nbogus = 1\n");
        assert!(matches!(result, Err(crate::Error::Config(ConfigError::Toml(_)))));
    }
}
