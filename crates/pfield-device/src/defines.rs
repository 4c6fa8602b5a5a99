//! Compile-time definitions injected into kernel programs.
//!
//! Every constant a kernel needs (grid size, spacing, timestep, model
//! coefficients) is baked in at build time as a `-DNAME=value` option.
//! Changing any of them requires recompiling the program.

use std::fmt;

use indexmap::IndexMap;

/// Ordered set of `-D` definitions.
///
/// Values are stored already rendered: integers in decimal, floats with
/// six decimals. Insertion order is preserved in the build options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KernelDefines {
    values: IndexMap<String, String>,
}

impl KernelDefines {
    /// Empty definition set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an integer definition.
    pub fn int(mut self, name: &str, value: i64) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    /// Add a floating-point definition, rendered with six decimals.
    pub fn float(mut self, name: &str, value: f32) -> Self {
        self.values.insert(name.to_string(), format!("{value:.6}"));
        self
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no definitions are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rendered value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Definition names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Render as a compiler option string: `-DSIZE=64 -DH=1.000000 ...`.
    pub fn build_options(&self) -> String {
        self.to_string()
    }

    /// Recover definitions from a compiler option string.
    ///
    /// Tokens that are not `-DNAME=value` are ignored. A bare `-DNAME`
    /// defines `NAME` as `1`, matching C preprocessor behaviour.
    pub fn parse_options(options: &str) -> Self {
        let mut values = IndexMap::new();
        for token in options.split_whitespace() {
            let Some(def) = token.strip_prefix("-D") else {
                continue;
            };
            match def.split_once('=') {
                Some((name, value)) if !name.is_empty() => {
                    values.insert(name.to_string(), value.to_string());
                }
                None if !def.is_empty() => {
                    values.insert(def.to_string(), "1".to_string());
                }
                _ => {}
            }
        }
        Self { values }
    }

    /// Look up a float-valued definition.
    ///
    /// The error string reads like a compiler diagnostic and names the
    /// identifier.
    pub fn get_f32(&self, name: &str) -> Result<f32, String> {
        let raw = self
            .get(name)
            .ok_or_else(|| format!("error: use of undeclared identifier '{name}'"))?;
        raw.parse()
            .map_err(|_| format!("error: invalid numeric value '{raw}' for '{name}'"))
    }

    /// Look up a non-negative integer definition.
    pub fn get_usize(&self, name: &str) -> Result<usize, String> {
        let raw = self
            .get(name)
            .ok_or_else(|| format!("error: use of undeclared identifier '{name}'"))?;
        raw.parse()
            .map_err(|_| format!("error: invalid integer value '{raw}' for '{name}'"))
    }
}

impl fmt::Display for KernelDefines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "-D{name}={value}")?;
        }
        Ok(())
    }
}
