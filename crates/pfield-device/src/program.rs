//! Kernel program loading.
//!
//! Kernel source is opaque text read from disk. Before handing it to a
//! backend the loader renders the model constants as `-D` options; every
//! backend then checks that the program defines exactly one
//! [`ENTRY_POINT`].

use std::fs;
use std::path::Path;

use pfield_core::ConfigError;

use crate::defines::KernelDefines;
use crate::device::{ComputeDevice, KernelHandle};
use crate::error::DeviceError;

/// Name of the single kernel every program must expose.
pub const ENTRY_POINT: &str = "phase_field_evol_kern";

/// Read kernel source from `path`.
pub fn load_source(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| ConfigError::FileUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Compile `source` on `device` with `defines` injected.
pub fn compile_kernel<D: ComputeDevice + ?Sized>(
    device: &mut D,
    source: &str,
    defines: &KernelDefines,
) -> Result<KernelHandle, DeviceError> {
    let options = defines.build_options();
    tracing::debug!(%options, "compiling kernel program");
    device.compile(source, &options)
}

/// Names of every `__kernel void NAME` / `kernel void NAME` definition in
/// `source`, comments excluded.
pub fn kernel_names(source: &str) -> Vec<String> {
    let stripped = strip_comments(source);
    let tokens: Vec<&str> = stripped
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect();
    let mut names = Vec::new();
    for window in tokens.windows(3) {
        if matches!(window[0], "__kernel" | "kernel") && window[1] == "void" {
            names.push(window[2].to_string());
        }
    }
    names
}

/// Check that `source` defines [`ENTRY_POINT`] exactly once.
///
/// Returns a compiler-style diagnostic on failure.
pub fn check_entry_point(source: &str) -> Result<(), String> {
    let count = kernel_names(source)
        .iter()
        .filter(|n| n.as_str() == ENTRY_POINT)
        .count();
    match count {
        1 => Ok(()),
        0 => Err(format!("error: kernel '{ENTRY_POINT}' not found in program")),
        n => Err(format!(
            "error: redefinition of kernel '{ENTRY_POINT}' ({n} definitions)"
        )),
    }
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '/' {
            match chars.peek() {
                Some('/') => {
                    for n in chars.by_ref() {
                        if n == '\n' {
                            out.push('\n');
                            break;
                        }
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for n in chars.by_ref() {
                        if prev == '*' && n == '/' {
                            break;
                        }
                        prev = n;
                    }
                    out.push(' ');
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }
    out
}
