//! Phase-field models for pfield.
//!
//! Each model supplies the compile-time constants for its kernel, its
//! initial field state, the positional argument binding of one
//! half-step, an optional noise schedule, and a native kernel for the
//! host backend. All four share the driver in `pfield-engine`.
//!
//! | Model | Tag | Fields |
//! |-------|-----|--------|
//! | [`Diffusion`] | `DIFFUSION` | PHASE |
//! | [`CahnHilliard`] | `CAHN_HILLIARD` | PHASE (+ chemical potential work buffer) |
//! | [`KobayashiIso`] | `KOB_ISO` | PHASE, TEMP |
//! | [`KobayashiAniso`] | `KOB_ANISO` | PHASE, TEMP |

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffers;
pub mod cahn_hilliard;
pub mod diffusion;
pub mod kobayashi;
pub mod model;
pub mod noise;
pub mod stencil;

pub use buffers::{FieldInit, InitialFields, ModelBuffers};
pub use cahn_hilliard::{CahnHilliard, CahnHilliardParams};
pub use diffusion::{Diffusion, DiffusionParams};
pub use kobayashi::{
    EdgeValues, KobayashiAniso, KobayashiAnisoParams, KobayashiIso, KobayashiIsoParams,
};
pub use model::{build_model, FieldLayout, Model, ModelKind};
pub use noise::NoiseSchedule;
