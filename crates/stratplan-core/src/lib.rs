//! Response normalization and merge engine for strategic-plan authoring.
//!
//! A plan is authored in seventeen phases. For each phase a text-generation
//! service returns a loosely shaped JSON reply; this crate turns that reply
//! into a replacement for one branch of the [`Document`] and applies it.
//!
//! ```text
//! phase id ──lookup──▶ PhaseSpec ──prompt/schema──▶ Generator
//!                                                     │ raw JSON
//!                                                     ▼
//! Document ────────────────────────────────────▶ normalize ──▶ NormalizedUpdate
//!    ▲                                                               │
//!    └──────────────────────────── apply ◀───────────────────────────┘
//! ```
//!
//! [`Document`]: stratplan_model::Document

pub mod error;
pub mod generator;
pub mod merge;
pub mod normalize;
pub mod phase;
pub mod prompt;
pub mod session;

pub use error::{EngineError, GenerationError};
pub use generator::{Generator, ReplayGenerator};
pub use merge::{apply, apply_update, changed_branches};
pub use normalize::identity::{IdAssigner, IdSeed};
pub use normalize::{NormalizedUpdate, normalize};
pub use phase::{PhaseId, PhaseSpec};
pub use session::{PhaseOutcome, apply_reply, run_phase};
