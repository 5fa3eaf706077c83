//! # Calmwing Core
//!
//! Domain types, traits, and error definitions for the Calmwing
//! flight-companion runtime. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here. Implementations
//! live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Testing the decision pipeline with mock/stub collaborators
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod flight;
pub mod generator;
pub mod mode;
pub mod state;
pub mod support;

// Re-export key types at crate root for ergonomics
pub use error::{Error, FlightError, GeneratorError, Result};
pub use flight::{FlightContext, FlightPhase, FlightQuery, FlightSource, Turbulence};
pub use generator::{Generator, InstructionPayload};
pub use mode::{ModeConfig, SupportMode};
pub use state::{EmotionalState, Trend};
pub use support::{EnvelopeError, SupportEnvelope, SupportRequest};
