//! PTA parameter schema and resolution engine.
//!
//! This is the leaf layer of wfx-pta. It holds the declarative tables that
//! describe every parameter of the three PTA commands (`settings`, `priority`,
//! `state`), the named `settings` presets, and the resolver that turns user
//! options into a fully materialised [`ResolvedCommand`]:
//! - defaults come from the table
//! - a preset, when named, overlays the defaults
//! - user overrides win over both
//!
//! Tables are validated when the [`SchemaRegistry`] is built, so a row whose
//! default is not one of its choices never reaches the encoder.

pub mod command;
pub mod config;
pub mod error;
pub mod param;
pub mod preset;
pub mod registry;
pub mod resolve;
pub mod table;
pub mod tables;

pub use command::{PtaCommand, PRIORITY_ID, SETTINGS_ID, STATE_ID};
pub use config::ResolveConfig;
pub use error::{ResolveError, Result, SchemaError};
pub use param::{ByteWidth, Choice, ParamRole, ParameterSpec, Value, ValueKind};
pub use preset::{Preset, ValueMap};
pub use registry::SchemaRegistry;
pub use resolve::{
    Overrides, Resolution, ResolvedCommand, ResolvedParameter, Resolver, TraceRecord, TraceStage,
};
pub use table::CommandTable;
