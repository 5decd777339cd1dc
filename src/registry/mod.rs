//! Function and type registries (components B and C, §4.B–§4.C).

pub mod builtins;
mod functions;
mod types;

pub use functions::{ArgType, Category, FunctionImpl, FunctionRegistry, RegistryStats, SafeFunction};
pub use types::{PropertyKind, Schema, SerializeStrategy, TypeEntry, TypeRegistry};
