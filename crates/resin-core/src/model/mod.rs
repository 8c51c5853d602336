//! Modelo de tipos y celdas de valor del motor.
//!
//! El motor es neutral respecto al grafo de beans: los valores vivos son
//! `serde_json::Value` y los tipos declarados se describen con un catálogo
//! serde-derivado (`TypeRegistry`), de modo que los adaptadores puedan cargar
//! catálogos desde JSON sin tocar el core.

pub mod cell;
pub mod types;

pub use cell::CacheCell;
pub use types::{PropertySpec, TypeInfo, TypeRef, TypeRegistry};
