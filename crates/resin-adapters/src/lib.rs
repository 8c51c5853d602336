//! resin-adapters: colaboradores listos para usar sobre resin-core.
//!
//! Este crate provee:
//! - `PropertiesResourceSource`: bundles estilo `.properties` con cadena de
//!   fallback por locale (`tipo` → `tipo_locale`).
//! - `NowConverter`: conversor diferido de marcas de tiempo (`@now`).
//! - `KeyedWriteAccessor`: extensión de acceso para pseudo-colecciones
//!   sólo-setter.
//! - Carga de catálogos de tipos desde JSON (`catalog`).
//!
//! Nota: el core sólo conoce los traits (`ResourceSource`, `Converter`,
//! `PropertyAccessor`); aquí viven implementaciones con opiniones.

pub mod accessors;
pub mod catalog;
pub mod converters;
pub mod properties;

pub use accessors::KeyedWriteAccessor;
pub use catalog::{load_catalog, register_catalog};
pub use converters::NowConverter;
pub use properties::PropertiesResourceSource;
