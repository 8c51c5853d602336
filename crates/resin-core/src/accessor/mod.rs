//! Capa de acceso a propiedades.
//!
//! El accessor es un colaborador sustituible por tipo: un registro de
//! estrategias consultado antes del acceso genérico (`DynBeanAccessor`).
//! Esto permite que tipos individuales presenten pseudo-propiedades que su
//! superficie desnuda no tiene (por ejemplo una colección foránea expuesta
//! como si tuviera accessors indexados/mapeados).

pub mod dyn_bean;
pub mod registry;

use serde_json::Value;

use crate::errors::InjectError;
use crate::model::{TypeInfo, TypeRef};
use crate::path::Segment;

pub use dyn_bean::DynBeanAccessor;
pub use registry::{AccessorRegistry, PropertyContext};

/// Operaciones uniformes get/set sobre una propiedad nombrada de un bean.
///
/// `info` es el descriptor del tipo dueño si está registrado; `None` implica
/// semántica `Any` (toda propiedad existe, legible y escribible). Devolver
/// `None` desde [`declared_type`](Self::declared_type) significa «propiedad
/// inexistente en este tipo».
pub trait PropertyAccessor: Send + Sync {
    fn is_readable(&self, info: Option<&TypeInfo>, prop: &str) -> bool;

    fn is_writeable(&self, info: Option<&TypeInfo>, prop: &str) -> bool;

    fn declared_type(&self, info: Option<&TypeInfo>, prop: &str) -> Option<TypeRef>;

    /// Lectura por copia del valor actual.
    fn get(&self, bean: &Value, prop: &str) -> Option<Value>;

    /// Lectura en sitio cuando el backing lo permite; los accessors de
    /// pseudo-propiedades computadas devuelven `None` y el motor cae al par
    /// get/set con copia.
    fn get_mut<'a>(&self, bean: &'a mut Value, prop: &str) -> Option<&'a mut Value>;

    fn set(&self, bean: &mut Value, prop: &str, value: Value) -> Result<(), InjectError>;

    /// Lectura de un elemento indexado/mapeado de la propiedad.
    fn get_element(&self, bean: &Value, prop: &str, seg: &Segment) -> Option<Value>;

    /// Escritura directa de un elemento indexado/mapeado de la propiedad,
    /// sin materializar la colección completa.
    fn set_element(&self, bean: &mut Value, prop: &str, seg: &Segment, value: Value)
                   -> Result<(), InjectError>;

    /// ¿La propiedad se comporta como colección aunque su tipo declarado no
    /// lo diga? (pseudo-colecciones respaldadas por extensión).
    fn is_collection(&self, info: Option<&TypeInfo>, prop: &str) -> bool {
        self.declared_type(info, prop)
            .map(|t| t.indexed_capable() || t.mapped_capable())
            .unwrap_or(false)
    }

    /// Tipo del elemento coleccionado de la propiedad.
    fn collected_element_type(&self, info: Option<&TypeInfo>, prop: &str) -> TypeRef {
        self.declared_type(info, prop)
            .map(|t| t.element())
            .unwrap_or(TypeRef::Any)
    }

    /// ¿La propiedad admite escrituras por clave/índice sin getter? Habilita
    /// el bypass de propiedades sólo-setter. Precondición documentada: la
    /// extensión que responda `true` debe mantener consistente su backing,
    /// porque el motor nunca relee la colección completa.
    fn supports_keyed_writes(&self, info: Option<&TypeInfo>, prop: &str) -> bool {
        let _ = (info, prop);
        false
    }
}
