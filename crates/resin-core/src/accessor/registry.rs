//! Registro de accessors por tipo y resolución de contexto de propiedad.

use std::collections::HashMap;
use std::sync::Arc;

use super::{DynBeanAccessor, PropertyAccessor};
use crate::model::{TypeRef, TypeRegistry};

/// Vista resuelta de una propiedad: lo que compilación y recorrido necesitan
/// saber antes de tocar el bean.
#[derive(Debug, Clone)]
pub struct PropertyContext {
    pub declared: TypeRef,
    pub readable: bool,
    pub writeable: bool,
    /// El valor de la propiedad admite hijos indexados/mapeados (incluye
    /// pseudo-colecciones respaldadas por extensión).
    pub collection: bool,
    /// Bypass sólo-setter: escritura directa por clave/índice sin getter.
    pub keyed_writes: bool,
    /// Tipo del elemento coleccionado.
    pub element: TypeRef,
}

/// Estrategia/registro: extensiones por nombre de tipo consultadas antes del
/// accessor genérico. Sin herencia; sustituir es registrar.
pub struct AccessorRegistry {
    default_accessor: Arc<dyn PropertyAccessor>,
    extensions: HashMap<String, Arc<dyn PropertyAccessor>>,
}

impl std::fmt::Debug for AccessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorRegistry")
         .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
         .finish()
    }
}

impl Default for AccessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessorRegistry {
    pub fn new() -> Self {
        Self { default_accessor: Arc::new(DynBeanAccessor),
               extensions: HashMap::new() }
    }

    /// Registra la extensión para un tipo. El llamador (el orquestador) es
    /// responsable de invalidar la cache de raíces compiladas.
    pub fn register(&mut self, type_name: impl Into<String>, accessor: Arc<dyn PropertyAccessor>) {
        self.extensions.insert(type_name.into(), accessor);
    }

    /// Accessor efectivo para un tipo dueño.
    pub fn accessor_for(&self, owner: &TypeRef) -> Arc<dyn PropertyAccessor> {
        match owner {
            TypeRef::Object(name) => self.extensions
                                         .get(name)
                                         .cloned()
                                         .unwrap_or_else(|| self.default_accessor.clone()),
            _ => self.default_accessor.clone(),
        }
    }

    /// Resuelve el contexto de la propiedad `prop` del tipo dueño `owner`.
    /// `None` significa «propiedad inexistente» (el dueño no es un bean, o su
    /// catálogo no la declara).
    pub fn property_ctx(&self,
                        types: &TypeRegistry,
                        owner: &TypeRef,
                        prop: &str)
                        -> Option<PropertyContext> {
        if !matches!(owner, TypeRef::Object(_) | TypeRef::Any) {
            return None;
        }
        let accessor = self.accessor_for(owner);
        let info = types.info_of(owner);
        let declared = accessor.declared_type(info, prop)?;
        let pseudo = accessor.is_collection(info, prop);
        let collection = declared.indexed_capable() || declared.mapped_capable() || pseudo;
        let element = if pseudo && !matches!(declared, TypeRef::List(_) | TypeRef::Map(_)) {
            accessor.collected_element_type(info, prop)
        } else {
            declared.element()
        };
        Some(PropertyContext { readable: accessor.is_readable(info, prop),
                               writeable: accessor.is_writeable(info, prop),
                               keyed_writes: accessor.supports_keyed_writes(info, prop),
                               collection,
                               element,
                               declared })
    }
}
