//! Extensiones de acceso a propiedades.

use std::collections::HashSet;

use serde_json::Value;

use resin_core::accessor::{DynBeanAccessor, PropertyAccessor};
use resin_core::errors::InjectError;
use resin_core::model::{TypeInfo, TypeRef};
use resin_core::path::Segment;

/// Extensión para tipos con pseudo-colecciones sólo-setter: las propiedades
/// listadas no exponen lectura pero aceptan escrituras directas por
/// clave/índice, así que el motor escribe elemento a elemento sin
/// materializar jamás la colección completa.
///
/// Precondición documentada: el backing de las propiedades listadas debe
/// quedar consistente tras cada `set_element`, porque nadie va a releerlo
/// dentro del pase.
#[derive(Debug, Default)]
pub struct KeyedWriteAccessor {
    keyed: HashSet<String>,
}

impl KeyedWriteAccessor {
    pub fn new<I, S>(keyed_props: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self { keyed: keyed_props.into_iter().map(Into::into).collect() }
    }

    fn is_keyed(&self, prop: &str) -> bool {
        self.keyed.contains(prop)
    }
}

impl PropertyAccessor for KeyedWriteAccessor {
    fn is_readable(&self, info: Option<&TypeInfo>, prop: &str) -> bool {
        !self.is_keyed(prop) && DynBeanAccessor.is_readable(info, prop)
    }

    fn is_writeable(&self, info: Option<&TypeInfo>, prop: &str) -> bool {
        self.is_keyed(prop) || DynBeanAccessor.is_writeable(info, prop)
    }

    fn declared_type(&self, info: Option<&TypeInfo>, prop: &str) -> Option<TypeRef> {
        DynBeanAccessor.declared_type(info, prop)
    }

    fn get(&self, bean: &Value, prop: &str) -> Option<Value> {
        if self.is_keyed(prop) {
            return None;
        }
        DynBeanAccessor.get(bean, prop)
    }

    fn get_mut<'a>(&self, bean: &'a mut Value, prop: &str) -> Option<&'a mut Value> {
        if self.is_keyed(prop) {
            return None;
        }
        DynBeanAccessor.get_mut(bean, prop)
    }

    fn set(&self, bean: &mut Value, prop: &str, value: Value) -> Result<(), InjectError> {
        DynBeanAccessor.set(bean, prop, value)
    }

    fn get_element(&self, bean: &Value, prop: &str, seg: &Segment) -> Option<Value> {
        DynBeanAccessor.get_element(bean, prop, seg)
    }

    fn set_element(&self, bean: &mut Value, prop: &str, seg: &Segment, value: Value)
                   -> Result<(), InjectError> {
        DynBeanAccessor.set_element(bean, prop, seg, value)
    }

    fn is_collection(&self, info: Option<&TypeInfo>, prop: &str) -> bool {
        self.is_keyed(prop) || DynBeanAccessor.is_collection(info, prop)
    }

    fn supports_keyed_writes(&self, _info: Option<&TypeInfo>, prop: &str) -> bool {
        self.is_keyed(prop)
    }
}
