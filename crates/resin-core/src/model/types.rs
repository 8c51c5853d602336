//! Catálogo de tipos declarados.
//!
//! `TypeRef` es la referencia de tipo que gobierna la conversión de literales
//! y la inferencia de contenedores. Un tipo `Object` apunta por nombre a un
//! `TypeInfo` registrado; un nombre no registrado se comporta como `Any`
//! (todas las propiedades existen, legibles y escribibles, de tipo `Any`).

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Referencia de tipo declarado para una propiedad o elemento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    /// Tipo desconocido/borrado: acepta cualquier literal y cualquier nature.
    Any,
    Bool,
    Int,
    Float,
    Str,
    /// Secuencia ordenada con tipo de elemento declarado.
    List(Box<TypeRef>),
    /// Mapa clave→valor con tipo de valor declarado.
    Map(Box<TypeRef>),
    /// Bean registrado por nombre en el catálogo.
    Object(String),
}

impl TypeRef {
    /// Tipo del elemento coleccionado. Para un tipo ambiguo o borrado el
    /// elemento también es ambiguo.
    pub fn element(&self) -> TypeRef {
        match self {
            TypeRef::List(elem) | TypeRef::Map(elem) => (**elem).clone(),
            _ => TypeRef::Any,
        }
    }

    /// ¿Admite hijos indexados por su sola declaración?
    pub fn indexed_capable(&self) -> bool {
        matches!(self, TypeRef::List(_) | TypeRef::Any)
    }

    /// ¿Admite hijos mapeados por su sola declaración?
    pub fn mapped_capable(&self) -> bool {
        matches!(self, TypeRef::Map(_) | TypeRef::Any)
    }
}

fn default_true() -> bool {
    true
}

/// Capacidades declaradas de una propiedad de bean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySpec {
    pub type_ref: TypeRef,
    #[serde(default = "default_true")]
    pub readable: bool,
    #[serde(default = "default_true")]
    pub writeable: bool,
}

impl PropertySpec {
    pub fn new(type_ref: TypeRef) -> Self {
        Self { type_ref, readable: true, writeable: true }
    }

    pub fn read_only(type_ref: TypeRef) -> Self {
        Self { type_ref, readable: true, writeable: false }
    }

    pub fn write_only(type_ref: TypeRef) -> Self {
        Self { type_ref, readable: false, writeable: true }
    }
}

/// Descriptor de un tipo de bean inyectable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    #[serde(default)]
    pub properties: IndexMap<String, PropertySpec>,
    /// Orden explícito de aplicación de hijos: los nombrados primero, en el
    /// orden declarado; el resto sigue en orden de árbol.
    #[serde(default)]
    pub inject_order: Vec<String>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), properties: IndexMap::new(), inject_order: Vec::new() }
    }

    pub fn with_property(mut self, name: impl Into<String>, spec: PropertySpec) -> Self {
        self.properties.insert(name.into(), spec);
        self
    }

    pub fn with_inject_order(mut self, order: &[&str]) -> Self {
        self.inject_order = order.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.get(name)
    }
}

/// Catálogo de tipos registrados, consultado por el acceso a propiedades y
/// por la compilación de árboles.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeInfo>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, info: TypeInfo) {
        self.types.insert(info.name.clone(), info);
    }

    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(name)
    }

    /// Info del tipo al que refiere un `TypeRef`, si es un objeto registrado.
    pub fn info_of(&self, type_ref: &TypeRef) -> Option<&TypeInfo> {
        match type_ref {
            TypeRef::Object(name) => self.get(name),
            _ => None,
        }
    }
}
