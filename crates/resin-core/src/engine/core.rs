//! Orquestador de inyección.
//!
//! Posee los colaboradores (fuente, catálogo, accessors, conversores,
//! notificador, callbacks) y la cache de raíces compiladas por (tipo,
//! locale). Los lectores concurrentes comparten las raíces vía `Arc`; toda
//! mutación de colaboradores o ajustes exige `&mut self` e invalida la cache
//! completa, de modo que las raíces publicadas nunca mezclan épocas de
//! configuración.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::accessor::{AccessorRegistry, PropertyAccessor};
use crate::convert::{Converter, DefaultConverter};
use crate::engine::builder::InjectorBuilder;
use crate::engine::context::{InjectionContext, PostInject};
use crate::engine::descriptor::InjectDescriptor;
use crate::errors::InjectError;
use crate::model::{TypeInfo, TypeRef, TypeRegistry};
use crate::notify::Notifier;
use crate::source::ResourceSource;
use crate::tree::{CompileEnv, PathLookup};

pub struct Injector {
    pub(crate) source: Arc<dyn ResourceSource>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) types: TypeRegistry,
    pub(crate) accessors: AccessorRegistry,
    pub(crate) converters: Vec<Arc<dyn Converter>>,
    pub(crate) default_converter: DefaultConverter,
    pub(crate) post_inject: HashMap<String, Arc<dyn PostInject>>,
    pub(crate) deprecated_tag: String,
    pub(crate) null_tag: String,
    cache: DashMap<(String, String), Arc<InjectDescriptor>>,
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
         .field("types", &self.types)
         .field("accessors", &self.accessors)
         .field("deprecated_tag", &self.deprecated_tag)
         .field("null_tag", &self.null_tag)
         .field("cached_roots", &self.cache.len())
         .finish()
    }
}

impl Injector {
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new()
    }

    /// Motor con colaboradores por omisión sobre la fuente dada.
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self::builder().source(source).build()
    }

    pub(crate) fn from_parts(source: Arc<dyn ResourceSource>,
                             notifier: Arc<dyn Notifier>,
                             types: TypeRegistry,
                             accessors: AccessorRegistry,
                             converters: Vec<Arc<dyn Converter>>,
                             post_inject: HashMap<String, Arc<dyn PostInject>>,
                             deprecated_tag: String,
                             null_tag: String)
                             -> Self {
        Self { source,
               notifier,
               types,
               accessors,
               converters,
               default_converter: DefaultConverter,
               post_inject,
               deprecated_tag,
               null_tag,
               cache: DashMap::new() }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn accessors(&self) -> &AccessorRegistry {
        &self.accessors
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub(crate) fn converters(&self) -> &[Arc<dyn Converter>] {
        &self.converters
    }

    pub(crate) fn default_converter(&self) -> &DefaultConverter {
        &self.default_converter
    }

    pub(crate) fn post_inject_of(&self, type_name: &str) -> Option<&Arc<dyn PostInject>> {
        self.post_inject.get(type_name)
    }

    pub fn null_tag(&self) -> &str {
        &self.null_tag
    }

    pub fn deprecated_tag(&self) -> &str {
        &self.deprecated_tag
    }

    /// Registra un tipo en el catálogo. Como toda mutación de colaboradores,
    /// invalida la cache de raíces compiladas.
    pub fn register_type(&mut self, info: TypeInfo) {
        self.types.register(info);
        self.invalidate();
    }

    /// Registra la extensión de acceso para un tipo.
    pub fn register_accessor(&mut self, type_name: impl Into<String>, accessor: Arc<dyn PropertyAccessor>) {
        self.accessors.register(type_name, accessor);
        self.invalidate();
    }

    /// Anexa un conversor a la cadena, delante del conversor por defecto.
    pub fn register_converter(&mut self, converter: Arc<dyn Converter>) {
        self.converters.push(converter);
        self.invalidate();
    }

    /// Registra el callback de post-inyección de un tipo. No invalida: los
    /// callbacks no participan de la compilación de raíces.
    pub fn register_post_inject(&mut self, type_name: impl Into<String>, callback: Arc<dyn PostInject>) {
        self.post_inject.insert(type_name.into(), callback);
    }

    pub fn set_deprecated_tag(&mut self, tag: impl Into<String>) {
        self.deprecated_tag = tag.into();
        self.invalidate();
    }

    pub fn set_null_tag(&mut self, tag: impl Into<String>) {
        self.null_tag = tag.into();
        self.invalidate();
    }

    /// Descarta todas las raíces compiladas; se recompilan perezosamente en
    /// el próximo uso.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// Raíz compilada del par (tipo, locale), compilando si hace falta. La
    /// compilación ocurre completa y local antes de publicar; una carrera
    /// entre lectores puede compilar dos veces pero jamás publica un árbol
    /// parcial, y los recorridos en curso retienen su raíz vía `Arc`.
    pub fn descriptor(&self, type_name: &str, locale: &str) -> Arc<InjectDescriptor> {
        let key = (type_name.to_string(), locale.to_string());
        if let Some(descriptor) = self.cache.get(&key) {
            return Arc::clone(&descriptor);
        }
        let raw = self.source.values(type_name, locale);
        let env = CompileEnv { types: &self.types,
                               accessors: &self.accessors,
                               notifier: self.notifier.as_ref(),
                               deprecated_tag: &self.deprecated_tag };
        let descriptor = Arc::new(InjectDescriptor::compile(type_name, locale, raw, &env));
        self.cache.insert(key, descriptor.clone());
        descriptor
    }

    /// Aplica sobre `bean` todas las definiciones del par (tipo, locale).
    ///
    /// Las anomalías recuperables se notifican y detienen sólo el subárbol
    /// afectado; `Err` únicamente ante una condición fatal. Un tipo sin
    /// definiciones es un no-op barato (raíz centinela cacheada).
    pub fn inject(&self, bean: &mut Value, type_name: &str, locale: &str) -> Result<(), InjectError> {
        let descriptor = self.descriptor(type_name, locale);
        if descriptor.is_empty() {
            return Ok(());
        }
        let root_type = TypeRef::Object(type_name.to_string());
        let ctx = InjectionContext { injector: self,
                                     descriptor: &descriptor,
                                     node: descriptor.tree().root(),
                                     expected: root_type.clone() };
        ctx.inject_children(descriptor.tree().root(), bean, &root_type)
    }

    /// Aplica sobre `element` las sub-definiciones colgadas de `path` dentro
    /// de la raíz del par (tipo, locale). Es la vía para inyectar un elemento
    /// recién creado fuera del pase principal (típicamente desde un callback
    /// de post-inyección). Una ruta inexistente o malformada se notifica y es
    /// un no-op.
    pub fn inject_path(&self,
                       element: &mut Value,
                       type_name: &str,
                       locale: &str,
                       path: &str)
                       -> Result<(), InjectError> {
        let descriptor = self.descriptor(type_name, locale);
        let tree = descriptor.tree();
        let node = match tree.find_path(tree.root(), path) {
            PathLookup::Found(node) => node,
            PathLookup::NotFound => {
                self.notifier.notify(path, "no definitions under path", None);
                return Ok(());
            }
            PathLookup::Malformed(err) => {
                self.notifier.notify(path, "illegal expression", Some(&err));
                return Ok(());
            }
        };
        let element_type = self.expected_along(&TypeRef::Object(type_name.to_string()), path);
        let ctx = InjectionContext { injector: self,
                                     descriptor: &descriptor,
                                     node,
                                     expected: element_type.clone() };
        ctx.inject_children(node, element, &element_type)
    }

    /// Camina los segmentos de `path` por el catálogo para deducir el tipo
    /// declarado del valor que vive al final de la ruta.
    fn expected_along(&self, root: &TypeRef, path: &str) -> TypeRef {
        use crate::path::{resolve_next, Segment};
        let mut current = root.clone();
        let mut rest = path;
        while !rest.is_empty() {
            let Ok((seg, tail)) = resolve_next(rest) else {
                return TypeRef::Any;
            };
            current = match &seg {
                Segment::Simple(name) => {
                    match self.accessors.property_ctx(&self.types, &current, name) {
                        Some(pctx) => pctx.declared,
                        None => TypeRef::Any,
                    }
                }
                Segment::Indexed(_) | Segment::Mapped(_) => current.element(),
            };
            rest = tail;
        }
        current
    }
}
