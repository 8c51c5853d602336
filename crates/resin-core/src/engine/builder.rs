//! Builder fluido del orquestador.

use std::collections::HashMap;
use std::sync::Arc;

use crate::accessor::{AccessorRegistry, PropertyAccessor};
use crate::constants::{DEFAULT_DEPRECATED_TAG, DEFAULT_NULL_TAG};
use crate::convert::Converter;
use crate::engine::context::PostInject;
use crate::engine::core::Injector;
use crate::model::{TypeInfo, TypeRegistry};
use crate::notify::{LogNotifier, Notifier};
use crate::source::{InMemoryResourceSource, ResourceSource};

/// Armado declarativo de un [`Injector`] con sus colaboradores. Todo es
/// opcional: sin fuente queda una fuente en memoria vacía, sin notificador
/// queda el logger.
pub struct InjectorBuilder {
    source: Option<Arc<dyn ResourceSource>>,
    notifier: Arc<dyn Notifier>,
    types: TypeRegistry,
    accessors: AccessorRegistry,
    converters: Vec<Arc<dyn Converter>>,
    post_inject: HashMap<String, Arc<dyn PostInject>>,
    deprecated_tag: String,
    null_tag: String,
}

impl Default for InjectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectorBuilder {
    pub fn new() -> Self {
        Self { source: None,
               notifier: Arc::new(LogNotifier),
               types: TypeRegistry::new(),
               accessors: AccessorRegistry::new(),
               converters: Vec::new(),
               post_inject: HashMap::new(),
               deprecated_tag: DEFAULT_DEPRECATED_TAG.to_string(),
               null_tag: DEFAULT_NULL_TAG.to_string() }
    }

    pub fn source(mut self, source: Arc<dyn ResourceSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn register_type(mut self, info: TypeInfo) -> Self {
        self.types.register(info);
        self
    }

    pub fn register_accessor(mut self,
                             type_name: impl Into<String>,
                             accessor: Arc<dyn PropertyAccessor>)
                             -> Self {
        self.accessors.register(type_name, accessor);
        self
    }

    pub fn register_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn register_post_inject(mut self,
                                type_name: impl Into<String>,
                                callback: Arc<dyn PostInject>)
                                -> Self {
        self.post_inject.insert(type_name.into(), callback);
        self
    }

    pub fn deprecated_tag(mut self, tag: impl Into<String>) -> Self {
        self.deprecated_tag = tag.into();
        self
    }

    pub fn null_tag(mut self, tag: impl Into<String>) -> Self {
        self.null_tag = tag.into();
        self
    }

    pub fn build(self) -> Injector {
        let source = self.source
                         .unwrap_or_else(|| Arc::new(InMemoryResourceSource::new()));
        Injector::from_parts(source,
                             self.notifier,
                             self.types,
                             self.accessors,
                             self.converters,
                             self.post_inject,
                             self.deprecated_tag,
                             self.null_tag)
    }
}
