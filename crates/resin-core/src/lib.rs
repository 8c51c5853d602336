//! resin-core: motor de inyección de propiedades dirigida por recursos.
//!
//! Definiciones planas clave→texto por (tipo, locale) se compilan una vez en
//! árboles de inyección y se aplican sobre beans vivos (`serde_json::Value`).
//! La conversión texto→valor es perezosa y cacheada por nodo; las anomalías
//! recuperables viajan por el canal de notificación y jamás abortan el pase.

pub mod accessor;
pub mod constants;
pub mod convert;
pub mod engine;
pub mod errors;
pub mod model;
pub mod notify;
pub mod path;
pub mod source;
pub mod template;
pub mod tree;

pub use accessor::{AccessorRegistry, DynBeanAccessor, PropertyAccessor, PropertyContext};
pub use convert::{Converted, ConvertCtx, Converter, DefaultConverter};
pub use engine::{InjectDescriptor, InjectionContext, Injector, InjectorBuilder, PostInject};
pub use errors::InjectError;
pub use model::{PropertySpec, TypeInfo, TypeRef, TypeRegistry};
pub use notify::{CollectingNotifier, LogNotifier, Notification, Notifier, NullNotifier};
pub use path::{Nature, Segment};
pub use source::{InMemoryResourceSource, ResourceSource};
pub use tree::{InjectionTree, NodeId, PathLookup};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    #[test]
    fn end_to_end_smoke_with_templates_and_locale() {
        let mut source = InMemoryResourceSource::new();
        source.insert_all("Greeter",
                          "en",
                          &[("salute{who}", "Hello {who}!"),
                            ("header", "%{salute{who=world}}"),
                            ("footer", "%{salute{who=again}=bye}")]);
        let notifier = Arc::new(CollectingNotifier::new());
        let injector = Injector::builder().source(Arc::new(source))
                                          .notifier(notifier.clone())
                                          .build();
        let mut bean = json!({});
        injector.inject(&mut bean, "Greeter", "en").expect("inject ok");
        assert_eq!(bean["header"], json!("Hello world!"));
        // el `=valor` del sitio de la llamada gana sobre el template
        assert_eq!(bean["footer"], json!("bye"));
        assert!(notifier.is_empty(), "no anomalies expected: {:?}", notifier.snapshot());
    }
}
