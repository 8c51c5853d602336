//! Motor de inyección: orquestador, raíces compiladas y recorrido.

pub mod builder;
pub mod context;
pub mod core;
pub mod descriptor;
mod runtime;

pub use builder::InjectorBuilder;
pub use context::{InjectionContext, PostInject};
pub use core::Injector;
pub use descriptor::InjectDescriptor;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::model::{PropertySpec, TypeInfo, TypeRef};
    use crate::source::InMemoryResourceSource;

    fn demo_source() -> InMemoryResourceSource {
        let mut source = InMemoryResourceSource::new();
        source.insert_all("Dialog",
                          "es",
                          &[("title", "Guardar cambios"),
                            ("width", "320"),
                            ("modal", "true"),
                            ("buttons[0].label", "Aceptar"),
                            ("buttons[1].label", "Cancelar")]);
        source
    }

    fn dialog_type() -> TypeInfo {
        TypeInfo::new("Dialog").with_property("title", PropertySpec::new(TypeRef::Str))
                               .with_property("width", PropertySpec::new(TypeRef::Int))
                               .with_property("modal", PropertySpec::new(TypeRef::Bool))
                               .with_property("buttons",
                                              PropertySpec::new(TypeRef::List(Box::new(TypeRef::Any))))
    }

    #[test]
    fn injects_scalars_and_collections_onto_a_bean() {
        let injector = Injector::builder().source(Arc::new(demo_source()))
                                          .register_type(dialog_type())
                                          .build();
        let mut bean = json!({});
        injector.inject(&mut bean, "Dialog", "es").expect("inject ok");
        assert_eq!(bean["title"], json!("Guardar cambios"));
        assert_eq!(bean["width"], json!(320));
        assert_eq!(bean["modal"], json!(true));
        assert_eq!(bean["buttons"],
                   json!([{ "label": "Aceptar" }, { "label": "Cancelar" }]));
    }

    #[test]
    fn missing_type_is_a_cheap_noop() {
        let injector = Injector::builder().source(Arc::new(demo_source())).build();
        let mut bean = json!({ "kept": 1 });
        injector.inject(&mut bean, "Nothing", "es").expect("noop ok");
        assert_eq!(bean, json!({ "kept": 1 }));
        // la raíz centinela queda cacheada para el próximo intento
        assert!(injector.descriptor("Nothing", "es").is_empty());
    }

    #[test]
    fn inject_path_applies_a_subtree_onto_a_fresh_element() {
        let injector = Injector::builder().source(Arc::new(demo_source()))
                                          .register_type(dialog_type())
                                          .build();
        let mut element = json!({});
        injector.inject_path(&mut element, "Dialog", "es", "buttons[1]")
                .expect("inject_path ok");
        assert_eq!(element, json!({ "label": "Cancelar" }));
    }
}
