//! Carga de catálogos de tipos desde JSON.
//!
//! El formato es la serialización serde directa de `TypeInfo`, en lista:
//!
//! ```json
//! [{ "name": "Dialog",
//!    "properties": { "title": { "type_ref": "Str" } },
//!    "inject_order": ["title"] }]
//! ```

use resin_core::engine::InjectorBuilder;
use resin_core::model::TypeInfo;

pub fn load_catalog(json: &str) -> Result<Vec<TypeInfo>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Carga y registra un catálogo completo sobre un builder.
pub fn register_catalog(mut builder: InjectorBuilder,
                        json: &str)
                        -> Result<InjectorBuilder, serde_json::Error> {
    for info in load_catalog(json)? {
        builder = builder.register_type(info);
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resin_core::model::TypeRef;

    #[test]
    fn catalogs_deserialize_with_defaulted_capabilities() {
        let catalog = load_catalog(r#"[
            { "name": "Dialog",
              "properties": {
                  "title": { "type_ref": "Str" },
                  "id": { "type_ref": "Str", "writeable": false },
                  "buttons": { "type_ref": { "List": { "Object": "Button" } } }
              },
              "inject_order": ["title"] },
            { "name": "Button" }
        ]"#).expect("catalog parses");
        assert_eq!(catalog.len(), 2);
        let dialog = &catalog[0];
        let title = dialog.property("title").expect("title spec");
        assert!(title.readable && title.writeable);
        let id = dialog.property("id").expect("id spec");
        assert!(id.readable && !id.writeable);
        assert_eq!(dialog.property("buttons").expect("buttons spec").type_ref,
                   TypeRef::List(Box::new(TypeRef::Object("Button".into()))));
        assert_eq!(dialog.inject_order, vec!["title".to_string()]);
    }
}
