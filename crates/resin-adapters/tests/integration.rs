//! Integración adapters ↔ core: bundles `.properties`, catálogo JSON,
//! conversor diferido y pseudo-colección sólo-setter en un solo pase.

use std::sync::Arc;

use serde_json::json;

use resin_adapters::{register_catalog, KeyedWriteAccessor, NowConverter, PropertiesResourceSource};
use resin_core::{CollectingNotifier, Injector};

const CATALOG: &str = r#"[
    { "name": "Report",
      "properties": {
          "title":   { "type_ref": "Str" },
          "width":   { "type_ref": "Int" },
          "stamped": { "type_ref": "Str" },
          "columns": { "type_ref": { "List": "Str" } },
          "colors":  { "type_ref": { "Map": "Str" }, "readable": false }
      },
      "inject_order": ["title"] }
]"#;

fn build_injector(notifier: Arc<CollectingNotifier>) -> Injector {
    let mut source = PropertiesResourceSource::new();
    source.add_bundle("Report",
                      "",
                      "title = Report\n\
                       width = 640\n\
                       stamped = @now\n\
                       columns[0] = id\n\
                       columns[1] = name\n");
    source.add_bundle("Report",
                      "es",
                      "title = Informe\n\
                       colors(header) = #222\n\
                       colors(body) = #eee\n");
    let builder = Injector::builder().source(Arc::new(source))
                                     .notifier(notifier)
                                     .register_converter(Arc::new(NowConverter))
                                     .register_accessor("Report",
                                                        Arc::new(KeyedWriteAccessor::new(["colors"])));
    register_catalog(builder, CATALOG).expect("catalog loads").build()
}

#[test]
fn locale_bundles_catalog_and_extensions_cooperate() {
    let notifier = Arc::new(CollectingNotifier::new());
    let injector = build_injector(notifier.clone());
    let mut bean = json!({});
    injector.inject(&mut bean, "Report", "es").expect("inject ok");

    // el bundle es pisa el título pero hereda el resto del base
    assert_eq!(bean["title"], json!("Informe"));
    assert_eq!(bean["width"], json!(640));
    assert_eq!(bean["columns"], json!(["id", "name"]));
    // la pseudo-colección entró por escrituras por clave
    assert_eq!(bean["colors"], json!({ "header": "#222", "body": "#eee" }));
    // @now produjo una marca RFC 3339
    let stamped = bean["stamped"].as_str().expect("stamped string");
    assert!(stamped.contains('T'), "unexpected timestamp shape: {stamped}");
    assert!(notifier.is_empty(), "{:?}", notifier.snapshot());
}

#[test]
fn base_locale_still_works_without_overrides() {
    let notifier = Arc::new(CollectingNotifier::new());
    let injector = build_injector(notifier.clone());
    let mut bean = json!({});
    injector.inject(&mut bean, "Report", "").expect("inject ok");
    assert_eq!(bean["title"], json!("Report"));
    assert!(bean.get("colors").is_none());
    assert!(notifier.is_empty(), "{:?}", notifier.snapshot());
}
