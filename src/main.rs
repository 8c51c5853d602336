//! Demo del motor: bundles `.properties`, catálogo JSON, templates y
//! conversión diferida aplicados sobre un bean dinámico.

use std::sync::Arc;

use serde_json::{json, to_string_pretty};

use resin_adapters::{register_catalog, KeyedWriteAccessor, NowConverter, PropertiesResourceSource};
use resin_core::{CollectingNotifier, Injector};

const CATALOG: &str = r#"[
    { "name": "Dialog",
      "properties": {
          "title":    { "type_ref": "Str" },
          "width":    { "type_ref": "Int" },
          "modal":    { "type_ref": "Bool" },
          "openedAt": { "type_ref": "Str" },
          "buttons":  { "type_ref": { "List": { "Object": "Button" } } },
          "colors":   { "type_ref": { "Map": "Str" }, "readable": false }
      },
      "inject_order": ["title", "width"] },
    { "name": "Button",
      "properties": {
          "label": { "type_ref": "Str" },
          "icon":  { "type_ref": "Str" }
      } }
]"#;

fn demo_source() -> PropertiesResourceSource {
    let mut source = PropertiesResourceSource::new();
    source.add_bundle("Dialog",
                      "",
                      "# plantilla base de botones\n\
                       button{icon}.icon = icons/{icon}.png\n\
                       title = Untitled\n\
                       width = 400\n\
                       modal = true\n\
                       openedAt = @now\n\
                       buttons[0] = %{button{icon=ok}}\n\
                       buttons[0].label = OK\n\
                       buttons[1] = %{button{icon=cancel}}\n\
                       buttons[1].label = Cancel\n\
                       colors(background) = #202020\n\
                       colors(foreground) = #f0f0f0\n\
                       legacy = @deprecated\n");
    source.add_bundle("Dialog",
                      "es",
                      "title = Sin título\n\
                       buttons[0].label = Aceptar\n\
                       buttons[1].label = Cancelar\n");
    source
}

fn main() {
    let notifier = Arc::new(CollectingNotifier::new());
    let builder = Injector::builder().source(Arc::new(demo_source()))
                                     .notifier(notifier.clone())
                                     .register_converter(Arc::new(NowConverter))
                                     .register_accessor("Dialog",
                                                        Arc::new(KeyedWriteAccessor::new(["colors"])));
    let injector = register_catalog(builder, CATALOG).expect("catálogo válido")
                                                     .build();

    for locale in ["", "es"] {
        let mut dialog = json!({});
        injector.inject(&mut dialog, "Dialog", locale)
                .expect("sin condiciones fatales en la demo");
        let label = if locale.is_empty() { "base" } else { locale };
        println!("==== Dialog ({label}) ====");
        println!("{}", to_string_pretty(&dialog).unwrap_or_default());
    }

    let anomalies = notifier.take();
    if anomalies.is_empty() {
        println!("Sin anomalías notificadas.");
    } else {
        println!("Anomalías notificadas:");
        for anomaly in anomalies {
            match anomaly.cause {
                Some(cause) => println!("  [{}] {}: {}", anomaly.location, anomaly.detail, cause),
                None => println!("  [{}] {}", anomaly.location, anomaly.detail),
            }
        }
    }
}
