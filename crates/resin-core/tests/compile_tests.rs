//! Compilación de raíces: orden estable, poda, aislamiento de claves malas.

use std::sync::Arc;

use resin_core::{CollectingNotifier, Injector, InMemoryResourceSource, Nature, PropertySpec,
                 Segment, TypeInfo, TypeRef};

fn injector_with(entries: &[(&str, &str)], types: Vec<TypeInfo>) -> (Injector, Arc<CollectingNotifier>) {
    let mut source = InMemoryResourceSource::new();
    source.insert_all("Widget", "base", entries);
    let notifier = Arc::new(CollectingNotifier::new());
    let mut builder = Injector::builder().source(Arc::new(source)).notifier(notifier.clone());
    for info in types {
        builder = builder.register_type(info);
    }
    (builder.build(), notifier)
}

#[test]
fn children_sort_stably_by_nature_then_id() {
    let (injector, _) = injector_with(&[("items[2]", "c"),
                                        ("items(zz)", "m2"),
                                        ("items[0]", "a"),
                                        ("items(aa)", "m1"),
                                        ("items[10]", "k")],
                                      vec![]);
    let descriptor = injector.descriptor("Widget", "base");
    let tree = descriptor.tree();
    let resin_core::PathLookup::Found(items) = tree.find_path(tree.root(), "items") else {
        panic!("items node expected");
    };
    let segs: Vec<_> = tree.children(items)
                           .iter()
                           .map(|c| tree.node(*c).segment().cloned().unwrap())
                           .collect();
    // indexados ascendentes por índice numérico, mapeados después por clave
    assert_eq!(segs,
               vec![Segment::Indexed(0),
                    Segment::Indexed(2),
                    Segment::Indexed(10),
                    Segment::Mapped("aa".into()),
                    Segment::Mapped("zz".into())]);
    // el tamaño implícito cubre el índice máximo
    assert_eq!(tree.node(items).size, Some(11));
    // natures divergentes degradan a Simple
    assert_eq!(tree.node(items).children_nature, Some(Nature::Simple));
}

#[test]
fn deprecated_subtrees_are_dropped_silently() {
    let (injector, notifier) = injector_with(&[("old", "@deprecated"),
                                               ("old.child", "never compiled"),
                                               ("kept", "yes")],
                                             vec![]);
    let descriptor = injector.descriptor("Widget", "base");
    let tree = descriptor.tree();
    assert!(matches!(tree.find_path(tree.root(), "old"), resin_core::PathLookup::NotFound));
    assert!(matches!(tree.find_path(tree.root(), "kept"), resin_core::PathLookup::Found(_)));
    // la poda de deprecados no es una anomalía
    assert!(notifier.is_empty());
}

#[test]
fn malformed_key_skips_only_that_key() {
    let (injector, notifier) = injector_with(&[("good", "1"), ("bad..key", "2"), ("also.good", "3")],
                                             vec![]);
    let descriptor = injector.descriptor("Widget", "base");
    let tree = descriptor.tree();
    assert!(matches!(tree.find_path(tree.root(), "good"), resin_core::PathLookup::Found(_)));
    assert!(matches!(tree.find_path(tree.root(), "also.good"), resin_core::PathLookup::Found(_)));
    let anomalies = notifier.snapshot();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].location, "bad..key");
    assert_eq!(anomalies[0].detail, "illegal expression");
}

#[test]
fn unsupported_nature_rejects_subtree_one_level_up() {
    // `title` es Str: no admite hijos indexados; el subárbol entero se
    // descarta y se notifica con la ruta canónica del hijo ofensor
    let info = TypeInfo::new("Widget").with_property("title", PropertySpec::new(TypeRef::Str))
                                      .with_property("tags",
                                                     PropertySpec::new(TypeRef::List(Box::new(TypeRef::Str))));
    let (injector, notifier) = injector_with(&[("title[0]", "nope"),
                                               ("title[0].deep", "deeper"),
                                               ("tags[0]", "ok")],
                                             vec![info]);
    let descriptor = injector.descriptor("Widget", "base");
    let tree = descriptor.tree();
    assert!(matches!(tree.find_path(tree.root(), "title[0]"), resin_core::PathLookup::NotFound));
    assert!(matches!(tree.find_path(tree.root(), "tags[0]"), resin_core::PathLookup::Found(_)));
    let anomalies = notifier.snapshot();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].location, "title[0]");
    assert_eq!(anomalies[0].detail, "subtree rejected");
}

#[test]
fn settings_mutation_invalidates_compiled_roots() {
    let (mut injector, _) = injector_with(&[("gone", "@obsolete"), ("kept", "si")], vec![]);
    {
        let descriptor = injector.descriptor("Widget", "base");
        // con el tag por omisión, `gone` no está deprecado
        assert!(matches!(descriptor.tree().find_path(descriptor.tree().root(), "gone"),
                         resin_core::PathLookup::Found(_)));
    }
    injector.set_deprecated_tag("@obsolete");
    let descriptor = injector.descriptor("Widget", "base");
    assert!(matches!(descriptor.tree().find_path(descriptor.tree().root(), "gone"),
                     resin_core::PathLookup::NotFound));
}
