//! Motor de templates sobre raíces compiladas completas.

use std::sync::Arc;

use serde_json::json;

use resin_core::{CollectingNotifier, InMemoryResourceSource, Injector};

fn build(entries: &[(&str, &str)]) -> (Injector, Arc<CollectingNotifier>) {
    let mut source = InMemoryResourceSource::new();
    source.insert_all("Screen", "base", entries);
    let notifier = Arc::new(CollectingNotifier::new());
    let injector = Injector::builder().source(Arc::new(source))
                                      .notifier(notifier.clone())
                                      .build();
    (injector, notifier)
}

fn inject(injector: &Injector) -> serde_json::Value {
    let mut bean = json!({});
    injector.inject(&mut bean, "Screen", "base").expect("inject ok");
    bean
}

#[test]
fn subtree_templates_merge_with_explicit_values_winning() {
    let (injector, notifier) = build(&[("button.label", "Push"),
                                       ("button.width", "80"),
                                       ("ok", "%{button}"),
                                       ("ok.label", "Accept")]);
    let bean = inject(&injector);
    // el valor explícito del sitio gana sobre el aportado por el template
    assert_eq!(bean["ok"]["label"], json!("Accept"));
    assert_eq!(bean["ok"]["width"], json!(80));
    assert!(notifier.is_empty(), "{:?}", notifier.snapshot());
}

#[test]
fn option_substitution_reaches_nested_definitions() {
    // el template parametrizado se declara con sus marcadores de opción
    let (injector, notifier) = build(&[("frame{app}{doc}.title", "{app} - {doc}"),
                                       ("frame{app}{doc}.status.hint", "Editing {doc}"),
                                       ("main", "%{frame{app=Resin}{doc=draft.txt}}")]);
    let bean = inject(&injector);
    assert_eq!(bean["main"]["title"], json!("Resin - draft.txt"));
    // la sustitución baja a las definiciones anidadas mergeadas
    assert_eq!(bean["main"]["status"]["hint"], json!("Editing draft.txt"));
    assert!(notifier.is_empty(), "{:?}", notifier.snapshot());
}

#[test]
fn distinct_option_sets_are_distinct_template_identities() {
    let (injector, notifier) = build(&[("greet", "Hi"),
                                       ("greet{name}", "Hi {name}"),
                                       ("plain", "%{greet}"),
                                       ("fancy", "%{greet{name=Ada}}")]);
    let bean = inject(&injector);
    assert_eq!(bean["plain"], json!("Hi"));
    assert_eq!(bean["fancy"], json!("Hi Ada"));
    assert!(notifier.is_empty(), "{:?}", notifier.snapshot());
}

#[test]
fn undefined_template_keeps_the_literal_and_notifies() {
    let (injector, notifier) = build(&[("title", "%{missing=ignored}")]);
    let bean = inject(&injector);
    // la definición queda sin expandir y fluye como literal plano
    assert_eq!(bean["title"], json!("%{missing=ignored}"));
    let anomalies = notifier.snapshot();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].detail, "undefined template");
}

#[test]
fn self_and_ancestor_references_are_cut_not_looped() {
    let (injector, notifier) = build(&[("a", "%{b}"), ("b", "%{a}"), ("deep.x", "%{deep}")]);
    // terminar ya es el grueso del test: el ciclo debe cortarse, no colgarse
    let _ = inject(&injector);
    let details: Vec<_> = notifier.snapshot().into_iter().map(|n| n.detail).collect();
    assert!(details.iter().any(|d| d == "recursive template"), "{details:?}");
}

#[test]
fn call_site_default_wins_over_the_template_definition() {
    let (injector, notifier) = build(&[("salute{who}", "Hello {who}!"),
                                       ("header", "%{salute{who=world}}"),
                                       ("footer", "%{salute{who=again}=bye}")]);
    let bean = inject(&injector);
    // sin `=valor` hereda la definición del template, con él la pisa
    assert_eq!(bean["header"], json!("Hello world!"));
    assert_eq!(bean["footer"], json!("bye"));
    assert!(notifier.is_empty(), "{:?}", notifier.snapshot());
}

#[test]
fn transitive_expansion_follows_template_chains() {
    let (injector, notifier) = build(&[("base", "ground"),
                                       ("middle", "%{base}"),
                                       ("top", "%{middle}")]);
    let bean = inject(&injector);
    assert_eq!(bean["top"], json!("ground"));
    assert!(notifier.is_empty(), "{:?}", notifier.snapshot());
}

#[test]
fn duplicate_option_rejects_the_call_eagerly() {
    let (injector, notifier) = build(&[("t", "x"), ("bad", "%{t{o=1}{o=2}}")]);
    let bean = inject(&injector);
    // la llamada malformada no se expande: el literal crudo fluye
    assert_eq!(bean["bad"], json!("%{t{o=1}{o=2}}"));
    let anomalies = notifier.snapshot();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].detail, "malformed template call");
}
