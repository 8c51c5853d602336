//! Fuente de recursos sobre texto estilo `.properties`.
//!
//! Cada bundle es el texto plano de un par (tipo, locale); el locale vacío es
//! el bundle base del tipo. La resolución de valores aplica la cadena de
//! fallback clásica: base → lengua → lengua_región, donde lo más específico
//! pisa clave a clave a lo más general.

use std::collections::HashMap;

use indexmap::IndexMap;

use resin_core::source::ResourceSource;

#[derive(Debug, Default)]
pub struct PropertiesResourceSource {
    bundles: HashMap<(String, String), IndexMap<String, String>>,
}

impl PropertiesResourceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra (o reemplaza) el bundle del par (tipo, locale) parseando el
    /// texto. Locale vacío = bundle base del tipo.
    pub fn add_bundle(&mut self, type_name: impl Into<String>, locale: impl Into<String>, text: &str) {
        self.bundles
            .insert((type_name.into(), locale.into()), parse_properties(text));
    }

    fn bundle(&self, type_name: &str, locale: &str) -> Option<&IndexMap<String, String>> {
        self.bundles.get(&(type_name.to_string(), locale.to_string()))
    }
}

impl ResourceSource for PropertiesResourceSource {
    fn values(&self, type_name: &str, locale: &str) -> IndexMap<String, String> {
        let mut merged = IndexMap::new();
        for candidate in fallback_chain(locale) {
            if let Some(bundle) = self.bundle(type_name, &candidate) {
                for (key, value) in bundle {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
        merged
    }
}

/// Cadena de fallback de menos a más específico: `""`, `"es"`, `"es_MX"`.
fn fallback_chain(locale: &str) -> Vec<String> {
    let mut chain = vec![String::new()];
    if locale.is_empty() {
        return chain;
    }
    if let Some((lang, _region)) = locale.split_once('_') {
        chain.push(lang.to_string());
    }
    chain.push(locale.to_string());
    chain
}

/// Parser mínimo del formato `.properties`: comentarios `#`/`!`, separador
/// `=` o `:`, continuación con `\` al final de línea. Sin escapes unicode.
fn parse_properties(text: &str) -> IndexMap<String, String> {
    let mut entries = IndexMap::new();
    let mut pending = String::new();
    for raw in text.lines() {
        let line = raw.trim_start();
        if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }
        if let Some(truncated) = line.strip_suffix('\\') {
            pending.push_str(truncated);
            continue;
        }
        pending.push_str(line);
        let logical = std::mem::take(&mut pending);
        let Some(split) = logical.find(|c| c == '=' || c == ':') else {
            // una clave sin separador vale como clave con valor vacío
            entries.insert(logical.trim_end().to_string(), String::new());
            continue;
        };
        let key = logical[..split].trim_end().to_string();
        let value = logical[split + 1..].trim_start().to_string();
        if !key.is_empty() {
            entries.insert(key, value);
        }
    }
    if !pending.is_empty() {
        entries.insert(pending.trim_end().to_string(), String::new());
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comments_separators_and_continuations() {
        let parsed = parse_properties("# comment\n\
                                       ! other comment\n\
                                       title = Hello\n\
                                       code: 200\n\
                                       long = one \\\n\
                                       two\n\
                                       bare\n");
        assert_eq!(parsed.get("title").map(String::as_str), Some("Hello"));
        assert_eq!(parsed.get("code").map(String::as_str), Some("200"));
        assert_eq!(parsed.get("long").map(String::as_str), Some("one two"));
        assert_eq!(parsed.get("bare").map(String::as_str), Some(""));
    }

    #[test]
    fn locale_chain_overrides_base_keys() {
        let mut source = PropertiesResourceSource::new();
        source.add_bundle("Dialog", "", "title=Default\nwidth=100\n");
        source.add_bundle("Dialog", "es", "title=Hola\n");
        source.add_bundle("Dialog", "es_MX", "title=Qué onda\n");
        let base = source.values("Dialog", "");
        assert_eq!(base.get("title").map(String::as_str), Some("Default"));
        let es = source.values("Dialog", "es");
        assert_eq!(es.get("title").map(String::as_str), Some("Hola"));
        assert_eq!(es.get("width").map(String::as_str), Some("100"));
        let mx = source.values("Dialog", "es_MX");
        assert_eq!(mx.get("title").map(String::as_str), Some("Qué onda"));
        assert_eq!(mx.get("width").map(String::as_str), Some("100"));
    }
}
