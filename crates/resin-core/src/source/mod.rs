//! Fuente de recursos: las definiciones planas clave→texto por (tipo, locale)
//! desde las que se compila una raíz. El orden de entrada es irrelevante (la
//! compilación estabiliza el orden), pero devolvemos un `IndexMap` para que
//! la iteración sea determinista de todos modos.

use std::collections::HashMap;

use indexmap::IndexMap;

pub trait ResourceSource: Send + Sync {
    fn values(&self, type_name: &str, locale: &str) -> IndexMap<String, String>;
}

/// Fuente en memoria para tests y herramientas.
#[derive(Debug, Default)]
pub struct InMemoryResourceSource {
    inner: HashMap<(String, String), IndexMap<String, String>>,
}

impl InMemoryResourceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self,
                  type_name: impl Into<String>,
                  locale: impl Into<String>,
                  key: impl Into<String>,
                  value: impl Into<String>) {
        self.inner
            .entry((type_name.into(), locale.into()))
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Variante cómoda para sembrar varias claves de una vez.
    pub fn insert_all(&mut self, type_name: &str, locale: &str, entries: &[(&str, &str)]) {
        for (key, value) in entries {
            self.insert(type_name, locale, *key, *value);
        }
    }
}

impl ResourceSource for InMemoryResourceSource {
    fn values(&self, type_name: &str, locale: &str) -> IndexMap<String, String> {
        self.inner
            .get(&(type_name.to_string(), locale.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}
