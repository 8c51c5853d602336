//! Celda de valor convertido, perezosa y descartable.
//!
//! Un nodo cachea oportunísticamente el resultado de convertir su literal
//! para no reconvertir literales idempotentes en pases sucesivos. El
//! contrato incluye recomputar-en-fallo: una celda `Volatile` cuyo referente
//! fue reclamado simplemente vuelve a convertir.

use std::sync::{Arc, Weak};

use serde_json::Value;

#[derive(Debug, Default)]
pub enum CacheCell {
    /// Sin valor calculado todavía.
    #[default]
    Empty,
    /// Conversión idempotente: retenida con fuerza por el nodo.
    Cached(Value),
    /// Conversión diferida: retenida débilmente, puede recomputarse. La vida
    /// del valor la decide quien produjo el `Arc` (típicamente el conversor);
    /// si nadie lo retiene, la celda nunca sirve un hit y cada pase vuelve a
    /// convertir.
    Volatile(Weak<Value>),
}

impl CacheCell {
    /// Valor cacheado si sigue vivo.
    pub fn get(&self) -> Option<Value> {
        match self {
            CacheCell::Empty => None,
            CacheCell::Cached(value) => Some(value.clone()),
            CacheCell::Volatile(weak) => weak.upgrade().map(|arc| (*arc).clone()),
        }
    }

    pub fn store(&mut self, value: Value) {
        *self = CacheCell::Cached(value);
    }

    pub fn store_volatile(&mut self, value: &Arc<Value>) {
        *self = CacheCell::Volatile(Arc::downgrade(value));
    }

    pub fn clear(&mut self) {
        *self = CacheCell::Empty;
    }
}
