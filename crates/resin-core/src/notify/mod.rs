//! Canal de notificación de anomalías recuperables.
//!
//! Toda anomalía recuperable de compilación o de recorrido pasa por aquí con
//! un payload de tres partes (ruta canónica, motivo corto, causa opcional).
//! Los consumidores deciden: loguear, coleccionar o ignorar. El pase de
//! inyección nunca aborta por una anomalía notificada.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::errors::InjectError;

/// Registro de una anomalía notificada.
#[derive(Debug, Clone)]
pub struct Notification {
    pub location: String,
    pub detail: String,
    pub cause: Option<InjectError>,
    pub ts: DateTime<Utc>,
}

/// Sumidero de anomalías recuperables.
pub trait Notifier: Send + Sync {
    fn notify(&self, location: &str, detail: &str, cause: Option<&InjectError>);
}

/// Notificador por defecto: vuelca al logger con `log::warn!`.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, location: &str, detail: &str, cause: Option<&InjectError>) {
        match cause {
            Some(err) => log::warn!("[{location}] {detail}: {err}"),
            None => log::warn!("[{location}] {detail}"),
        }
    }
}

/// Notificador que acumula en memoria; pensado para tests que quieren fallar
/// ruidosamente o contar anomalías exactas.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    inner: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Vacía y devuelve lo acumulado.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.inner.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, location: &str, detail: &str, cause: Option<&InjectError>) {
        self.lock().push(Notification { location: location.to_string(),
                                        detail: detail.to_string(),
                                        cause: cause.cloned(),
                                        ts: Utc::now() });
    }
}

/// Notificador nulo: descarta todo. Útil como colaborador por omisión en
/// herramientas que sólo quieren el efecto de la inyección.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _location: &str, _detail: &str, _cause: Option<&InjectError>) {}
}
