//! Errores del core de inyección.
//!
//! Sólo `Fatal` se propaga como `Err` hasta el llamador de `inject`; el resto
//! son anomalías recuperables que viajan por el canal de notificación y
//! detienen únicamente el subárbol afectado.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InjectError {
    #[error("invalid path expression '{0}'")]
    InvalidPath(String),
    #[error("undefined property '{0}'")]
    UndefinedProperty(String),
    #[error("unsupported {nature} access at '{path}'")]
    UnsupportedNature { path: String, nature: &'static str },
    #[error("property '{0}' is not readable")]
    NotReadable(String),
    #[error("property '{0}' is not writeable")]
    NotWriteable(String),
    #[error("undefined template '{0}'")]
    UndefinedTemplate(String),
    #[error("recursive template '{0}'")]
    RecursiveTemplate(String),
    #[error("malformed template call: {0}")]
    MalformedTemplate(String),
    #[error("conversion of '{literal}' failed: {reason}")]
    Conversion { literal: String, reason: String },
    #[error("non-empty literal '{0}' converted to null")]
    NullConversion(String),
    #[error("fatal: {0}")]
    Fatal(String),
}

impl InjectError {
    /// Las condiciones fatales se relanzan siempre, incluso a mitad de un
    /// recorrido; todo lo demás se notifica y se sigue con los hermanos.
    pub fn is_fatal(&self) -> bool {
        matches!(self, InjectError::Fatal(_))
    }
}
