//! Conversores con opiniones sobre la cadena del motor.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use resin_core::convert::{Converted, ConvertCtx, Converter};
use resin_core::errors::InjectError;
use resin_core::model::TypeRef;

/// Conversor de marcas de tiempo: el literal `@now` produce el instante de
/// conversión en RFC 3339. El resultado es deliberadamente `Deferred`: no es
/// idempotente, así que el nodo sólo lo retiene débilmente y cada pase que
/// no lo encuentre vivo vuelve a pedir la hora.
#[derive(Debug, Default)]
pub struct NowConverter;

pub const NOW_LITERAL: &str = "@now";

impl Converter for NowConverter {
    fn convert(&self, expected: &TypeRef, literal: &str, _ctx: &ConvertCtx<'_>)
               -> Result<Converted, InjectError> {
        if literal != NOW_LITERAL {
            return Ok(Converted::Unhandled);
        }
        match expected {
            TypeRef::Str | TypeRef::Any => {
                Ok(Converted::Deferred(Arc::new(Value::String(Utc::now().to_rfc3339()))))
            }
            _ => Err(InjectError::Conversion { literal: literal.to_string(),
                                               reason: "timestamps only fit string-like targets"
                                                       .into() }),
        }
    }
}
