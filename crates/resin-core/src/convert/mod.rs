//! Frontera de conversión texto→valor tipado.
//!
//! El contrato es exactamente de tres salidas: valor, valor diferido
//! (cacheado débilmente, puede recomputarse) o fallo. `Unhandled` permite
//! encadenar extensiones registradas delante del conversor por defecto sin
//! que cada una conozca a las demás. El «null tag» configurado en el motor
//! nunca llega aquí: se cortocircuita antes de invocar al colaborador.

use std::sync::Arc;

use serde_json::{Map, Number, Value};

use crate::errors::InjectError;
use crate::model::{TypeRef, TypeRegistry};

/// Resultado de un intento de conversión.
pub enum Converted {
    /// Valor listo; idempotente, cacheable con fuerza.
    Value(Value),
    /// Valor producido pero volátil: se cachea débilmente y puede requerir
    /// recomputación en pases posteriores. El conversor que entrega el `Arc`
    /// es dueño de su vida: si no retiene ninguna copia, cada pase vuelve a
    /// pedir la conversión (es el contrato deseado para valores como marcas
    /// de tiempo).
    Deferred(Arc<Value>),
    /// Este conversor no reconoce el literal/tipo; probar el siguiente.
    Unhandled,
}

/// Información contextual disponible durante una conversión.
pub struct ConvertCtx<'a> {
    /// Ruta canónica del nodo que pide la conversión.
    pub location: &'a str,
    pub types: &'a TypeRegistry,
}

pub trait Converter: Send + Sync {
    fn convert(&self, expected: &TypeRef, literal: &str, ctx: &ConvertCtx<'_>)
               -> Result<Converted, InjectError>;
}

/// Conversor por defecto: escalares, contenedores e instanciación de beans
/// vacíos. Un literal vacío sobre un escalar no-cadena produce nulo (ausencia
/// explícita); sobre un contenedor o bean produce la instancia por defecto.
#[derive(Debug, Default)]
pub struct DefaultConverter;

impl DefaultConverter {
    fn scalar_error(expected: &TypeRef, literal: &str) -> InjectError {
        InjectError::Conversion { literal: literal.to_string(),
                                  reason: format!("not a valid {expected:?}") }
    }

    fn infer(literal: &str) -> Value {
        if let Ok(b) = literal.parse::<bool>() {
            return Value::Bool(b);
        }
        if let Ok(i) = literal.parse::<i64>() {
            return Value::Number(i.into());
        }
        if let Ok(f) = literal.parse::<f64>() {
            if let Some(n) = Number::from_f64(f) {
                return Value::Number(n);
            }
        }
        Value::String(literal.to_string())
    }
}

impl Converter for DefaultConverter {
    fn convert(&self, expected: &TypeRef, literal: &str, ctx: &ConvertCtx<'_>)
               -> Result<Converted, InjectError> {
        let value = match expected {
            TypeRef::Str => Value::String(literal.to_string()),
            TypeRef::Bool if literal.is_empty() => Value::Null,
            TypeRef::Bool => {
                Value::Bool(literal.parse::<bool>().map_err(|_| Self::scalar_error(expected, literal))?)
            }
            TypeRef::Int if literal.is_empty() => Value::Null,
            TypeRef::Int => Value::Number(literal.parse::<i64>()
                                                 .map_err(|_| Self::scalar_error(expected, literal))?
                                                 .into()),
            TypeRef::Float if literal.is_empty() => Value::Null,
            TypeRef::Float => {
                let parsed = literal.parse::<f64>().map_err(|_| Self::scalar_error(expected, literal))?;
                Number::from_f64(parsed).map(Value::Number)
                                        .ok_or_else(|| Self::scalar_error(expected, literal))?
            }
            TypeRef::List(elem) if literal.is_empty() => {
                let _ = elem;
                Value::Array(Vec::new())
            }
            TypeRef::List(elem) => {
                // forma literal de listas: elementos separados por coma
                let mut items = Vec::new();
                for part in literal.split(',') {
                    match self.convert(elem, part.trim(), ctx)? {
                        Converted::Value(v) => items.push(v),
                        Converted::Deferred(v) => items.push((*v).clone()),
                        Converted::Unhandled => return Ok(Converted::Unhandled),
                    }
                }
                Value::Array(items)
            }
            TypeRef::Map(_) if literal.is_empty() => Value::Object(Map::new()),
            TypeRef::Map(_) => {
                return Err(InjectError::Conversion { literal: literal.to_string(),
                                                     reason: "maps have no literal form".into() })
            }
            // placeholder vacío: instancia por defecto del bean anidado
            TypeRef::Object(_) if literal.is_empty() => Value::Object(Map::new()),
            TypeRef::Object(name) => {
                return Err(InjectError::Conversion { literal: literal.to_string(),
                                                     reason: format!("no literal form for bean '{name}'") })
            }
            TypeRef::Any if literal.is_empty() => Value::Null,
            TypeRef::Any => Self::infer(literal),
        };
        Ok(Converted::Value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(types: &'a TypeRegistry) -> ConvertCtx<'a> {
        ConvertCtx { location: "test", types }
    }

    fn value(result: Result<Converted, InjectError>) -> Value {
        match result.expect("conversion ok") {
            Converted::Value(v) => v,
            _ => panic!("expected immediate value"),
        }
    }

    #[test]
    fn scalars_convert_by_declared_type() {
        let types = TypeRegistry::new();
        let c = DefaultConverter;
        assert_eq!(value(c.convert(&TypeRef::Int, "42", &ctx(&types))), Value::from(42));
        assert_eq!(value(c.convert(&TypeRef::Bool, "true", &ctx(&types))), Value::Bool(true));
        assert_eq!(value(c.convert(&TypeRef::Str, "42", &ctx(&types))), Value::from("42"));
    }

    #[test]
    fn empty_literal_is_explicit_absence_for_scalars() {
        let types = TypeRegistry::new();
        let c = DefaultConverter;
        assert_eq!(value(c.convert(&TypeRef::Int, "", &ctx(&types))), Value::Null);
        // pero una cadena vacía es una cadena vacía, no ausencia
        assert_eq!(value(c.convert(&TypeRef::Str, "", &ctx(&types))), Value::from(""));
    }

    #[test]
    fn empty_placeholder_materializes_default_instances() {
        let types = TypeRegistry::new();
        let c = DefaultConverter;
        assert_eq!(value(c.convert(&TypeRef::Object("StatusBar".into()), "", &ctx(&types))),
                   serde_json::json!({}));
        assert_eq!(value(c.convert(&TypeRef::List(Box::new(TypeRef::Str)), "", &ctx(&types))),
                   serde_json::json!([]));
    }

    #[test]
    fn list_literals_split_on_commas() {
        let types = TypeRegistry::new();
        let c = DefaultConverter;
        assert_eq!(value(c.convert(&TypeRef::List(Box::new(TypeRef::Int)), "1, 2, 3", &ctx(&types))),
                   serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn bad_scalars_fail_with_conversion_error() {
        let types = TypeRegistry::new();
        let c = DefaultConverter;
        assert!(c.convert(&TypeRef::Int, "abc", &ctx(&types)).is_err());
    }

    #[test]
    fn any_infers_the_narrowest_shape() {
        let types = TypeRegistry::new();
        let c = DefaultConverter;
        assert_eq!(value(c.convert(&TypeRef::Any, "true", &ctx(&types))), Value::Bool(true));
        assert_eq!(value(c.convert(&TypeRef::Any, "7", &ctx(&types))), Value::from(7));
        assert_eq!(value(c.convert(&TypeRef::Any, "hello", &ctx(&types))), Value::from("hello"));
    }
}
