//! Accessor genérico sobre beans dinámicos (`serde_json::Value::Object`).

use serde_json::{Map, Value};

use super::PropertyAccessor;
use crate::errors::InjectError;
use crate::model::{TypeInfo, TypeRef};
use crate::path::Segment;

/// Acceso por reflexión sobre el árbol de valores: las propiedades simples
/// son campos del objeto, las indexadas elementos de un arreglo y las
/// mapeadas entradas de un objeto anidado. Las capacidades leíble/escribible
/// salen del catálogo de tipos; sin catálogo, todo vale (`Any`).
#[derive(Debug, Default)]
pub struct DynBeanAccessor;

impl DynBeanAccessor {
    fn spec_flag(info: Option<&TypeInfo>, prop: &str, readable: bool) -> bool {
        match info {
            None => true,
            Some(info) => match info.property(prop) {
                Some(spec) if readable => spec.readable,
                Some(spec) => spec.writeable,
                None => false,
            },
        }
    }

    fn as_object_mut<'a>(bean: &'a mut Value, prop: &str) -> Result<&'a mut Map<String, Value>, InjectError> {
        if bean.is_null() {
            *bean = Value::Object(Map::new());
        }
        bean.as_object_mut().ok_or_else(|| InjectError::NotWriteable(prop.to_string()))
    }
}

impl PropertyAccessor for DynBeanAccessor {
    fn is_readable(&self, info: Option<&TypeInfo>, prop: &str) -> bool {
        Self::spec_flag(info, prop, true)
    }

    fn is_writeable(&self, info: Option<&TypeInfo>, prop: &str) -> bool {
        Self::spec_flag(info, prop, false)
    }

    fn declared_type(&self, info: Option<&TypeInfo>, prop: &str) -> Option<TypeRef> {
        match info {
            None => Some(TypeRef::Any),
            Some(info) => info.property(prop).map(|spec| spec.type_ref.clone()),
        }
    }

    fn get(&self, bean: &Value, prop: &str) -> Option<Value> {
        bean.as_object().and_then(|map| map.get(prop)).cloned()
    }

    fn get_mut<'a>(&self, bean: &'a mut Value, prop: &str) -> Option<&'a mut Value> {
        bean.as_object_mut().and_then(|map| map.get_mut(prop))
    }

    fn set(&self, bean: &mut Value, prop: &str, value: Value) -> Result<(), InjectError> {
        let map = Self::as_object_mut(bean, prop)?;
        map.insert(prop.to_string(), value);
        Ok(())
    }

    fn get_element(&self, bean: &Value, prop: &str, seg: &Segment) -> Option<Value> {
        let current = bean.as_object()?.get(prop)?;
        match seg {
            Segment::Indexed(idx) => current.as_array()?.get(*idx).cloned(),
            Segment::Mapped(key) => current.as_object()?.get(key).cloned(),
            Segment::Simple(_) => None,
        }
    }

    fn set_element(&self, bean: &mut Value, prop: &str, seg: &Segment, value: Value)
                   -> Result<(), InjectError> {
        let map = Self::as_object_mut(bean, prop)?;
        match seg {
            Segment::Indexed(idx) => {
                let slot = map.entry(prop.to_string()).or_insert_with(|| Value::Array(Vec::new()));
                let arr = slot.as_array_mut().ok_or_else(|| InjectError::UnsupportedNature {
                    path: prop.to_string(),
                    nature: "indexed",
                })?;
                while arr.len() <= *idx {
                    arr.push(Value::Null);
                }
                arr[*idx] = value;
                Ok(())
            }
            Segment::Mapped(key) => {
                let slot = map.entry(prop.to_string()).or_insert_with(|| Value::Object(Map::new()));
                let obj = slot.as_object_mut().ok_or_else(|| InjectError::UnsupportedNature {
                    path: prop.to_string(),
                    nature: "mapped",
                })?;
                obj.insert(key.clone(), value);
                Ok(())
            }
            Segment::Simple(name) => Err(InjectError::UnsupportedNature { path: name.clone(),
                                                                          nature: "simple" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertySpec;
    use serde_json::json;

    #[test]
    fn capabilities_follow_the_catalog() {
        let info = TypeInfo::new("Doc").with_property("title", PropertySpec::new(TypeRef::Str))
                                       .with_property("id", PropertySpec::read_only(TypeRef::Str));
        let acc = DynBeanAccessor;
        assert!(acc.is_readable(Some(&info), "title"));
        assert!(acc.is_writeable(Some(&info), "title"));
        assert!(!acc.is_writeable(Some(&info), "id"));
        assert!(!acc.is_readable(Some(&info), "missing"));
        assert_eq!(acc.declared_type(Some(&info), "missing"), None);
        // sin catálogo, semántica Any
        assert_eq!(acc.declared_type(None, "whatever"), Some(TypeRef::Any));
    }

    #[test]
    fn element_writes_create_containers_on_demand() {
        let acc = DynBeanAccessor;
        let mut bean = json!({});
        acc.set_element(&mut bean, "items", &Segment::Indexed(2), json!("c")).expect("indexed write");
        assert_eq!(bean, json!({"items": [null, null, "c"]}));
        acc.set_element(&mut bean, "keys", &Segment::Mapped("a".into()), json!(1)).expect("mapped write");
        assert_eq!(bean["keys"], json!({"a": 1}));
    }
}
