//! Recorrido de inyección: aplica un árbol compilado sobre un bean vivo.
//!
//! El recorrido es pre-orden sobre los hijos del nodo actual. Toda anomalía
//! recuperable (propiedad desconocida, conversión fallida, destino no
//! escribible, nature no soportada por el valor concreto) se notifica y
//! detiene únicamente el subárbol afectado; sólo un error fatal aborta el
//! pase completo y viaja como `Err` hasta el llamador.

use serde_json::{Map, Value};

use crate::accessor::{PropertyAccessor, PropertyContext};
use crate::convert::{Converted, ConvertCtx, Converter};
use crate::engine::context::InjectionContext;
use crate::errors::InjectError;
use crate::model::{TypeRef, TypeRegistry};
use crate::path::{Nature, Segment};
use crate::tree::{InjectionTree, NodeId};

impl<'a> InjectionContext<'a> {
    /// Aplica todos los hijos de `node` sobre `value`, en orden de árbol o
    /// en el orden explícito del catálogo si el tipo lo declara, y dispara
    /// el callback de post-inyección del tipo al terminar.
    pub(crate) fn inject_children(&self,
                                  node: NodeId,
                                  value: &mut Value,
                                  value_type: &TypeRef)
                                  -> Result<(), InjectError> {
        let tree = self.descriptor.tree();
        for child in ordered_children(tree, node, self.injector.types(), value_type) {
            self.branch(child, value_type.clone()).apply(value)?;
        }
        if let TypeRef::Object(name) = value_type {
            if let Some(callback) = self.injector.post_inject_of(name) {
                callback.after_inject(value, &self.branch(node, value_type.clone()));
            }
        }
        Ok(())
    }

    /// Aplica el nodo de este frame sobre su valor dueño.
    fn apply(&self, owner: &mut Value) -> Result<(), InjectError> {
        let seg = self.descriptor.tree().node(self.node).segment().cloned();
        match seg {
            Some(Segment::Simple(name)) => self.apply_simple(owner, &name),
            Some(seg) => self.apply_element(owner, &seg),
            None => Ok(()),
        }
    }

    /// Despacho de una propiedad nombrada del bean dueño.
    fn apply_simple(&self, bean: &mut Value, name: &str) -> Result<(), InjectError> {
        let tree = self.descriptor.tree();
        let id = self.node;
        let Some(pctx) = self.injector
                             .accessors()
                             .property_ctx(self.injector.types(), &self.expected, name)
        else {
            // heurística de atributo plausible: un id con pinta de constante
            // (mayúscula inicial) es con toda probabilidad una clave auxiliar
            // del recurso, no una propiedad mal escrita; no vale un reporte
            if plausible_attribute(name) {
                self.report(&tree.path_of(id),
                            "undefined property",
                            &InjectError::UndefinedProperty(name.to_string()));
            }
            return Ok(());
        };
        let accessor = self.injector.accessors().accessor_for(&self.expected);

        if tree.node(id).definition.is_some() {
            let Some(value) = self.convert_definition(id, &pctx.declared)? else {
                // fallo ya notificado; los hijos tampoco se visitan
                return Ok(());
            };
            if !pctx.writeable {
                self.report(&tree.path_of(id),
                            "target not writeable",
                            &InjectError::NotWriteable(name.to_string()));
                return Ok(());
            }
            self.write(accessor.as_ref(), bean, name, value)?;
            if tree.node(id).has_children() {
                // «asigna este valor y luego inyecta estas sub-rutas en él»
                return self.descend_into(bean, name, &pctx, accessor.as_ref());
            }
            return Ok(());
        }

        if !tree.node(id).has_children() {
            return Ok(());
        }
        if pctx.readable {
            return self.descend_into(bean, name, &pctx, accessor.as_ref());
        }
        if pctx.keyed_writes {
            return self.keyed_write_bypass(bean, name, &pctx, accessor.as_ref());
        }
        self.report(&tree.path_of(id),
                    "target not readable",
                    &InjectError::NotReadable(name.to_string()));
        Ok(())
    }

    /// Desciende en el valor de la propiedad para aplicar los hijos del nodo,
    /// materializando la instancia por defecto si el valor actual es nulo.
    /// Prefiere la mutación en sitio; si el accessor no la ofrece (propiedades
    /// computadas) cae al par lectura-copia / escritura de vuelta.
    fn descend_into(&self,
                    bean: &mut Value,
                    name: &str,
                    pctx: &PropertyContext,
                    accessor: &dyn PropertyAccessor)
                    -> Result<(), InjectError> {
        let tree = self.descriptor.tree();
        let id = self.node;
        if !tree.node(id).has_children() {
            return Ok(());
        }

        if let Some(slot) = accessor.get_mut(bean, name) {
            if slot.is_null() {
                if !pctx.writeable {
                    self.report(&tree.path_of(id),
                                "target not writeable",
                                &InjectError::NotWriteable(name.to_string()));
                    return Ok(());
                }
                *slot = self.instantiate_default(id, &pctx.declared)?;
                if slot.is_null() {
                    return Ok(());
                }
            }
            return self.inject_children(id, slot, &pctx.declared);
        }

        let mut current = accessor.get(bean, name).unwrap_or(Value::Null);
        if current.is_null() {
            if !pctx.writeable {
                self.report(&tree.path_of(id),
                            "target not writeable",
                            &InjectError::NotWriteable(name.to_string()));
                return Ok(());
            }
            current = self.instantiate_default(id, &pctx.declared)?;
            if current.is_null() {
                return Ok(());
            }
        }
        self.inject_children(id, &mut current, &pctx.declared)?;
        if pctx.writeable {
            self.write(accessor, bean, name, current)?;
        } else {
            self.report(&tree.path_of(id),
                        "target not writeable",
                        &InjectError::NotWriteable(name.to_string()));
        }
        Ok(())
    }

    /// Bypass sólo-setter: la propiedad no es legible pero su accessor admite
    /// escrituras directas por clave/índice. Cada hijo indexado/mapeado con
    /// definición se convierte y se escribe elemento a elemento; los hijos
    /// simples se saltan (sin superficie de lectura no hay dónde anidarlos).
    fn keyed_write_bypass(&self,
                          bean: &mut Value,
                          name: &str,
                          pctx: &PropertyContext,
                          accessor: &dyn PropertyAccessor)
                          -> Result<(), InjectError> {
        let tree = self.descriptor.tree();
        for child in tree.children(self.node).to_vec() {
            let node = tree.node(child);
            let Some(seg) = node.segment().cloned() else {
                continue;
            };
            if matches!(seg, Segment::Simple(_)) || node.definition.is_none() {
                continue;
            }
            let Some(value) = self.convert_definition(child, &pctx.element)? else {
                continue;
            };
            match accessor.set_element(bean, name, &seg, value) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => self.report(&tree.path_of(child), "element write failed", &e),
            }
        }
        Ok(())
    }

    /// Despacho de un elemento indexado o mapeado del valor dueño, que en
    /// este punto es la colección misma (un array o un objeto).
    fn apply_element(&self, owner: &mut Value, seg: &Segment) -> Result<(), InjectError> {
        let tree = self.descriptor.tree();
        let id = self.node;
        let node = tree.node(id);
        if node.definition.is_none() && !node.has_children() {
            return Ok(());
        }
        let elem_type = self.expected.element();

        match seg {
            Segment::Indexed(idx) => {
                let Some(items) = owner.as_array_mut() else {
                    self.report(&tree.path_of(id),
                                "unsupported access",
                                &InjectError::UnsupportedNature { path: tree.path_of(id),
                                                                 nature: "indexed" });
                    return Ok(());
                };
                // crecimiento implícito hasta cubrir el índice
                while items.len() <= *idx {
                    items.push(Value::Null);
                }
                self.apply_into_slot(&mut items[*idx], &elem_type)
            }
            Segment::Mapped(key) => {
                let Some(entries) = owner.as_object_mut() else {
                    self.report(&tree.path_of(id),
                                "unsupported access",
                                &InjectError::UnsupportedNature { path: tree.path_of(id),
                                                                 nature: "mapped" });
                    return Ok(());
                };
                let slot = entries.entry(key.clone()).or_insert(Value::Null);
                self.apply_into_slot(slot, &elem_type)
            }
            // los segmentos simples no llegan aquí
            Segment::Simple(_) => Ok(()),
        }
    }

    /// Parte común de los elementos: asignación del literal convertido y
    /// descenso recursivo en el slot.
    fn apply_into_slot(&self, slot: &mut Value, elem_type: &TypeRef) -> Result<(), InjectError> {
        let tree = self.descriptor.tree();
        let id = self.node;
        if tree.node(id).definition.is_some() {
            match self.convert_definition(id, elem_type)? {
                Some(value) => *slot = value,
                None => return Ok(()),
            }
        }
        if tree.node(id).has_children() {
            if slot.is_null() {
                *slot = self.instantiate_default(id, elem_type)?;
                if slot.is_null() {
                    return Ok(());
                }
            }
            return self.inject_children(id, slot, elem_type);
        }
        Ok(())
    }

    /// Convierte la definición del nodo contra el tipo declarado, pasando por
    /// la celda de cache del nodo y la cadena de conversores.
    ///
    /// `Ok(None)` es un fallo recuperable ya notificado: el llamador no debe
    /// escribir nada ni descender. El tag de nulo explícito cortocircuita la
    /// cadena entera; un literal no vacío que convierta a nulo viola el
    /// contrato del conversor y se notifica, mientras que un literal vacío
    /// convertido a nulo es ausencia explícita y pasa en silencio.
    pub(crate) fn convert_definition(&self,
                                     id: NodeId,
                                     declared: &TypeRef)
                                     -> Result<Option<Value>, InjectError> {
        let tree = self.descriptor.tree();
        let node = tree.node(id);
        let Some(definition) = node.definition.clone() else {
            return Ok(None);
        };
        if definition == self.injector.null_tag() {
            // nulo explícito: jamás llega al conversor
            return Ok(Some(Value::Null));
        }
        if let Some(cached) = node.with_cache(|cell| cell.get()) {
            return Ok(Some(cached));
        }

        let location = tree.path_of(id);
        let (value, volatile) = match self.run_converters(declared, &definition, &location) {
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                self.report(&location, "conversion failed", &e);
                return Ok(None);
            }
            Ok(Converted::Value(value)) => (value, None),
            Ok(Converted::Deferred(arc)) => ((*arc).clone(), Some(arc)),
            Ok(Converted::Unhandled) => {
                self.report(&location,
                            "conversion failed",
                            &InjectError::Conversion { literal: definition.clone(),
                                                       reason: "no converter accepted the literal"
                                                               .into() });
                return Ok(None);
            }
        };

        if value.is_null() && !definition.is_empty() {
            // la violación de contrato no se cachea: cada pase la reporta
            self.report(&location, "null from conversion", &InjectError::NullConversion(definition));
            return Ok(None);
        }
        match volatile {
            Some(arc) => node.with_cache(|cell| cell.store_volatile(&arc)),
            None => node.with_cache(|cell| cell.store(value.clone())),
        }
        Ok(Some(value))
    }

    /// Cadena de conversión: extensiones en orden de registro y el conversor
    /// por defecto como último eslabón.
    fn run_converters(&self,
                      declared: &TypeRef,
                      literal: &str,
                      location: &str)
                      -> Result<Converted, InjectError> {
        let ctx = ConvertCtx { location, types: self.injector.types() };
        for converter in self.injector.converters() {
            match converter.convert(declared, literal, &ctx)? {
                Converted::Unhandled => continue,
                handled => return Ok(handled),
            }
        }
        self.injector.default_converter().convert(declared, literal, &ctx)
    }

    /// Instancia por defecto para un valor ausente que debe recibir hijos:
    /// primero el placeholder vacío vía conversores; si nadie produce una
    /// instancia, el contenedor se infiere de la nature compilada de los
    /// hijos (array dimensionado al tamaño implícito, u objeto).
    fn instantiate_default(&self, id: NodeId, declared: &TypeRef) -> Result<Value, InjectError> {
        let tree = self.descriptor.tree();
        let location = tree.path_of(id);
        match self.run_converters(declared, "", &location) {
            Err(e) if e.is_fatal() => return Err(e),
            Err(_) | Ok(Converted::Unhandled) => {}
            Ok(Converted::Value(value)) if !value.is_null() => return Ok(value),
            Ok(Converted::Deferred(arc)) if !arc.is_null() => return Ok((*arc).clone()),
            Ok(_) => {}
        }
        let node = tree.node(id);
        Ok(match node.children_nature {
            Some(Nature::Indexed) => Value::Array(vec![Value::Null; node.size.unwrap_or(0)]),
            Some(Nature::Mapped) => Value::Object(Map::new()),
            _ => match declared {
                TypeRef::Bool | TypeRef::Int | TypeRef::Float | TypeRef::Str => Value::Null,
                _ => Value::Object(Map::new()),
            },
        })
    }

    /// Escritura con la disciplina estándar de errores: lo fatal se relanza,
    /// lo recuperable se notifica y se sigue.
    fn write(&self,
             accessor: &dyn PropertyAccessor,
             bean: &mut Value,
             name: &str,
             value: Value)
             -> Result<(), InjectError> {
        match accessor.set(bean, name, value) {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                self.report(&self.descriptor.tree().path_of(self.node), "write failed", &e);
                Ok(())
            }
        }
    }

    fn report(&self, location: &str, detail: &str, cause: &InjectError) {
        self.injector.notifier().notify(location, detail, Some(cause));
    }
}

/// Hijos del nodo en orden de aplicación: los nombrados en el `inject_order`
/// del catálogo primero, en el orden declarado, y el resto en orden de árbol.
fn ordered_children(tree: &InjectionTree,
                    node: NodeId,
                    types: &TypeRegistry,
                    value_type: &TypeRef)
                    -> Vec<NodeId> {
    let children = tree.children(node).to_vec();
    let Some(info) = types.info_of(value_type).filter(|info| !info.inject_order.is_empty()) else {
        return children;
    };
    let mut ordered = Vec::with_capacity(children.len());
    let mut rest = children;
    for name in &info.inject_order {
        let position = rest.iter().position(|child| {
                           matches!(tree.node(*child).segment(),
                                    Some(Segment::Simple(prop)) if prop == name)
                       });
        if let Some(position) = position {
            ordered.push(rest.remove(position));
        }
    }
    ordered.extend(rest);
    ordered
}

/// ¿El identificador tiene pinta de atributo de bean? Por convención los
/// atributos arrancan en minúscula o guión bajo; los ids constante-like y
/// los que cargan marcadores `{opt}` (claves de template parametrizadas) son
/// claves auxiliares del recurso y no ameritan reporte de propiedad
/// desconocida.
fn plausible_attribute(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
