//! Raíz compilada: el árbol de inyección de un (tipo, locale).

use indexmap::IndexMap;

use crate::model::TypeRef;
use crate::tree::{compile_tree, CompileEnv, InjectionTree, PathLookup};

/// Snapshot inmutable de las definiciones crudas de un (tipo, locale) más su
/// árbol compilado. Es la unidad de cacheo del orquestador: se compila
/// completa y local antes de publicarse, nunca muta después (salvo las
/// celdas de conversión oportunistas de los nodos).
#[derive(Debug)]
pub struct InjectDescriptor {
    type_name: String,
    locale: String,
    raw: IndexMap<String, String>,
    tree: InjectionTree,
}

impl InjectDescriptor {
    /// Compilación one-shot: descompone cada clave cruda en una ruta, asigna
    /// definiciones a las hojas y corre la compilación recursiva del árbol.
    /// Una clave malformada se notifica y se salta individualmente; jamás
    /// aborta la carga completa.
    pub(crate) fn compile(type_name: &str,
                          locale: &str,
                          raw: IndexMap<String, String>,
                          env: &CompileEnv<'_>)
                          -> Self {
        let mut tree = InjectionTree::new();
        let root = tree.root();
        for (key, value) in &raw {
            match tree.get_path(root, key, true) {
                PathLookup::Found(leaf) => tree.node_mut(leaf).definition = Some(value.clone()),
                PathLookup::Malformed(err) => {
                    env.notifier.notify(key, "illegal expression", Some(&err));
                }
                PathLookup::NotFound => {}
            }
        }
        compile_tree(&mut tree, &TypeRef::Object(type_name.to_string()), env);
        Self { type_name: type_name.to_string(),
               locale: locale.to_string(),
               raw,
               tree }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn raw(&self) -> &IndexMap<String, String> {
        &self.raw
    }

    pub fn tree(&self) -> &InjectionTree {
        &self.tree
    }

    /// Raíz centinela no-op: el tipo no tiene claves que le calcen. Se cachea
    /// igual, así los intentos repetidos son O(1) tras el primer miss.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
