//! Compilación del árbol: expansión de templates, poda de deprecados,
//! rechazo de natures no soportadas y estabilización del orden de hijos.
//!
//! La compilación es un pase único post-orden. Las anomalías se resuelven
//! localmente (clave o rama ofensora descartada) para que una entrada mala
//! jamás impida compilar el resto de los recursos del tipo.

use crate::accessor::AccessorRegistry;
use crate::errors::InjectError;
use crate::model::{TypeRef, TypeRegistry};
use crate::notify::Notifier;
use crate::path::{Nature, Segment};
use crate::template;
use crate::tree::node::{InjectionNode, InjectionTree, NodeId};

/// Colaboradores y configuración visibles durante la compilación.
pub struct CompileEnv<'a> {
    pub types: &'a TypeRegistry,
    pub accessors: &'a AccessorRegistry,
    pub notifier: &'a dyn Notifier,
    pub deprecated_tag: &'a str,
}

/// Tipado estático de un nodo mientras se compila: el tipo esperado de su
/// valor y qué natures admite en sus hijos.
#[derive(Debug, Clone)]
struct NodeTyping {
    expected: TypeRef,
    indexed_children: bool,
    mapped_children: bool,
    element: TypeRef,
}

impl NodeTyping {
    fn from_type(type_ref: TypeRef) -> Self {
        Self { indexed_children: type_ref.indexed_capable(),
               mapped_children: type_ref.mapped_capable(),
               element: type_ref.element(),
               expected: type_ref }
    }

    fn any() -> Self {
        Self::from_type(TypeRef::Any)
    }
}

/// Compila el árbol completo contra el tipo raíz.
pub fn compile_tree(tree: &mut InjectionTree, root_type: &TypeRef, env: &CompileEnv<'_>) {
    let root = tree.root();
    let typing = NodeTyping::from_type(root_type.clone());
    // la raíz no tiene nature propia: nunca puede rechazarse a sí misma
    let _ = compile_node(tree, root, (true, true), typing, env);
}

/// Compila un nodo. `Err` es el nodo rechazándose a sí mismo (su nature
/// exige semántica de colección que el tipo dueño no soporta); el rechazo
/// burbujea exactamente un nivel: el padre descarta el subárbol completo y
/// lo notifica con la ruta canónica del hijo.
fn compile_node(tree: &mut InjectionTree,
                id: NodeId,
                owner_allows: (bool, bool),
                typing: NodeTyping,
                env: &CompileEnv<'_>)
                -> Result<(), InjectError> {
    match tree.node(id).nature() {
        Some(Nature::Indexed) if !owner_allows.0 => {
            return Err(InjectError::UnsupportedNature { path: tree.path_of(id), nature: "indexed" });
        }
        Some(Nature::Mapped) if !owner_allows.1 => {
            return Err(InjectError::UnsupportedNature { path: tree.path_of(id), nature: "mapped" });
        }
        _ => {}
    }

    // 1. expansión de template sobre la definición propia: puede anexar
    //    hijos nuevos que el lazo de abajo compila junto a los originales
    if tree.node(id).definition.is_some() {
        template::expand(tree, id, env);
    }

    let mut size: Option<usize> = None;
    let mut shared: Option<Nature> = None;
    let mut divergent = false;

    for child in tree.children(id).to_vec() {
        let Some(seg) = tree.node(child).segment().cloned() else {
            continue;
        };

        // 2. poda inmediata de deprecados: sin recursión y sin notificación
        if tree.node(child).definition.as_deref() == Some(env.deprecated_tag) {
            tree.detach_child(id, child);
            continue;
        }

        let allows = (typing.indexed_children, typing.mapped_children);
        if let Err(reason) = compile_node(tree, child, allows, child_typing(env, &typing, &seg), env) {
            env.notifier.notify(&tree.path_of(child), "subtree rejected", Some(&reason));
            tree.detach_child(id, child);
            continue;
        }

        // 3. tamaño implícito de la colección indexada
        if let Segment::Indexed(idx) = seg {
            size = Some(size.unwrap_or(0).max(idx + 1));
        }

        // 4. homogeneidad de nature: si divergen, degrada a Simple (no se
        //    puede inferir una colección homogénea implícita)
        match shared {
            None => shared = Some(seg.nature()),
            Some(nature) if nature != seg.nature() => divergent = true,
            Some(_) => {}
        }
    }

    // 5. orden estable por (nature, id): los indexados ascienden por índice
    //    numérico y los mapeados por clave, de modo que la inserción por
    //    orden de índice sea determinista sin importar el orden de origen
    let mut children = tree.children(id).to_vec();
    children.sort_by(|a, b| sort_key(tree.node(*a)).cmp(&sort_key(tree.node(*b))));

    let node = tree.node_mut(id);
    node.children = children;
    node.size = size;
    node.children_nature = match (node.children.is_empty(), divergent) {
        (true, _) => None,
        (false, true) => Some(Nature::Simple),
        (false, false) => shared,
    };
    Ok(())
}

fn sort_key(node: &InjectionNode) -> (u8, usize, String) {
    match node.segment() {
        Some(Segment::Simple(_)) | None => (0, 0, String::new()),
        Some(Segment::Indexed(idx)) => (1, *idx, String::new()),
        Some(Segment::Mapped(key)) => (2, 0, key.clone()),
    }
}

/// Tipado de un hijo a partir del tipado del padre y el segmento del hijo.
fn child_typing(env: &CompileEnv<'_>, parent: &NodeTyping, seg: &Segment) -> NodeTyping {
    match seg {
        Segment::Simple(name) => {
            match env.accessors.property_ctx(env.types, &parent.expected, name) {
                Some(pctx) => {
                    let pseudo = pctx.collection
                                 && !(pctx.declared.indexed_capable() || pctx.declared.mapped_capable());
                    NodeTyping { indexed_children: pctx.declared.indexed_capable() || pseudo,
                                 mapped_children: pctx.declared.mapped_capable() || pseudo,
                                 element: pctx.element.clone(),
                                 expected: pctx.declared }
                }
                // propiedad desconocida en compilación: el recorrido decide
                None => NodeTyping::any(),
            }
        }
        Segment::Indexed(_) | Segment::Mapped(_) => NodeTyping::from_type(parent.element.clone()),
    }
}
