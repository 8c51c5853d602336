//! Nodos y arena del árbol de inyección.

use std::sync::Mutex;

use crate::errors::InjectError;
use crate::model::CacheCell;
use crate::path::{resolve_next, Nature, Segment};

/// Índice de un nodo dentro de la arena de su árbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Resultado discriminado de una búsqueda de ruta. «No encontrado» y
/// «malformado» son datos, no errores: sólo lo irrecuperable viaja como
/// `Err` en este motor.
#[derive(Debug)]
pub enum PathLookup {
    Found(NodeId),
    NotFound,
    Malformed(InjectError),
}

/// Un nodo por segmento de ruta resuelto.
///
/// Un nodo con `definition` es una asignación de valor hoja; puede además
/// tener hijos («asigna este valor y luego inyecta estas sub-rutas en él»).
/// Tras la compilación sólo muta la celda `cache`.
#[derive(Debug)]
pub struct InjectionNode {
    pub(crate) parent: Option<NodeId>,
    /// `None` únicamente para la raíz, que no tiene nature ni id propios.
    pub(crate) seg: Option<Segment>,
    pub definition: Option<String>,
    pub(crate) children: Vec<NodeId>,
    /// Nature común de los hijos; degrada a `Simple` si divergen.
    pub children_nature: Option<Nature>,
    /// `max(id) + 1` de los hijos indexados; sólo definido si hay alguno.
    pub size: Option<usize>,
    /// Nodos template ya mergeados aquí. El chequeo de ciclos los considera
    /// junto a la cadena de ancestros: sin esto, una copia de un template
    /// autorreferente se re-expandiría sin fondo bajo cada copia.
    pub(crate) template_origins: Vec<NodeId>,
    pub(crate) cache: Mutex<CacheCell>,
}

impl InjectionNode {
    fn new(parent: Option<NodeId>, seg: Option<Segment>) -> Self {
        Self { parent,
               seg,
               definition: None,
               children: Vec::new(),
               children_nature: None,
               size: None,
               template_origins: Vec::new(),
               cache: Mutex::new(CacheCell::Empty) }
    }

    pub fn segment(&self) -> Option<&Segment> {
        self.seg.as_ref()
    }

    pub fn nature(&self) -> Option<Nature> {
        self.seg.as_ref().map(Segment::nature)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Acceso a la celda de conversión; tolera un lock envenenado porque la
    /// celda es puramente oportunista.
    pub(crate) fn with_cache<R>(&self, f: impl FnOnce(&mut CacheCell) -> R) -> R {
        let mut guard = self.cache.lock().unwrap_or_else(|poison| poison.into_inner());
        f(&mut guard)
    }
}

/// Arena de nodos; la raíz es siempre `NodeId(0)`.
#[derive(Debug)]
pub struct InjectionTree {
    nodes: Vec<InjectionNode>,
}

impl Default for InjectionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectionTree {
    pub fn new() -> Self {
        Self { nodes: vec![InjectionNode::new(None, None)] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &InjectionNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut InjectionNode {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// ¿Está el árbol vacío (raíz sin hijos)?
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    fn child_by_seg(&self, id: NodeId, seg: &Segment) -> Option<NodeId> {
        self.nodes[id.0].children
                        .iter()
                        .copied()
                        .find(|c| self.nodes[c.0].seg.as_ref() == Some(seg))
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, seg: Segment) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(InjectionNode::new(Some(parent), Some(seg)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Camina `path` desde `from` devolviendo el nodo de su descomposición
    /// completa. Con `create` los intermedios ausentes se sintetizan y se
    /// anexan a los hijos del padre; sin `create` la ausencia es `NotFound`
    /// (nunca lanza). La entrada malformada aborta sólo esa clave.
    pub fn get_path(&mut self, from: NodeId, path: &str, create: bool) -> PathLookup {
        if path.is_empty() {
            return PathLookup::Malformed(InjectError::InvalidPath(path.to_string()));
        }
        let mut current = from;
        let mut rest = path;
        while !rest.is_empty() {
            let (seg, tail) = match resolve_next(rest) {
                Ok(step) => step,
                Err(e) => return PathLookup::Malformed(e),
            };
            current = match self.child_by_seg(current, &seg) {
                Some(child) => child,
                None if create => self.add_child(current, seg),
                None => return PathLookup::NotFound,
            };
            rest = tail;
        }
        PathLookup::Found(current)
    }

    /// Variante inmutable de [`get_path`](Self::get_path) con `create=false`.
    pub fn find_path(&self, from: NodeId, path: &str) -> PathLookup {
        if path.is_empty() {
            return PathLookup::Malformed(InjectError::InvalidPath(path.to_string()));
        }
        let mut current = from;
        let mut rest = path;
        while !rest.is_empty() {
            let (seg, tail) = match resolve_next(rest) {
                Ok(step) => step,
                Err(e) => return PathLookup::Malformed(e),
            };
            current = match self.child_by_seg(current, &seg) {
                Some(child) => child,
                None => return PathLookup::NotFound,
            };
            rest = tail;
        }
        PathLookup::Found(current)
    }

    /// Ruta canónica del nodo reconstruida desde su cadena `(nature, id)`.
    /// Invariante: `find_path(root, path_of(n))` vuelve a resolver `n`.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if let Some(seg) = &node.seg {
                segments.push(seg.clone());
            }
            current = node.parent;
        }
        segments.reverse();
        let mut path = String::new();
        for (i, seg) in segments.iter().enumerate() {
            path.push_str(&seg.token(i == 0));
        }
        path
    }

    /// ¿Es `ancestor` un ancestro estricto de `node`?
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes[node.0].parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    /// Quita `child` de la lista de hijos de `parent`. El nodo queda huérfano
    /// en la arena; los ids nunca se reciclan dentro de un árbol.
    pub(crate) fn detach_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.retain(|c| *c != child);
    }
}
