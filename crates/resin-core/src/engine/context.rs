//! Contexto de inyección: el estado vivo de un recorrido.

use crate::engine::core::Injector;
use crate::engine::descriptor::InjectDescriptor;
use crate::model::TypeRef;
use crate::tree::NodeId;
use serde_json::Value;

/// Frame del recorrido de inyección: a qué nodo del árbol compilado va el
/// pase y qué tipo se espera del valor dueño sobre el que se aplica.
///
/// Clonar un contexto produce una rama independiente que comparte el
/// orquestador y la raíz compilada pero puede avanzar su propio triple
/// (nodo, tipo esperado) sin perturbar al llamador; es lo que recibe el
/// callback de post-inyección para pedir inyecciones anidadas.
#[derive(Clone)]
pub struct InjectionContext<'a> {
    pub(crate) injector: &'a Injector,
    pub(crate) descriptor: &'a InjectDescriptor,
    pub(crate) node: NodeId,
    pub(crate) expected: TypeRef,
}

impl<'a> InjectionContext<'a> {
    pub fn injector(&self) -> &Injector {
        self.injector
    }

    pub fn descriptor(&self) -> &InjectDescriptor {
        self.descriptor
    }

    /// Nodo del árbol compilado que este frame está aplicando.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Tipo esperado del valor dueño.
    pub fn expected(&self) -> &TypeRef {
        &self.expected
    }

    pub(crate) fn branch(&self, node: NodeId, expected: TypeRef) -> Self {
        Self { injector: self.injector,
               descriptor: self.descriptor,
               node,
               expected }
    }
}

/// Protocolo de inicialización secundaria: se invoca una vez por bean tras
/// aplicar todos sus hijos, con un contexto clonado desde el que se pueden
/// pedir inyecciones anidadas.
pub trait PostInject: Send + Sync {
    fn after_inject(&self, bean: &mut Value, ctx: &InjectionContext<'_>);
}
