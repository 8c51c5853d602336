//! Árbol de inyección compilado.
//!
//! Un árbol por raíz compilada (`InjectDescriptor`). Los nodos viven en una
//! arena (`Vec<InjectionNode>` indexada por `NodeId`) con enlaces al padre,
//! de modo que el chequeo de ciclos de templates y el merge de subárboles no
//! necesiten referencias circulares.

pub mod compile;
pub mod node;

pub use compile::{compile_tree, CompileEnv};
pub use node::{InjectionNode, InjectionTree, NodeId, PathLookup};
