//! Motor de templates.
//!
//! Una definición de la forma `%{name{opt1=val1}{opt2=val2}=default}` denota
//! «sustituye aquí la definición compilada en `name`, con estas opciones».
//! La identidad buscada es `name` con un marcador `{opt}` por opción
//! declarada, de modo que dos llamadas al mismo path base con distintos
//! juegos de opciones compilan contra nodos template distintos y no
//! colisionan.
//!
//! Una definición que no calza la gramática completa es un literal plano, no
//! un error; la única malformación dura es una opción duplicada dentro de la
//! misma llamada, que rechaza la llamada entera (decisión heredada: rechazo
//! eager, no last-wins).

use crate::constants::{TEMPLATE_PREFIX, TEMPLATE_SUFFIX};
use crate::errors::InjectError;
use crate::path;
use crate::tree::compile::CompileEnv;
use crate::tree::{InjectionTree, NodeId, PathLookup};

/// Representación efímera de una llamada de template; sólo existe durante la
/// compilación, nunca se persiste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCall {
    pub name: String,
    pub options: Vec<(String, String)>,
    pub default: Option<String>,
}

impl TemplateCall {
    /// Path de búsqueda: el nombre base más un marcador por opción, en orden
    /// de declaración.
    pub fn identity(&self) -> String {
        let mut identity = self.name.clone();
        for (option, _) in &self.options {
            identity.push('{');
            identity.push_str(option);
            identity.push('}');
        }
        identity
    }
}

#[derive(Debug)]
pub enum TemplateParse {
    Call(TemplateCall),
    /// La definición es un literal plano.
    NotTemplate,
    Malformed(InjectError),
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Analiza una definición como posible llamada de template.
pub fn parse(definition: &str) -> TemplateParse {
    let Some(stripped) = definition.strip_prefix(TEMPLATE_PREFIX) else {
        return TemplateParse::NotTemplate;
    };
    let Some(inner) = stripped.strip_suffix(TEMPLATE_SUFFIX) else {
        return TemplateParse::NotTemplate;
    };

    let name_end = inner.find(|c| c == '{' || c == '=').unwrap_or(inner.len());
    let name = &inner[..name_end];
    // el nombre debe ser una expresión de ruta válida; si no lo es, la
    // definición entera es un literal plano
    if name.is_empty() || path::resolve_all(name).is_err() {
        return TemplateParse::NotTemplate;
    }

    let mut options: Vec<(String, String)> = Vec::new();
    let mut rest = &inner[name_end..];
    while let Some(tail) = rest.strip_prefix('{') {
        let Some(close) = tail.find('}') else {
            return TemplateParse::NotTemplate;
        };
        let pair = &tail[..close];
        let Some((option, value)) = pair.split_once('=') else {
            return TemplateParse::NotTemplate;
        };
        if !is_ident(option) {
            return TemplateParse::NotTemplate;
        }
        if options.iter().any(|(existing, _)| existing == option) {
            return TemplateParse::Malformed(InjectError::MalformedTemplate(format!(
                "duplicate option '{option}' in call to '{name}'"
            )));
        }
        options.push((option.to_string(), value.to_string()));
        rest = &tail[close + 1..];
    }

    let default = match rest.strip_prefix('=') {
        Some(default) => Some(default.to_string()),
        None if rest.is_empty() => None,
        // sobra texto que la gramática no reconoce: literal plano
        None => return TemplateParse::NotTemplate,
    };

    TemplateParse::Call(TemplateCall { name: name.to_string(), options, default })
}

/// Reemplaza cada ocurrencia literal de `{opción}` por su valor.
pub fn substitute(definition: &str, options: &[(String, String)]) -> String {
    let mut out = definition.to_string();
    for (option, value) in options {
        out = out.replace(&format!("{{{option}}}"), value);
    }
    out
}

/// Expande transitivamente la definición del nodo referenciante.
///
/// Los fallos (template indefinido, recursivo, llamada malformada) se
/// notifican y dejan la definición sin expandir: más tarde se convierte como
/// literal plano o falla la conversión, pero la compilación sigue.
pub fn expand(tree: &mut InjectionTree, node: NodeId, env: &CompileEnv<'_>) {
    loop {
        let Some(definition) = tree.node(node).definition.clone() else {
            return;
        };
        let call = match parse(&definition) {
            TemplateParse::NotTemplate => return,
            TemplateParse::Malformed(err) => {
                env.notifier.notify(&tree.path_of(node), "malformed template call", Some(&err));
                return;
            }
            TemplateParse::Call(call) => call,
        };

        let identity = call.identity();
        let target = match tree.find_path(tree.root(), &identity) {
            PathLookup::Found(target) => target,
            PathLookup::NotFound => {
                env.notifier.notify(&tree.path_of(node),
                                    "undefined template",
                                    Some(&InjectError::UndefinedTemplate(identity)));
                return;
            }
            PathLookup::Malformed(err) => {
                env.notifier.notify(&tree.path_of(node), "malformed template path", Some(&err));
                return;
            }
        };

        if is_recursive(tree, node, target) {
            env.notifier.notify(&tree.path_of(node),
                                "recursive template",
                                Some(&InjectError::RecursiveTemplate(identity)));
            return;
        }

        // el `=valor` del sitio es explícito y gana; sin él, la definición
        // propia del template (sustituida) reemplaza la llamada
        let inherited = tree.node(target)
                            .definition
                            .as_deref()
                            .map(|def| substitute(def, &call.options));
        tree.node_mut(node).definition = call.default.clone().or(inherited);
        tree.node_mut(node).template_origins.push(target);
        merge(tree, node, target, &call.options);
        // la nueva definición puede ser a su vez una llamada: repetir; el
        // chequeo de ciclos acota la transitividad
    }
}

/// Ciclo: el template resuelto es el propio nodo, un ancestro, o ya fue
/// mergeado en el nodo o en algún ancestro (las copias de un template
/// autorreferente contarían como nodos nuevos y regresarían sin fondo).
fn is_recursive(tree: &InjectionTree, node: NodeId, target: NodeId) -> bool {
    if target == node || tree.is_ancestor(target, node) {
        return true;
    }
    let mut current = Some(node);
    while let Some(id) = current {
        if tree.node(id).template_origins.contains(&target) {
            return true;
        }
        current = tree.node(id).parent;
    }
    false
}

/// Merge recursivo del subárbol template bajo el nodo referenciante. Una
/// definición explícita en el sitio de la referencia siempre gana sobre el
/// valor aportado por el template; la sustitución de opciones se aplica de
/// arriba hacia abajo para que los templates anidados también reciban las
/// sustituciones externas.
fn merge(tree: &mut InjectionTree, into: NodeId, from: NodeId, options: &[(String, String)]) {
    for child in tree.children(from).to_vec() {
        let Some(seg) = tree.node(child).segment().cloned() else {
            continue;
        };
        let token = seg.token(true);
        let target = match tree.get_path(into, &token, true) {
            PathLookup::Found(target) => target,
            // los tokens provienen de segmentos ya compilados: siempre parsean
            _ => continue,
        };
        if tree.node(target).definition.is_none() {
            if let Some(def) = tree.node(child).definition.clone() {
                tree.node_mut(target).definition = Some(substitute(&def, options));
            }
        }
        merge(tree, target, child, options);
    }
}
