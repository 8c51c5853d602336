//! Constantes del motor de inyección.
//!
//! Los tags por defecto son reemplazables vía `Injector` (cada mutación
//! invalida la cache de raíces compiladas, porque los árboles embeben las
//! decisiones tomadas con la configuración anterior).

/// Marcador configurable de clave obsoleta: una definición exactamente igual
/// a este valor hace que la rama completa se descarte durante la compilación,
/// sin notificación.
pub const DEFAULT_DEPRECATED_TAG: &str = "@deprecated";

/// Marcador configurable de nulo explícito: una definición exactamente igual
/// a este valor asigna el centinela nulo sin pasar por el conversor.
pub const DEFAULT_NULL_TAG: &str = "@null";

/// Prefijo literal de una llamada de template. La gramática completa es
/// `%{path {opt=val}* (=default)? }` y debe reproducirse exactamente: una
/// definición que no calza la gramática completa es un literal plano.
pub const TEMPLATE_PREFIX: &str = "%{";

/// Sufijo de cierre de una llamada de template.
pub const TEMPLATE_SUFFIX: char = '}';
