//! Resolución incremental de expresiones de ruta.
//!
//! Gramática: `name ( '.' name | '[' index ']' | '(' key ')' )*`
//!
//! - `name` es un identificador (`[A-Za-z_][A-Za-z0-9_]*`) opcionalmente
//!   seguido de marcadores de identidad `{ident}`; los marcadores forman
//!   parte del id (las definiciones de template parametrizadas como
//!   `hello{who}` son segmentos simples ordinarios).
//! - `index` es un entero no negativo; `key` es una cadena arbitraria hasta
//!   el `)` de cierre.
//!
//! El resolver es puro: consume exactamente un segmento y devuelve el resto
//! (quitando un único `.` separador si está presente). Cualquier otra cosa es
//! `InvalidPath` — nunca pánico, nunca excepción como control de flujo.

use std::fmt;

use nom::branch::alt;
use nom::bytes::complete::take_while;
use nom::character::complete::{char, digit1, satisfy};
use nom::combinator::{map, map_res, recognize};
use nom::multi::many0_count;
use nom::sequence::{delimited, pair, tuple};
use nom::IResult;

use crate::errors::InjectError;

/// Las tres clases de acceso a propiedad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Nature {
    Simple,
    Indexed,
    Mapped,
}

impl Nature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Nature::Simple => "simple",
            Nature::Indexed => "indexed",
            Nature::Mapped => "mapped",
        }
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Un segmento resuelto: nombre de propiedad, índice entero o clave de mapa.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Simple(String),
    Indexed(usize),
    Mapped(String),
}

impl Segment {
    pub fn nature(&self) -> Nature {
        match self {
            Segment::Simple(_) => Nature::Simple,
            Segment::Indexed(_) => Nature::Indexed,
            Segment::Mapped(_) => Nature::Mapped,
        }
    }

    /// Token textual equivalente, tal como se anexa a una ruta padre.
    /// `leading` indica que el segmento abre la ruta (sin `.` para simples).
    pub fn token(&self, leading: bool) -> String {
        match self {
            Segment::Simple(name) if leading => name.clone(),
            Segment::Simple(name) => format!(".{name}"),
            Segment::Indexed(idx) => format!("[{idx}]"),
            Segment::Mapped(key) => format!("({key})"),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token(true))
    }
}

fn ident(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
                   take_while(|c: char| c.is_ascii_alphanumeric() || c == '_')))(input)
}

fn identity_marker(input: &str) -> IResult<&str, &str> {
    recognize(tuple((char('{'), ident, char('}'))))(input)
}

fn simple(input: &str) -> IResult<&str, Segment> {
    map(recognize(pair(ident, many0_count(identity_marker))),
        |name: &str| Segment::Simple(name.to_string()))(input)
}

fn indexed(input: &str) -> IResult<&str, Segment> {
    map(map_res(delimited(char('['), digit1, char(']')), |digits: &str| digits.parse::<usize>()),
        Segment::Indexed)(input)
}

fn mapped(input: &str) -> IResult<&str, Segment> {
    map(delimited(char('('), take_while(|c| c != ')'), char(')')),
        |key: &str| Segment::Mapped(key.to_string()))(input)
}

fn segment(input: &str) -> IResult<&str, Segment> {
    alt((simple, indexed, mapped))(input)
}

/// Consume el siguiente segmento de `path` y devuelve `(segmento, resto)`.
///
/// Exactamente una de las tres formas debe calzar en el cursor actual; en
/// caso contrario la ruta es malformada. El separador `.` sólo precede a un
/// segmento simple: un `.` suelto al final, duplicado o seguido de `[`/`(`
/// también es malformado.
pub fn resolve_next(path: &str) -> Result<(Segment, &str), InjectError> {
    let (rest, seg) = segment(path).map_err(|_| InjectError::InvalidPath(path.to_string()))?;
    let rest = match rest.strip_prefix('.') {
        Some(tail) => match tail.chars().next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => tail,
            _ => return Err(InjectError::InvalidPath(path.to_string())),
        },
        None => rest,
    };
    Ok((seg, rest))
}

/// Descompone una ruta completa. Una clave compilada debe nombrar al menos
/// un segmento: la cadena vacía es malformada.
pub fn resolve_all(path: &str) -> Result<Vec<Segment>, InjectError> {
    if path.is_empty() {
        return Err(InjectError::InvalidPath(path.to_string()));
    }
    let mut segments = Vec::new();
    let mut rest = path;
    while !rest.is_empty() {
        let (seg, tail) = resolve_next(rest)?;
        segments.push(seg);
        rest = tail;
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_combined_path() {
        let segs = resolve_all("window.items[2](label).text").expect("valid path");
        assert_eq!(segs,
                   vec![Segment::Simple("window".into()),
                        Segment::Simple("items".into()),
                        Segment::Indexed(2),
                        Segment::Mapped("label".into()),
                        Segment::Simple("text".into())]);
    }

    #[test]
    fn template_identity_markers_are_part_of_the_id() {
        let segs = resolve_all("hello{who}{mood}").expect("valid path");
        assert_eq!(segs, vec![Segment::Simple("hello{who}{mood}".into())]);
    }

    #[test]
    fn mapped_keys_are_arbitrary_strings() {
        let segs = resolve_all("shortcuts(Ctrl+S)").expect("valid path");
        assert_eq!(segs[1], Segment::Mapped("Ctrl+S".into()));
    }

    #[test]
    fn malformed_paths_are_rejected() {
        assert!(resolve_all("").is_err());
        assert!(resolve_all(".leading").is_err());
        assert!(resolve_all("trailing.").is_err());
        assert!(resolve_all("a[x]").is_err());
        assert!(resolve_all("a[1").is_err());
        assert!(resolve_all("9name").is_err());
    }

    #[test]
    fn the_dot_separator_only_precedes_simple_segments() {
        assert!(resolve_all("a.[0]").is_err());
        assert!(resolve_all("a.(k)").is_err());
        assert!(resolve_all("a[0].b").is_ok());
        assert!(resolve_all("a._b").is_ok());
    }

    #[test]
    fn exactly_one_segment_consumed_per_step() {
        let (seg, rest) = resolve_next("list[0].name").expect("valid");
        assert_eq!(seg, Segment::Simple("list".into()));
        assert_eq!(rest, "[0].name");
        let (seg, rest) = resolve_next(rest).expect("valid");
        assert_eq!(seg, Segment::Indexed(0));
        assert_eq!(rest, "name");
    }
}
