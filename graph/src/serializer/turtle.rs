//! Turtle 1.1 serializer for statement sets.
//!
//! Produces a document whose `@prefix` declarations precede every statement.
//! Statements are grouped by subject, `rdf:type` is written as `a`, and every
//! IRI under a bound stem is written as `prefix:local`.

use std::collections::{BTreeMap, BTreeSet};

use crate::iris;
use crate::namespace::{NamespaceRegistry, BRICK, BUILDING, SWITCH};
use crate::term::{Iri, Term, Triple};

/// Prefixes declared even when no statement uses them.
const ALWAYS_DECLARED: [&str; 3] = [BRICK, BUILDING, SWITCH];

/// Serializes `triples` to a Turtle string, abbreviating with the prefixes
/// bound in `namespaces`.
#[must_use]
pub fn to_turtle<'t>(
    triples: impl IntoIterator<Item = &'t Triple>,
    namespaces: &NamespaceRegistry,
) -> String {
    let mut subjects: BTreeMap<&Iri, Vec<(&Iri, &Term)>> = BTreeMap::new();
    for t in triples {
        subjects
            .entry(&t.subject)
            .or_default()
            .push((&t.predicate, &t.object));
    }

    let mut writer = Writer {
        namespaces,
        used: BTreeSet::new(),
    };
    let mut body = String::new();
    for (subject, mut pairs) in subjects {
        pairs.sort_by_key(|(p, _)| p.as_str() != iris::RDF_TYPE);
        body.push_str(&writer.iri(subject));
        for (i, (predicate, object)) in pairs.iter().enumerate() {
            body.push_str(if i == 0 { " " } else { " ;\n    " });
            if predicate.as_str() == iris::RDF_TYPE {
                body.push('a');
            } else {
                body.push_str(&writer.iri(predicate));
            }
            body.push(' ');
            match object {
                Term::Iri(iri) => body.push_str(&writer.iri(iri)),
                Term::Literal(value) => body.push_str(&turtle_string(value)),
            }
        }
        body.push_str(" .\n\n");
    }

    let mut out = String::with_capacity(body.len() + 512);
    for (prefix, stem) in namespaces.prefixes() {
        if writer.used.contains(prefix) || ALWAYS_DECLARED.contains(&prefix) {
            out.push_str(&format!("@prefix {prefix}: <{}> .\n", escape_iri(stem)));
        }
    }
    out.push('\n');
    out.push_str(&body);
    out
}

struct Writer<'n> {
    namespaces: &'n NamespaceRegistry,
    used: BTreeSet<&'n str>,
}

impl<'n> Writer<'n> {
    fn iri(&mut self, iri: &Iri) -> String {
        if let Some((prefix, local)) = self.namespaces.abbreviate(iri.as_str()) {
            if let Some(local) = escape_local(local) {
                self.used.insert(prefix);
                return format!("{prefix}:{local}");
            }
        }
        format!("<{}>", escape_iri(iri.as_str()))
    }
}

/// Escapes a local name for `PN_LOCAL`, or returns `None` if it contains a
/// character that cannot appear in a prefixed name.
fn escape_local(local: &str) -> Option<String> {
    const RESERVED: &str = "_~.-!$&'()*+,;=/?#@%";
    let last = local.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(local.len());
    for (i, c) in local.chars().enumerate() {
        let plain = c.is_ascii_alphanumeric()
            || c == '_'
            || c == ':'
            || is_pn_chars_base(c)
            || (i > 0 && is_pn_chars_extra(c))
            || (c == '-' && i > 0)
            || (c == '.' && i > 0 && i < last);
        if plain {
            out.push(c);
        } else if RESERVED.contains(c) {
            out.push('\\');
            out.push(c);
        } else {
            return None;
        }
    }
    Some(out)
}

/// Non-ASCII `PN_CHARS_BASE` code points.
fn is_pn_chars_base(c: char) -> bool {
    matches!(c,
        '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// Non-ASCII code points `PN_CHARS` allows after the first character.
fn is_pn_chars_extra(c: char) -> bool {
    matches!(c, '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Percent-encodes the characters `IRIREF` forbids.
fn escape_iri(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len());
    for c in iri.chars() {
        if c <= ' ' || "<>\"{}|^`\\".contains(c) {
            out.push_str(&format!("%{:02X}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

fn turtle_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
