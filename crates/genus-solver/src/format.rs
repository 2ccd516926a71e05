//! Human-readable rendering of type terms for diagnostics.
//!
//! Rendering is cycle-safe: a captured type-variable's bounds are expanded
//! once per rendering, with repeat occurrences shortened to the capture's
//! name, so self-referential captures (`CAP#1 of ? extends Comparable<CAP#1>`)
//! terminate and are stable across calls.

use crate::db::QueryDatabase;
use crate::types::{CaptureId, TypeId, TypeKey};
use genus_common::limits::MAX_DISPLAY_DEPTH;
use rustc_hash::FxHashSet;

/// Formats interned types back into source-like syntax.
pub struct TypeFormatter<'a> {
    db: &'a dyn QueryDatabase,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn QueryDatabase) -> Self {
        TypeFormatter { db }
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        let mut expanded = FxHashSet::default();
        self.render(ty, &mut out, &mut expanded, 0);
        out
    }

    fn render(
        &self,
        ty: TypeId,
        out: &mut String,
        expanded: &mut FxHashSet<CaptureId>,
        depth: usize,
    ) {
        if depth > MAX_DISPLAY_DEPTH {
            out.push_str("...");
            return;
        }

        let Some(key) = self.db.lookup(ty) else {
            out.push_str("<unknown>");
            return;
        };

        match key {
            TypeKey::Intrinsic(kind) => out.push_str(kind.name()),
            TypeKey::Infer(var) => {
                out.push('α');
                out.push_str(&var.0.to_string());
            }
            TypeKey::Param(p) => {
                let name = self
                    .db
                    .type_param(p)
                    .map(|info| self.db.resolve_atom(info.name))
                    .unwrap_or_else(|| "<param>".to_string());
                out.push_str(&name);
            }
            TypeKey::Class(def, args) => {
                let name = self
                    .db
                    .def_name(def)
                    .map(|atom| self.db.resolve_atom(atom))
                    .unwrap_or_else(|| "<class>".to_string());
                out.push_str(&name);
                let list = self.db.type_list(args);
                if !list.is_empty() {
                    out.push('<');
                    for (i, &arg) in list.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.render(arg, out, expanded, depth + 1);
                    }
                    out.push('>');
                }
            }
            TypeKey::Array(component) => {
                self.render(component, out, expanded, depth + 1);
                out.push_str("[]");
            }
            TypeKey::Wildcard(w) => {
                let bounds = self.db.wildcard_bounds(w);
                out.push('?');
                if !bounds.lower.is_empty() {
                    out.push_str(" super ");
                    self.render_joined(&bounds.lower, out, expanded, depth);
                } else if !bounds.upper.is_empty() {
                    out.push_str(" extends ");
                    self.render_joined(&bounds.upper, out, expanded, depth);
                }
            }
            TypeKey::Captured(c) => {
                let Some(info) = self.db.capture_info(c) else {
                    out.push_str("<capture>");
                    return;
                };
                let name = self.db.resolve_atom(info.name);
                out.push_str(&name);
                // Expand each capture's bounds once per rendering; repeats
                // collapse to the bare name so self-reference terminates.
                if expanded.insert(c) && !(info.upper.is_empty() && info.lower.is_empty()) {
                    out.push_str(" of ?");
                    if !info.lower.is_empty() {
                        out.push_str(" super ");
                        self.render_joined(&info.lower, out, expanded, depth);
                    } else {
                        out.push_str(" extends ");
                        self.render_joined(&info.upper, out, expanded, depth);
                    }
                }
            }
            TypeKey::Intersection(members) => {
                let list = self.db.type_list(members);
                for (i, &member) in list.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" & ");
                    }
                    self.render(member, out, expanded, depth + 1);
                }
            }
        }
    }

    fn render_joined(
        &self,
        types: &[TypeId],
        out: &mut String,
        expanded: &mut FxHashSet<CaptureId>,
        depth: usize,
    ) {
        for (i, &ty) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(" & ");
            }
            self.render(ty, out, expanded, depth + 1);
        }
    }
}

/// One-shot convenience for diagnostics.
pub fn format_type(db: &dyn QueryDatabase, ty: TypeId) -> String {
    TypeFormatter::new(db).format(ty)
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
