//! Wildcard capture conversion.
//!
//! Capturing `List<? extends Number>` replaces the wildcard argument with a
//! fresh inference variable whose bounds are derived from the wildcard's own
//! bounds and the declared type parameter's bounds, yielding `List<α>` plus
//! a [`CaptureConversion`] describing how `α` relates to the source.

use crate::bounds::{CaptureConversion, CaptureItem};
use crate::db::QueryDatabase;
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::types::{TypeId, TypeKey};
use indexmap::IndexMap;

/// Capture a class type's wildcard arguments.
///
/// Returns `None` when `ty` is not a parameterized class type or has no
/// wildcard arguments (capture conversion is the identity there).
pub fn capture_conversion(
    db: &dyn QueryDatabase,
    ty: TypeId,
) -> Option<(TypeId, CaptureConversion)> {
    let Some(TypeKey::Class(def, args)) = db.lookup(ty) else {
        return None;
    };
    let arg_list = db.type_list(args);
    if arg_list.is_empty() {
        return None;
    }
    let has_wildcard = arg_list
        .iter()
        .any(|&arg| matches!(db.lookup(arg), Some(TypeKey::Wildcard(_))));
    if !has_wildcard {
        return None;
    }

    let params = db.def_type_params(def);
    if params.len() != arg_list.len() {
        return None;
    }

    // Every position gets a fresh variable so declared bounds can be
    // substituted consistently; non-wildcard positions degenerate to plain
    // equalities when the conversion is incorporated.
    let fresh: Vec<_> = arg_list.iter().map(|_| db.fresh_inference_var()).collect();

    let mut subst = TypeSubstitution::new();
    for (&param, &var) in params.iter().zip(fresh.iter()) {
        subst.insert_param(param, db.infer(var));
    }

    let mut items = IndexMap::new();
    for ((&param, &var), &argument) in params.iter().zip(fresh.iter()).zip(arg_list.iter()) {
        let declared_bounds = db
            .type_param(param)
            .map(|info| {
                info.bounds
                    .iter()
                    .map(|&b| instantiate_type(db, b, &subst))
                    .collect()
            })
            .unwrap_or_default();
        items.insert(
            var,
            CaptureItem {
                argument,
                declared_bounds,
            },
        );
    }

    let captured_args: Vec<TypeId> = fresh.iter().map(|&v| db.infer(v)).collect();
    let captured = db.class(def, captured_args);

    Some((
        captured,
        CaptureConversion {
            source: ty,
            captured,
            items,
        },
    ))
}

#[cfg(test)]
#[path = "../tests/capture_tests.rs"]
mod tests;
