//! Core class hierarchy bootstrap.
//!
//! Loose compatibility needs the boxing tables, lub needs `Object`, arrays
//! need `Cloneable`/`Serializable`, and nearly every test needs a small but
//! realistic hierarchy. `CoreDefs` registers that hierarchy once per store:
//!
//! ```text
//! Object
//! ├── Number (abstract, Serializable)
//! │   ├── Integer, Long, Short, Byte, Float, Double
//! │   │       (each Comparable<Self>, Serializable)
//! ├── Boolean, Character (Comparable<Self>, Serializable)
//! ├── String (final, CharSequence, Comparable<String>, Serializable)
//! └── ArrayList<E> (List<E>)
//! interfaces: Serializable, Cloneable, CharSequence, Comparable<T>,
//!             Iterable<T>, Collection<E>, List<E>, Set<E>, Map<K,V>
//! ```

use crate::def::{DefFlags, DefId, DefinitionInfo, DefinitionStore, ParamStore};
use crate::intern::TypeInterner;
use crate::types::{IntrinsicKind, TypeId, TypeKey, TypeListId};
use rustc_hash::FxHashMap;

/// Ids of the pre-registered core definitions plus the boxing tables.
pub struct CoreDefs {
    pub object_def: DefId,
    pub object: TypeId,
    pub serializable_def: DefId,
    pub serializable: TypeId,
    pub cloneable_def: DefId,
    pub cloneable: TypeId,
    pub char_sequence_def: DefId,
    pub char_sequence: TypeId,
    /// `Comparable<T>`
    pub comparable_def: DefId,
    pub number_def: DefId,
    pub number: TypeId,
    pub string_def: DefId,
    pub string: TypeId,
    /// `Iterable<T>`
    pub iterable_def: DefId,
    /// `Collection<E> extends Iterable<E>`
    pub collection_def: DefId,
    /// `List<E> extends Collection<E>`
    pub list_def: DefId,
    /// `Set<E> extends Collection<E>`
    pub set_def: DefId,
    /// `ArrayList<E> implements List<E>`
    pub array_list_def: DefId,
    /// `Map<K, V>`
    pub map_def: DefId,
    boxes: FxHashMap<IntrinsicKind, DefId>,
    box_types: FxHashMap<IntrinsicKind, TypeId>,
    unboxes: FxHashMap<DefId, TypeId>,
}

impl CoreDefs {
    /// Register the core hierarchy into empty stores.
    pub fn install(interner: &TypeInterner, defs: &DefinitionStore, params: &ParamStore) -> Self {
        let plain = |def: DefId| -> TypeId {
            interner.intern(TypeKey::Class(def, TypeListId::EMPTY))
        };

        // Object first: everything else's implicit superclass.
        let object_def = defs.register(DefinitionInfo::class(
            interner.intern_string("Object"),
            Vec::new(),
            None,
        ));
        let object = plain(object_def);

        let serializable_def = defs.register(DefinitionInfo::interface(
            interner.intern_string("Serializable"),
            Vec::new(),
        ));
        let serializable = plain(serializable_def);

        let cloneable_def = defs.register(DefinitionInfo::interface(
            interner.intern_string("Cloneable"),
            Vec::new(),
        ));
        let cloneable = plain(cloneable_def);

        let char_sequence_def = defs.register(DefinitionInfo::interface(
            interner.intern_string("CharSequence"),
            Vec::new(),
        ));
        let char_sequence = plain(char_sequence_def);

        // Comparable<T>: F-bounded uses refer to the parameter, so the
        // definition itself only needs the bare parameter.
        let comparable_t = params.allocate(interner.intern_string("T"));
        let comparable_def = defs.register(DefinitionInfo::interface(
            interner.intern_string("Comparable"),
            vec![comparable_t],
        ));

        let number_def = defs.register(
            DefinitionInfo::class(interner.intern_string("Number"), Vec::new(), Some(object))
                .with_flags(DefFlags::ABSTRACT)
                .with_interfaces(vec![serializable]),
        );
        let number = plain(number_def);

        // Helper for `Comparable<Self>` on a non-generic class.
        let comparable_of = |arg: TypeId| -> TypeId {
            let list = interner.intern_type_list(vec![arg]);
            interner.intern(TypeKey::Class(comparable_def, list))
        };

        let string_def = defs.allocate();
        let string = plain(string_def);
        defs.fill(
            string_def,
            DefinitionInfo::class(interner.intern_string("String"), Vec::new(), Some(object))
                .with_flags(DefFlags::FINAL)
                .with_interfaces(vec![char_sequence, comparable_of(string), serializable]),
        );

        let mut boxes = FxHashMap::default();
        let mut box_types = FxHashMap::default();
        let mut unboxes = FxHashMap::default();

        let numeric_boxes = [
            (IntrinsicKind::Byte, "Byte"),
            (IntrinsicKind::Short, "Short"),
            (IntrinsicKind::Int, "Integer"),
            (IntrinsicKind::Long, "Long"),
            (IntrinsicKind::Float, "Float"),
            (IntrinsicKind::Double, "Double"),
        ];
        for (kind, name) in numeric_boxes {
            let def = defs.allocate();
            let ty = plain(def);
            defs.fill(
                def,
                DefinitionInfo::class(interner.intern_string(name), Vec::new(), Some(number))
                    .with_flags(DefFlags::FINAL)
                    .with_interfaces(vec![comparable_of(ty), serializable]),
            );
            boxes.insert(kind, def);
            box_types.insert(kind, ty);
            unboxes.insert(def, kind.type_id());
        }

        for (kind, name) in [
            (IntrinsicKind::Boolean, "Boolean"),
            (IntrinsicKind::Char, "Character"),
        ] {
            let def = defs.allocate();
            let ty = plain(def);
            defs.fill(
                def,
                DefinitionInfo::class(interner.intern_string(name), Vec::new(), Some(object))
                    .with_flags(DefFlags::FINAL)
                    .with_interfaces(vec![comparable_of(ty), serializable]),
            );
            boxes.insert(kind, def);
            box_types.insert(kind, ty);
            unboxes.insert(def, kind.type_id());
        }

        // Collections.
        let iterable_t = params.allocate(interner.intern_string("T"));
        let iterable_def = defs.register(DefinitionInfo::interface(
            interner.intern_string("Iterable"),
            vec![iterable_t],
        ));

        let collection_e = params.allocate(interner.intern_string("E"));
        let collection_def = defs.allocate();
        {
            let e = interner.intern(TypeKey::Param(collection_e));
            let iterable_e = {
                let list = interner.intern_type_list(vec![e]);
                interner.intern(TypeKey::Class(iterable_def, list))
            };
            defs.fill(
                collection_def,
                DefinitionInfo::interface(
                    interner.intern_string("Collection"),
                    vec![collection_e],
                )
                .with_interfaces(vec![iterable_e]),
            );
        }

        let make_collection_sub = |name: &str| -> (DefId, crate::types::TypeParamId) {
            let e_param = params.allocate(interner.intern_string("E"));
            let def = defs.allocate();
            let e = interner.intern(TypeKey::Param(e_param));
            let collection_e = {
                let list = interner.intern_type_list(vec![e]);
                interner.intern(TypeKey::Class(collection_def, list))
            };
            defs.fill(
                def,
                DefinitionInfo::interface(interner.intern_string(name), vec![e_param])
                    .with_interfaces(vec![collection_e]),
            );
            (def, e_param)
        };

        let (list_def, _) = make_collection_sub("List");
        let (set_def, _) = make_collection_sub("Set");

        let array_list_e = params.allocate(interner.intern_string("E"));
        let array_list_def = defs.allocate();
        {
            let e = interner.intern(TypeKey::Param(array_list_e));
            let list_e = {
                let list = interner.intern_type_list(vec![e]);
                interner.intern(TypeKey::Class(list_def, list))
            };
            defs.fill(
                array_list_def,
                DefinitionInfo::class(
                    interner.intern_string("ArrayList"),
                    vec![array_list_e],
                    Some(object),
                )
                .with_interfaces(vec![list_e, cloneable, serializable]),
            );
        }

        let map_k = params.allocate(interner.intern_string("K"));
        let map_v = params.allocate(interner.intern_string("V"));
        let map_def = defs.register(DefinitionInfo::interface(
            interner.intern_string("Map"),
            vec![map_k, map_v],
        ));

        CoreDefs {
            object_def,
            object,
            serializable_def,
            serializable,
            cloneable_def,
            cloneable,
            char_sequence_def,
            char_sequence,
            comparable_def,
            number_def,
            number,
            string_def,
            string,
            iterable_def,
            collection_def,
            list_def,
            set_def,
            array_list_def,
            map_def,
            boxes,
            box_types,
            unboxes,
        }
    }

    /// The wrapper class definition for a primitive kind.
    pub fn box_def(&self, kind: IntrinsicKind) -> Option<DefId> {
        self.boxes.get(&kind).copied()
    }

    /// The wrapper class type for a primitive kind.
    pub fn box_type(&self, kind: IntrinsicKind) -> Option<TypeId> {
        self.box_types.get(&kind).copied()
    }

    /// The primitive type a wrapper class unboxes to.
    pub fn unbox_type(&self, def: DefId) -> Option<TypeId> {
        self.unboxes.get(&def).copied()
    }
}

#[cfg(test)]
#[path = "../tests/bootstrap_tests.rs"]
mod tests;
