//! Interned type terms for the inference engine.
//!
//! Every type term is represented by a lightweight `TypeId` handle into the
//! `TypeInterner`. Benefits:
//!
//! - O(1) type equality (just compare `TypeId` values)
//! - Memory efficient (each unique structure stored once)
//! - Self-referential types are expressible only through the `CaptureId` and
//!   `TypeParamId` side tables, so structural construction can never diverge

use crate::def::DefId;
use genus_common::Atom;

/// A handle to an interned type term.
///
/// The low id range is reserved for intrinsics (primitives, `null`, `void`,
/// and the error sentinel); interned structural types start at
/// [`TypeId::FIRST_INTERNED`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel produced when construction went wrong; compatible with
    /// everything so one malformed term does not cascade.
    pub const ERROR: TypeId = TypeId(0);
    /// The null type: a subtype of every reference type, a supertype of none.
    pub const NULL: TypeId = TypeId(1);
    /// The void (no-value) pseudo-type of callable returns.
    pub const VOID: TypeId = TypeId(2);
    pub const BOOLEAN: TypeId = TypeId(3);
    pub const BYTE: TypeId = TypeId(4);
    pub const SHORT: TypeId = TypeId(5);
    pub const CHAR: TypeId = TypeId(6);
    pub const INT: TypeId = TypeId(7);
    pub const LONG: TypeId = TypeId(8);
    pub const FLOAT: TypeId = TypeId(9);
    pub const DOUBLE: TypeId = TypeId(10);

    /// First id handed out by the interner for structural types.
    pub const FIRST_INTERNED: u32 = 16;

    /// Whether this id is one of the pre-registered intrinsics.
    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_INTERNED
    }

    /// The intrinsic kind for a pre-registered id, if any.
    pub const fn intrinsic_kind(self) -> Option<IntrinsicKind> {
        match self {
            Self::ERROR => Some(IntrinsicKind::Error),
            Self::NULL => Some(IntrinsicKind::Null),
            Self::VOID => Some(IntrinsicKind::Void),
            Self::BOOLEAN => Some(IntrinsicKind::Boolean),
            Self::BYTE => Some(IntrinsicKind::Byte),
            Self::SHORT => Some(IntrinsicKind::Short),
            Self::CHAR => Some(IntrinsicKind::Char),
            Self::INT => Some(IntrinsicKind::Int),
            Self::LONG => Some(IntrinsicKind::Long),
            Self::FLOAT => Some(IntrinsicKind::Float),
            Self::DOUBLE => Some(IntrinsicKind::Double),
            _ => None,
        }
    }

    /// Whether this id denotes one of the eight primitive types.
    #[inline]
    pub fn is_primitive(self) -> bool {
        matches!(self.intrinsic_kind(), Some(k) if k.is_primitive())
    }
}

/// Kinds of intrinsic (non-interned) types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Error,
    Null,
    Void,
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl IntrinsicKind {
    /// The eight primitive value types (not `null`, `void`, or the error
    /// sentinel).
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Byte
                | Self::Short
                | Self::Char
                | Self::Int
                | Self::Long
                | Self::Float
                | Self::Double
        )
    }

    /// The `TypeId` this intrinsic is pre-registered at.
    pub const fn type_id(self) -> TypeId {
        match self {
            Self::Error => TypeId::ERROR,
            Self::Null => TypeId::NULL,
            Self::Void => TypeId::VOID,
            Self::Boolean => TypeId::BOOLEAN,
            Self::Byte => TypeId::BYTE,
            Self::Short => TypeId::SHORT,
            Self::Char => TypeId::CHAR,
            Self::Int => TypeId::INT,
            Self::Long => TypeId::LONG,
            Self::Float => TypeId::FLOAT,
            Self::Double => TypeId::DOUBLE,
        }
    }

    /// Source-level spelling, used by the formatter.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "<error>",
            Self::Null => "null",
            Self::Void => "void",
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// An inference variable: an unresolved placeholder type introduced for a
/// generic call, subject to bound accumulation and eventual instantiation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InferenceVar(pub u32);

/// A declared type parameter (of a class or callable signature).
///
/// Occurrences in type terms are `TypeKey::Param`; the parameter's name and
/// declared bounds live in the parameter side table so that F-bounded
/// declarations (`T extends Comparable<T>`) can refer back to themselves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamId(pub u32);

/// A captured type-variable produced by wildcard capture conversion.
///
/// Capture variables have identity, not structure: two captures of the same
/// wildcard are distinct. Their bounds live in a side table and may mention
/// the capture itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CaptureId(pub u32);

/// Handle to an interned list of types (type arguments, intersection
/// members).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

impl TypeListId {
    /// The canonical empty list.
    pub const EMPTY: TypeListId = TypeListId(0);
}

/// Handle to an interned wildcard bound pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WildcardId(pub u32);

/// Structural key of a type term. Interned to a `TypeId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// Primitive, `null`, `void`, or the error sentinel.
    Intrinsic(IntrinsicKind),
    /// Nominal class or interface type, possibly parameterized.
    /// An empty argument list on a generic definition denotes the raw type.
    Class(DefId, TypeListId),
    /// Array type with the given component.
    Array(TypeId),
    /// Use-site variance wildcard (`?`, `? extends T`, `? super T`).
    /// Only meaningful in type-argument position.
    Wildcard(WildcardId),
    /// Captured type-variable from wildcard capture conversion.
    Captured(CaptureId),
    /// Inference variable.
    Infer(InferenceVar),
    /// Declared type-parameter occurrence.
    Param(TypeParamId),
    /// Intersection of the member types, most specific first.
    Intersection(TypeListId),
}

/// Upper and lower bounds of a wildcard.
///
/// The unbounded wildcard has both lists empty. `? extends T` has `upper =
/// [T]`, `? super T` has `lower = [T]`. Multiple upper bounds arise when
/// wildcard bounds are combined during lub computation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WildcardBounds {
    pub upper: Vec<TypeId>,
    pub lower: Vec<TypeId>,
}

impl WildcardBounds {
    /// The unbounded wildcard `?`.
    pub const UNBOUNDED: WildcardBounds = WildcardBounds {
        upper: Vec::new(),
        lower: Vec::new(),
    };

    pub fn extends(upper: Vec<TypeId>) -> Self {
        WildcardBounds {
            upper,
            lower: Vec::new(),
        }
    }

    pub fn super_(lower: Vec<TypeId>) -> Self {
        WildcardBounds {
            upper: Vec::new(),
            lower,
        }
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.upper.is_empty() && self.lower.is_empty()
    }

    #[inline]
    pub fn is_extends(&self) -> bool {
        !self.upper.is_empty() && self.lower.is_empty()
    }

    #[inline]
    pub fn is_super(&self) -> bool {
        !self.lower.is_empty()
    }
}

/// Declared data of a type parameter.
#[derive(Clone, Debug)]
pub struct TypeParamInfo {
    pub name: Atom,
    /// Declared upper bounds; empty means the implicit `Object` bound.
    pub bounds: Vec<TypeId>,
}

/// Data of a captured type-variable.
#[derive(Clone, Debug)]
pub struct CapturedInfo {
    /// Display name, e.g. `CAP#1`.
    pub name: Atom,
    pub upper: Vec<TypeId>,
    pub lower: Vec<TypeId>,
}

/// A generic callable signature as seen by the overload selector.
///
/// Parameter and return types may mention the signature's own type
/// parameters (`TypeKey::Param`); an inference attempt replaces those with
/// fresh inference variables.
#[derive(Clone, Debug)]
pub struct CallableSignature {
    pub name: Atom,
    /// Definition the callable is declared in; used for specificity
    /// tie-breaking between otherwise equal candidates.
    pub declared_in: DefId,
    pub type_params: Vec<TypeParamId>,
    pub params: Vec<TypeId>,
    /// Whether the last parameter is a repeatable array parameter.
    pub variadic: bool,
    pub return_type: TypeId,
}

impl CallableSignature {
    /// Whether this signature declares type parameters of its own.
    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
