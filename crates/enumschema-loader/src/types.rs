//! Resolved types of constants.

use std::fmt;

/// Predeclared basic types plus the untyped constant kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BasicKind {
    Bool,
    String,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedString,
}

impl BasicKind {
    /// Looks up a predeclared type name, `byte` and `rune` included.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => Self::Bool,
            "string" => Self::String,
            "int" => Self::Int,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" | "rune" => Self::Int32,
            "int64" => Self::Int64,
            "uint" => Self::Uint,
            "uint8" | "byte" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "uintptr" => Self::Uintptr,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "complex64" => Self::Complex64,
            "complex128" => Self::Complex128,
            _ => return None,
        })
    }

    /// Go spelling of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::UntypedBool => "untyped bool",
            Self::UntypedInt => "untyped int",
            Self::UntypedRune => "untyped rune",
            Self::UntypedFloat => "untyped float",
            Self::UntypedString => "untyped string",
        }
    }

    /// Integer kinds, typed or untyped.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
                | Self::Uintptr
                | Self::UntypedInt
                | Self::UntypedRune
        )
    }

    /// Unsigned integer kinds.
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::Uint | Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64 | Self::Uintptr
        )
    }

    /// Floating-point kinds, typed or untyped.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64 | Self::UntypedFloat)
    }

    /// Whether this is one of the untyped constant kinds.
    #[must_use]
    pub const fn is_untyped(self) -> bool {
        matches!(
            self,
            Self::UntypedBool
                | Self::UntypedInt
                | Self::UntypedRune
                | Self::UntypedFloat
                | Self::UntypedString
        )
    }

    /// Width in bits of a typed integer kind.
    #[must_use]
    pub const fn bits(self) -> Option<u32> {
        match self {
            Self::Int8 | Self::Uint8 => Some(8),
            Self::Int16 | Self::Uint16 => Some(16),
            Self::Int32 | Self::Uint32 => Some(32),
            Self::Int | Self::Int64 | Self::Uint | Self::Uint64 | Self::Uintptr => Some(64),
            _ => None,
        }
    }

    /// Inclusive value range of a typed integer kind.
    #[must_use]
    pub fn int_range(self) -> Option<(i128, i128)> {
        let bits = self.bits()?;
        if self.is_unsigned() {
            Some((0, (1i128 << bits) - 1))
        } else {
            Some((-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1))
        }
    }
}

/// Type of a checked constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A predeclared or untyped kind
    Basic(BasicKind),
    /// A package-local named type
    Named {
        /// Declared name
        name: String,
        /// Basic kind it ultimately resolves to, if any
        underlying: Option<BasicKind>,
    },
}

impl Type {
    /// Basic kind this type resolves to.
    #[must_use]
    pub const fn underlying(&self) -> Option<BasicKind> {
        match self {
            Self::Basic(kind) => Some(*kind),
            Self::Named { underlying, .. } => *underlying,
        }
    }

    /// Whether values of this type are integers.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.underlying().is_some_and(BasicKind::is_integer)
    }

    /// Whether values of this type are unsigned integers.
    #[must_use]
    pub fn is_unsigned(&self) -> bool {
        self.underlying().is_some_and(BasicKind::is_unsigned)
    }

    /// Whether this is an untyped constant type.
    #[must_use]
    pub fn is_untyped(&self) -> bool {
        matches!(self, Self::Basic(kind) if kind.is_untyped())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(kind) => f.write_str(kind.name()),
            Self::Named { name, .. } => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_of_basic_names() {
        assert_eq!(BasicKind::from_name("byte"), Some(BasicKind::Uint8));
        assert_eq!(BasicKind::from_name("rune"), Some(BasicKind::Int32));
        assert_eq!(BasicKind::from_name("Fruit"), None);
    }

    #[test]
    fn test_int_ranges() {
        assert_eq!(BasicKind::Uint8.int_range(), Some((0, 255)));
        assert_eq!(BasicKind::Int8.int_range(), Some((-128, 127)));
        assert_eq!(
            BasicKind::Uint.int_range(),
            Some((0, i128::from(u64::MAX)))
        );
        assert_eq!(BasicKind::UntypedInt.int_range(), None);
    }

    #[test]
    fn test_named_type_flags() {
        let ty = Type::Named {
            name: "Fruit".into(),
            underlying: Some(BasicKind::Uint8),
        };
        assert!(ty.is_integer());
        assert!(ty.is_unsigned());
        assert!(!ty.is_untyped());
        assert_eq!(ty.to_string(), "Fruit");

        let opaque = Type::Named {
            name: "Dur".into(),
            underlying: None,
        };
        assert!(!opaque.is_integer());
    }

    #[test]
    fn test_untyped_display() {
        assert_eq!(Type::Basic(BasicKind::UntypedRune).to_string(), "untyped rune");
        assert!(Type::Basic(BasicKind::UntypedInt).is_integer());
    }
}
