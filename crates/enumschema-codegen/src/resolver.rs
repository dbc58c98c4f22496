//! Value resolver.
//!
//! Turns a matched constant into an [`Entry`] using the checked symbol
//! table: the 64-bit value pattern, its signedness and the canonical
//! decimal text.

use crate::scanner::MatchedConst;
use enumschema_core::{Entry, Error, Result, TypeName};
use enumschema_loader::{ConstValue, Package};

/// Resolves the value of one matched constant.
///
/// # Errors
///
/// - [`Error::UnresolvedSymbol`] if the constant is not in the symbol table
/// - [`Error::NonIntegerType`] if its type is not an integer kind
/// - [`Error::NotAnInteger`] if its value does not fit in 64 bits
pub fn resolve(pkg: &Package, matched: &MatchedConst<'_>, type_name: &TypeName) -> Result<Entry> {
    let name = &matched.ident.name;
    let object = pkg
        .object_of(matched.file, matched.ident)
        .ok_or_else(|| Error::UnresolvedSymbol {
            name: name.clone(),
            reason: pkg
                .diagnostic_of(matched.file, matched.ident)
                .map(ToString::to_string),
        })?;

    if !object.ty.is_integer() {
        return Err(Error::NonIntegerType {
            type_name: type_name.to_string(),
        });
    }

    let ConstValue::Int(value) = object.value else {
        return Err(Error::NotAnInteger {
            name: name.clone(),
            value: object.value.to_string(),
        });
    };

    Ok(Entry::new(
        name.as_str(),
        bit_pattern(value).ok_or_else(|| Error::NotAnInteger {
            name: name.clone(),
            value: value.to_string(),
        })?,
        !object.ty.is_unsigned(),
        value.to_string(),
    ))
}

/// 64-bit pattern of an integer: the value itself when it fits `u64`,
/// otherwise its two's complement `i64` form.
#[allow(clippy::cast_sign_loss)]
fn bit_pattern(value: i128) -> Option<u64> {
    u64::try_from(value)
        .ok()
        .or_else(|| i64::try_from(value).ok().map(|v| v as u64))
}
