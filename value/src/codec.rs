//! Tagged primitive codec.
//!
//! JSON cannot carry NaN, the infinities, big integers, or symbolic values.
//! Those travel as strings built from a reserved prefix plus a type-specific
//! sub-prefix plus the value's textual form. Genuine user strings that
//! happen to start with the reserved prefix are escaped by doubling the
//! prefix, so the scheme is unambiguous for any input.

use crate::scalar::{Prim, Scalar};

/// Reserved prefix marking a tagged string.
pub const RESERVED_PREFIX: &str = "@gsnap@";

/// Sub-prefix for big integers.
pub const BIGINT_PREFIX: &str = "bigint:";

/// Sub-prefix for symbolic values.
pub const SYMBOL_PREFIX: &str = "sym:";

const NAN_TOKEN: &str = "NaN";
const INF_TOKEN: &str = "INF";
const NEG_INF_TOKEN: &str = "-INF";

/// Encodes a primitive into its JSON-encodable form.
///
/// Ordinary values pass through unchanged; everything else becomes a tagged
/// string.
#[must_use]
pub fn encode_prim(prim: &Prim) -> Scalar {
    match prim {
        Prim::Null => Scalar::Null,
        Prim::Bool(b) => Scalar::Bool(*b),
        Prim::Int(i) => Scalar::Int(*i),
        Prim::Float(f) => {
            if f.is_nan() {
                tagged(NAN_TOKEN)
            } else if *f == f64::INFINITY {
                tagged(INF_TOKEN)
            } else if *f == f64::NEG_INFINITY {
                tagged(NEG_INF_TOKEN)
            } else {
                Scalar::Float(*f)
            }
        }
        Prim::BigInt(v) => tagged(&format!("{BIGINT_PREFIX}{v}")),
        Prim::Symbol(s) => tagged(&format!("{SYMBOL_PREFIX}{s}")),
        Prim::Str(s) => {
            if s.starts_with(RESERVED_PREFIX) {
                Scalar::Str(format!("{RESERVED_PREFIX}{s}"))
            } else {
                Scalar::Str(s.clone())
            }
        }
    }
}

/// Decodes a JSON-encodable scalar back into a primitive.
///
/// Untagged values pass through. A tagged string with no matching
/// sub-prefix, or with a payload that does not parse, decodes to `None`:
/// data loss at the edge, not a fatal error.
#[must_use]
pub fn decode_scalar(scalar: &Scalar) -> Option<Prim> {
    let s = match scalar {
        Scalar::Null => return Some(Prim::Null),
        Scalar::Bool(b) => return Some(Prim::Bool(*b)),
        Scalar::Int(i) => return Some(Prim::Int(*i)),
        Scalar::Float(f) => return Some(Prim::Float(*f)),
        Scalar::Str(s) => s,
    };

    let Some(rest) = s.strip_prefix(RESERVED_PREFIX) else {
        return Some(Prim::Str(s.clone()));
    };

    // Doubled prefix: an escaped user string.
    if rest.starts_with(RESERVED_PREFIX) {
        return Some(Prim::Str(rest.to_owned()));
    }

    if let Some(digits) = rest.strip_prefix(BIGINT_PREFIX) {
        return digits.parse::<i128>().ok().map(Prim::BigInt);
    }
    if let Some(name) = rest.strip_prefix(SYMBOL_PREFIX) {
        return Some(Prim::Symbol(name.to_owned()));
    }

    match rest {
        NAN_TOKEN => Some(Prim::Float(f64::NAN)),
        INF_TOKEN => Some(Prim::Float(f64::INFINITY)),
        NEG_INF_TOKEN => Some(Prim::Float(f64::NEG_INFINITY)),
        _ => None,
    }
}

fn tagged(body: &str) -> Scalar {
    Scalar::Str(format!("{RESERVED_PREFIX}{body}"))
}
