//! Deterministic registry fingerprinting.

use blake3::Hasher;

use crate::registry::TypeRegistry;

/// Computes a deterministic hash of the registered tag set.
///
/// Saved projects record this value so a load against a differently
/// populated registry can be reported to the user. The hash covers tag
/// names only; factories are opaque.
#[must_use]
pub fn registry_fingerprint<A, T>(registry: &TypeRegistry<A, T>) -> u64 {
    let mut hasher = Hasher::new();
    write_u32(&mut hasher, registry.len() as u32);
    for tag in registry.tags() {
        let name = tag.as_str().as_bytes();
        write_u32(&mut hasher, name.len() as u32);
        hasher.update(name);
    }

    let hash = hasher.finalize();
    let bytes = hash.as_bytes();
    u64::from_le_bytes(bytes[0..8].try_into().expect("blake3 output is 32 bytes"))
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}
