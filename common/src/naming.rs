// Naming rules for nodes: container names, hostnames and validator monikers.
//
// Container names embed the test name, which can be long and contain
// characters the runtime rejects, so names are sanitized and then condensed
// to fit hostname and moniker limits.

use crate::chain_type::ChainType;
use crate::config::{MAX_HOSTNAME_LENGTH, MAX_MONIKER_LENGTH};

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1 (multiply, then xor)
pub fn fnv1_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV32_OFFSET_BASIS, |hash, byte| {
        hash.wrapping_mul(FNV32_PRIME) ^ u32::from(*byte)
    })
}

/// Lowercase base36 rendering
pub fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Fits a moniker into [`MAX_MONIKER_LENGTH`]
///
/// Short monikers are returned untouched. Longer ones keep an equal-length
/// head and tail joined by `...`, followed by `-<base36 fnv1 hash>` of the
/// whole input so that names differing only in the middle stay distinct.
/// The kept length is `(MAX - suffix_len) / 2 - 2`, which leaves the result
/// one or two bytes under the limit.
pub fn condense_moniker(m: &str) -> String {
    let bytes = m.as_bytes();
    if bytes.len() <= MAX_MONIKER_LENGTH {
        return m.to_string();
    }

    let suffix = format!("-{}", to_base36(u64::from(fnv1_32(bytes))));
    let want_len = MAX_MONIKER_LENGTH - suffix.len();
    let keep_len = want_len / 2 - 2;

    format!(
        "{}...{}{}",
        String::from_utf8_lossy(&bytes[..keep_len]),
        String::from_utf8_lossy(&bytes[bytes.len() - keep_len..]),
        suffix
    )
}

/// Fits a container name into a valid hostname by cutting out the middle
pub fn condense_hostname(name: &str) -> String {
    let bytes = name.as_bytes();
    if bytes.len() <= MAX_HOSTNAME_LENGTH {
        return name.to_string();
    }

    // `.` on either side of the marker keeps the name resolvable.
    let keep = (MAX_HOSTNAME_LENGTH - 3) / 2;
    format!(
        "{}_._{}",
        String::from_utf8_lossy(&bytes[..keep]),
        String::from_utf8_lossy(&bytes[bytes.len() - keep..])
    )
}

/// Replaces characters the container runtime rejects with `_`
///
/// Subtest names carry `/` which would otherwise break container names.
pub fn sanitize_container_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Container name of a node: `<chain_id>-<val|fn>-<index>-<test>`
pub fn node_name(
    chain_type: ChainType,
    chain_id: &str,
    validator: bool,
    index: usize,
    test_name: &str,
) -> String {
    let role = if validator { "val" } else { "fn" };
    format!(
        "{}{}-{}-{}-{}",
        chain_type.node_name_prefix(),
        chain_id,
        role,
        index,
        sanitize_container_name(test_name)
    )
}
