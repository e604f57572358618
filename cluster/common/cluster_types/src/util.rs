use serde::{Deserialize, Deserializer};

// Remove an optional 0x prefix from a hex string
pub fn strip_0x(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

// Decode a hex string with or without the 0x prefix
pub fn decode_hex(value: &str) -> Result<Vec<u8>, String> {
    hex::decode(strip_0x(value)).map_err(|e| format!("Unable to decode hex {:?}: {}", value, e))
}

/// Decode a hex string into a fixed size array.
///
/// An empty string (or a bare `0x`) decodes to all zeroes, which is how unset addresses and
/// signatures are represented inside the hashed containers. Any other value must have exactly
/// `N` bytes.
pub fn decode_fixed<const N: usize>(value: &str) -> Result<[u8; N], String> {
    if strip_0x(value).is_empty() {
        return Ok([0; N]);
    }
    decode_exact(value)
}

/// Decode a hex string that must carry exactly `N` bytes. Empty values are rejected.
pub fn decode_exact<const N: usize>(value: &str) -> Result<[u8; N], String> {
    let bytes = decode_hex(value)?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        format!(
            "Hex value {:?} has invalid length: expected {}, got {}",
            value,
            N,
            bytes.len()
        )
    })
}

// Encode bytes as a lowercase 0x prefixed hex string
pub fn to_0x_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Compare two hex strings, ignoring the 0x prefix and letter case.
pub fn hex_eq(a: &str, b: &str) -> bool {
    strip_0x(a).eq_ignore_ascii_case(strip_0x(b))
}

/// Compare a stored hash against a computed one. The stored value must carry the `0x` prefix.
pub fn stored_hash_eq(stored: &str, computed: &str) -> bool {
    stored.starts_with("0x") && hex_eq(stored, computed)
}

/// Treat an explicit JSON `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde helpers for an optional list of gwei amounts encoded as decimal strings.
pub mod quoted_u64_list {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Quoted(#[serde(with = "serde_utils::quoted_u64")] u64);

    pub fn serialize<S>(value: &Option<Vec<u64>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(amounts) => serializer.collect_seq(amounts.iter().map(u64::to_string)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amounts: Option<Vec<Quoted>> = Option::deserialize(deserializer)?;
        Ok(amounts.map(|amounts| amounts.into_iter().map(|quoted| quoted.0).collect()))
    }
}
