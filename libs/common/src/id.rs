use ulid::Ulid;

/// Generates a new ULID-based ID with the given prefix.
///
/// # Examples
/// ```
/// let id = relay_common::id::prefixed_ulid("conn");
/// assert!(id.starts_with("conn_"));
/// ```
pub fn prefixed_ulid(prefix: &str) -> String {
    format!("{}_{}", prefix, Ulid::new())
}

/// Returns true if `id` is `<prefix>_<ULID>`.
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.split_once('_')
        .map(|(p, rest)| p == prefix && Ulid::from_string(rest).is_ok())
        .unwrap_or(false)
}

/// Marker trait for types that represent a prefixed ID.
pub trait PrefixedId {
    const PREFIX: &'static str;

    fn generate() -> String {
        prefixed_ulid(Self::PREFIX)
    }

    fn is_valid(id: &str) -> bool {
        has_prefix(id, Self::PREFIX)
    }
}

/// Well-known ID prefixes.
pub mod prefix {
    pub const CONNECTION: &str = "conn";
}
