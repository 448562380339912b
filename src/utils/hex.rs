/// Clean a hex string by removing "0x" prefix and whitespace
pub fn clean_hex(s: &str) -> &str {
    let s = s.trim();
    if let Some(stripped) = s.strip_prefix("0x") {
        stripped
    } else {
        s
    }
}

/// True for a 32-byte secp256k1 secret in hex, with or without `0x`.
pub fn is_private_key_hex(s: &str) -> bool {
    let clean = clean_hex(s);
    clean.len() == 64 && clean.as_bytes().iter().all(|b| b.is_ascii_hexdigit())
}
