use anyhow::{anyhow, ensure};


pub fn decode_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    ensure!(digits.len() % 2 == 0, "hex string '{}' has an odd number of digits", s);
    if digits.is_empty() {
        return Ok(Vec::new())
    }
    let mut bytes = vec![0; digits.len() / 2];
    faster_hex::hex_decode(digits.as_bytes(), &mut bytes)
        .map_err(|err| anyhow!("invalid hex string '{}': {:?}", s, err))?;
    Ok(bytes)
}


pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", faster_hex::hex_string(bytes))
}
