use anyhow::anyhow;

/// Decodes an accumulated hex string, two digits per byte. Unlike a search
/// pattern, an odd trailing digit is never padded: it means a byte was lost.
pub fn hex_to_bytes(hex_data: &str) -> anyhow::Result<Vec<u8>> {
    hex::decode(hex_data).map_err(|e| anyhow!(e))
}
