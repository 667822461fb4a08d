use crate::error::EncodingFixupError;

/// Re-decode text that was UTF-8 encoded and then read back as Latin-1.
///
/// Strings containing characters above U+00FF, or only ASCII, are returned
/// unchanged. Otherwise each character is taken as one byte and the bytes
/// are decoded as UTF-8.
pub fn redecode_utf8(value: &str) -> Result<String, EncodingFixupError> {
    if value.is_ascii() || value.chars().any(|c| u32::from(c) > 0xFF) {
        return Ok(value.to_string());
    }

    // Every char fits in a byte here.
    let bytes: Vec<u8> = value.chars().map(|c| u32::from(c) as u8).collect();
    String::from_utf8(bytes).map_err(|e| EncodingFixupError {
        value: value.to_string(),
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

/// [`redecode_utf8`], keeping the original value when decoding fails.
pub fn redecode_utf8_or_keep(field: &str, value: String) -> String {
    match redecode_utf8(&value) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("Failed to decode {} as UTF-8, keeping it as is: {}", field, e);
            value
        }
    }
}
