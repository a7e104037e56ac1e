/// Plain text passes through untouched. Invalid UTF-8 is decoded lossily
/// instead of failing the import.
pub fn extract(data: Vec<u8>) -> String {
    match String::from_utf8(data) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
