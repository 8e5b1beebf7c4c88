/// Stable dedup key for an error: lowercase hex MD5 of the content.
///
/// Not a security hash, only used to label issue titles.
pub fn checksum(content: &str) -> String {
    format!("{:x}", md5::compute(content.as_bytes()))
}
