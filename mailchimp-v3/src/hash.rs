use md5::{Digest, Md5};

/// MailChimp identifies a list member by the MD5 hex digest of their
/// lowercased email address.
///
/// The address is folded through its uppercase form first, so characters
/// whose uppercase expands (`ß` to `SS`) hash the same in either case. For
/// ASCII addresses this is plain lowercasing.
pub fn subscriber_hash(email: &str) -> String {
    let folded = email.to_uppercase().to_lowercase();
    format!("{:x}", Md5::digest(folded.as_bytes()))
}
