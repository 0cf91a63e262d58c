use std::borrow::Cow;

use crate::config::StorageLocation;

/// Rewrite a public HTTPS object URL into its storage-native form (`s3://bucket/key`).
///
/// The first matching location wins. URLs outside every known location are returned
/// unchanged.
pub fn normalize_locator<'a>(locator: &'a str, locations: &[StorageLocation]) -> Cow<'a, str> {
    for loc in locations {
        if let Some(rest) = locator.strip_prefix(loc.https_prefix.as_str()) {
            return Cow::Owned(format!("{}{rest}", loc.native_prefix));
        }
    }
    Cow::Borrowed(locator)
}

#[cfg(test)]
#[path = "../../tests/unit/render/locator.rs"]
mod tests;
