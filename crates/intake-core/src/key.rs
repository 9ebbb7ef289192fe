//! Object key decoding and splitting.

use std::borrow::Cow;

use intake_config::PATH_SEPARATOR;

/// Normalise a key as delivered by the notification transport.
///
/// Keys arrive querystring-encoded: `+` stands for a space and everything else is
/// percent-encoded. Malformed escapes are kept literally and invalid UTF-8 is replaced,
/// so decoding never fails.
#[must_use]
pub fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            let bytes = urlencoding::decode_binary(spaced.as_bytes());
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }
}

/// Last separator-delimited segment of `key`.
#[must_use]
pub fn object_filename(key: &str) -> &str {
    key.rsplit_once(PATH_SEPARATOR).map_or(key, |(_, name)| name)
}

/// Split `key` below `intake_path` into its nested sub-path and filename.
///
/// Returns `None` when `key` does not live under `intake_path`. The nested sub-path is
/// empty for objects placed directly in the intake directory.
#[must_use]
pub fn split_key<'a>(key: &'a str, intake_path: &str) -> Option<(&'a str, &'a str)> {
    let remainder = key
        .strip_prefix(intake_path)?
        .strip_prefix(PATH_SEPARATOR)?;
    Some(
        remainder
            .rsplit_once(PATH_SEPARATOR)
            .unwrap_or(("", remainder)),
    )
}

/// Join non-empty segments with the key separator.
pub(crate) fn join_segments<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = Cow<'a, str>>,
{
    let mut joined = String::new();
    for segment in segments {
        if segment.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(PATH_SEPARATOR);
        }
        joined.push_str(&segment);
    }
    joined
}
