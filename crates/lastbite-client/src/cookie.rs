//! Reading values out of a `document.cookie`-style string.

use percent_encoding::percent_decode_str;

/// Returns the percent-decoded value of cookie `name` in `cookies`
/// (`"a=1; b=2"`), or `None` when it is absent.
///
/// The first matching cookie wins.
#[must_use]
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
}
