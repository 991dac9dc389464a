use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use uuid::Uuid;

pub const SHORT_ID_LEN: usize = 6;

// Bytes outside the set browsers accept unescaped in a Location header.
// '%' is handled separately so existing escapes survive.
const LOCATION: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

// leading hex digits of a random v4 uuid; collisions are caught by the store
pub fn generate_short_id() -> String {
    Uuid::new_v4().simple().to_string()[..SHORT_ID_LEN].to_string()
}

/// Treats absent and empty fields alike.
pub fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.is_empty())
}

/// Percent-encodes a stored URL for use as a redirect target.
///
/// Valid `%XX` escapes are kept as they are, a stray `%` becomes `%25`,
/// and non-ASCII is encoded as UTF-8.
pub fn encode_location(url: &str) -> String {
    let mut encoded = String::with_capacity(url.len());
    let mut rest = url;
    while let Some(pos) = rest.find('%') {
        encoded.extend(utf8_percent_encode(&rest[..pos], LOCATION));
        let escape = rest.as_bytes().get(pos + 1..pos + 3);
        if escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            encoded.push_str(&rest[pos..pos + 3]);
            rest = &rest[pos + 3..];
        } else {
            encoded.push_str("%25");
            rest = &rest[pos + 1..];
        }
    }
    encoded.extend(utf8_percent_encode(rest, LOCATION));
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_is_six_lowercase_hex_chars() {
        for _ in 0..64 {
            let id = generate_short_id();
            assert_eq!(id.len(), SHORT_ID_LEN);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn present_rejects_missing_and_empty() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some("")), None);
        assert_eq!(present(Some("u1")), Some("u1"));
    }

    #[test]
    fn location_leaves_plain_urls_alone() {
        let url = "https://example.com/a/b?x=1&y=[2]#frag|~!$'()*+,;=:@";
        assert_eq!(encode_location(url), url);
    }

    #[test]
    fn location_escapes_controls_spaces_and_unicode() {
        assert_eq!(
            encode_location("https://example.com/a\nb"),
            "https://example.com/a%0Ab"
        );
        assert_eq!(
            encode_location("https://example.com/caf\u{e9} menu"),
            "https://example.com/caf%C3%A9%20menu"
        );
        assert_eq!(encode_location("https://e.x/<\"{}`>"), "https://e.x/%3C%22%7B%7D%60%3E");
    }

    #[test]
    fn location_keeps_valid_escapes_only() {
        assert_eq!(encode_location("https://e.x/a%20b"), "https://e.x/a%20b");
        assert_eq!(encode_location("https://e.x/100%"), "https://e.x/100%25");
        assert_eq!(encode_location("https://e.x/%zz%4"), "https://e.x/%25zz%254");
    }
}
