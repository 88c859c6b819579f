//! Response body decoding.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

use super::traits::Charset;

/// All sources live under `.jp`, which biases guessing toward the Japanese
/// legacy encodings.
const TLD_HINT: &[u8] = b"jp";

/// Extract the charset label from a `Content-Type` header value.
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches('"');
            (!value.is_empty()).then_some(value)
        } else {
            None
        }
    })
}

/// Decode a body according to the charset policy.
///
/// Returns the text and the name of the encoding that was used. Malformed
/// sequences are replaced rather than rejected.
pub fn decode_body(bytes: &[u8], declared: Option<&str>, policy: Charset) -> (String, &'static str) {
    let encoding = match policy {
        Charset::Declared => declared
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8),
        Charset::Detect => detect(bytes),
    };

    let (text, used, _had_errors) = encoding.decode(bytes);
    (text.into_owned(), used.name())
}

fn detect(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(Some(TLD_HINT), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(
            charset_from_content_type("text/html; charset=Shift_JIS"),
            Some("Shift_JIS")
        );
        assert_eq!(
            charset_from_content_type("text/html;charset=\"utf-8\""),
            Some("utf-8")
        );
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset="), None);
    }

    #[test]
    fn test_detects_shift_jis_despite_wrong_declaration() {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("該当する資料はありません。検索条件を変更してください。");
        let (text, encoding) = decode_body(&bytes, Some("utf-8"), Charset::Detect);
        assert_eq!(encoding, "Shift_JIS");
        assert!(text.contains("該当する資料はありません"));
    }

    #[test]
    fn test_detects_utf8() {
        let body = "<title>検索結果一覧</title> 在庫： ○";
        let (text, encoding) = decode_body(body.as_bytes(), None, Charset::Detect);
        assert_eq!(encoding, "UTF-8");
        assert_eq!(text, body);
    }

    #[test]
    fn test_declared_charset_is_honored() {
        let (bytes, _, _) = encoding_rs::EUC_JP.encode("在庫あり");
        let (text, encoding) = decode_body(&bytes, Some("euc-jp"), Charset::Declared);
        assert_eq!(encoding, "EUC-JP");
        assert_eq!(text, "在庫あり");
    }

    #[test]
    fn test_unknown_declared_charset_falls_back_to_utf8() {
        let (text, encoding) = decode_body("在庫なし".as_bytes(), Some("x-bogus"), Charset::Declared);
        assert_eq!(encoding, "UTF-8");
        assert_eq!(text, "在庫なし");
    }
}
