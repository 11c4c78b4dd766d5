// libs/domain/signatures/src/normalizer.rs
// =================================================================
// APARATO: NORMALIZADOR DE CUERPO DE MENSAJE
// RESPONSABILIDAD: CANONICALIZAR TEXTO/HTML PARA QUE EL DIGEST DIFUSO
// SOBREVIVA MUTACIONES TRIVIALES POR DESTINATARIO
// =================================================================

use once_cell::sync::Lazy;
use regex::Regex;

static IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*>").unwrap());
static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bsrc\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap());
static HEX_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9a-fA-F]{8,}").unwrap());
static DECIMAL_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{6,}").unwrap());
static STYLE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\s+style\s*=\s*("[^"]*"|'[^']*')"#).unwrap());
static TRACKING_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([?&])(utm_[a-zA-Z0-9_]+|gclid|fbclid|mc_eid|mc_cid)=[^&\s"'<>]*"#).unwrap()
});
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Produces the canonical byte string the fingerprint engine hashes, by
/// running the nine ordered transformations over `text` and `html`. Each
/// step is idempotent; running the function twice over its own output is a
/// no-op.
pub fn normalize(text: &str, html: &str) -> String {
    let mut s = format!("{text}\n\n{html}").trim().to_string();

    s = replace_img_src(&s);
    s = HEX_RUN.replace_all(&s, "****").into_owned();
    s = DECIMAL_RUN.replace_all(&s, "****").into_owned();
    s = STYLE_ATTR.replace_all(&s, "").into_owned();
    s = strip_tracking_params(&s);
    s = s.to_lowercase();
    s = SPACE_RUN.replace_all(&s, " ").into_owned();
    s = BLANK_LINE_RUN.replace_all(&s, "\n\n").into_owned();

    s
}

fn replace_img_src(input: &str) -> String {
    IMG_TAG
        .replace_all(input, |caps: &regex::Captures| {
            let tag = &caps[0];
            IMG_SRC.replace(tag, "src=\"imgurl\"").into_owned()
        })
        .into_owned()
}

fn strip_tracking_params(input: &str) -> String {
    // Repeated passes handle adjacent tracking params chained by the
    // separator the previous match left behind.
    let mut s = input.to_string();
    loop {
        let next = TRACKING_PARAM.replace_all(&s, "$1").into_owned();
        if next == s {
            return next;
        }
        s = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_and_trims() {
        let out = normalize("  hello  ", "world  ");
        assert_eq!(out, "hello\n\nworld");
    }

    #[test]
    fn replaces_img_src_preserving_other_attrs() {
        let html = r#"<img width="10" src="https://evil.example/track.png?x=1" alt="pic">"#;
        let out = normalize("", html);
        assert!(out.contains(r#"src="imgurl""#));
        assert!(out.contains("width=\"10\""));
        assert!(out.contains("alt=\"pic\""));
        assert!(!out.contains("evil.example"));
    }

    #[test]
    fn masks_long_hex_and_decimal_runs() {
        let out = normalize("id deadbeefcafe00 and 1234567", "");
        assert!(out.contains("****"));
        assert!(!out.contains("deadbeefcafe00"));
        assert!(!out.contains("1234567"));
    }

    #[test]
    fn drops_style_attributes() {
        let html = r#"<div style="color:red;">hi</div>"#;
        let out = normalize("", html);
        assert!(!out.contains("style="));
    }

    #[test]
    fn strips_tracking_params_but_keeps_separator() {
        let text = "visit https://x.example/?utm_source=news&id=9";
        let out = normalize(text, "");
        assert!(!out.contains("utm_source"));
        assert!(out.contains("id=9"));
    }

    #[test]
    fn lowercases_and_collapses_whitespace() {
        let out = normalize("HELLO   \t WORLD", "");
        assert_eq!(out, "hello world");
    }

    #[test]
    fn collapses_long_blank_line_runs() {
        let out = normalize("a\n\n\n\n\nb", "");
        assert_eq!(out, "a\n\nb");
    }

    #[test]
    fn is_idempotent() {
        let once = normalize("HELLO <img src=\"http://x/y.png\"> 123456789", "more text");
        let twice = normalize(&once, "");
        assert_eq!(once.trim(), twice.trim());
    }
}
