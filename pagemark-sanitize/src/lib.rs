//! Regex-based HTML sanitisation for reader-model input.
//!
//! Raw page source is dominated by markup a reader model gets no signal
//! from: scripts, stylesheets, meta/link tags, comments, inline vector
//! graphics, and base64-embedded images. This crate strips that noise with
//! an ordered sequence of pattern substitutions over the raw string. The
//! input is never parsed into a DOM; untrusted pages are routinely
//! malformed and the passes must degrade to "no match" rather than fail.
//!
//! [`clean_html`] is a pure function: no I/O, no shared mutable state,
//! deterministic for identical input, total over all string inputs. The
//! patterns are compiled once and shared read-only across threads.
//!
//! ```
//! use pagemark_sanitize::{clean_html, SanitizeOptions};
//!
//! let page = "<html><head><meta charset=\"utf-8\"><style>body{}</style></head>\
//!             <body><!-- c --><script>x()</script><p>Hi</p></body></html>";
//! let cleaned = clean_html(page, &SanitizeOptions::default());
//! assert_eq!(cleaned, "<html><head></head><body><p>Hi</p></body></html>");
//! ```

use std::sync::OnceLock;

use regex::{NoExpand, Regex};

/// Interior text substituted into masked `<svg>` blocks.
pub const SVG_PLACEHOLDER: &str = "this is a placeholder";

/// `src` value substituted for base64-embedded images.
pub const BASE64_IMG_PLACEHOLDER: &str = "#";

// The five removal passes tolerate stray spaces after `<`, after the
// closing-tag slash, and before `>`, match case-insensitively, and span
// newlines. The two masking passes are case-sensitive on purpose: rendered
// pages emit lowercase `<svg>`/`<img>`.
const SCRIPT_PATTERN: &str = r"(?is)<[ ]*script.*?/[ ]*script[ ]*>";
const STYLE_PATTERN: &str = r"(?is)<[ ]*style.*?/[ ]*style[ ]*>";
const META_PATTERN: &str = r"(?is)<[ ]*meta.*?>";
const COMMENT_PATTERN: &str = r"(?is)<[ ]*!--.*?--[ ]*>";
const LINK_PATTERN: &str = r"(?is)<[ ]*link.*?>";
const BASE64_IMG_PATTERN: &str = r#"<img[^>]+src="data:image/[^;]+;base64,[^"]+"[^>]*>"#;
const SVG_PATTERN: &str = r"(?s)(<svg[^>]*>)(.*?)(</svg>)";

fn removal_passes() -> &'static [Regex; 5] {
    static PASSES: OnceLock<[Regex; 5]> = OnceLock::new();
    PASSES.get_or_init(|| {
        [
            SCRIPT_PATTERN,
            STYLE_PATTERN,
            META_PATTERN,
            COMMENT_PATTERN,
            LINK_PATTERN,
        ]
        .map(|p| Regex::new(p).expect("removal pattern compiles"))
    })
}

fn svg_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SVG_PATTERN).expect("svg pattern compiles"))
}

fn base64_img_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(BASE64_IMG_PATTERN).expect("base64 img pattern compiles"))
}

/// Flags for the two optional masking passes.
///
/// The flags are independent; callers may mask inline SVG without touching
/// base64 images and vice versa. Both default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Replace the interior of `<svg>...</svg>` blocks with a placeholder.
    pub mask_svg: bool,
    /// Collapse `<img src="data:image/...;base64,...">` tags to a stub.
    pub mask_base64: bool,
}

/// Strip noisy markup from raw page source.
///
/// Applies the five removal passes (script, style, meta, comment, link) in
/// order, then the optional masking passes selected by `opts`. Inputs with
/// no matches are returned unchanged; malformed markup is processed as
/// plain text.
pub fn clean_html(html: &str, opts: &SanitizeOptions) -> String {
    let mut out = html.to_string();
    for re in removal_passes() {
        out = re.replace_all(&out, "").into_owned();
    }
    if opts.mask_svg {
        out = replace_svg(&out, SVG_PLACEHOLDER);
    }
    if opts.mask_base64 {
        out = replace_base64_images(&out, BASE64_IMG_PLACEHOLDER);
    }
    out
}

/// [`clean_html`] with both masking passes disabled.
pub fn clean_html_default(html: &str) -> String {
    clean_html(html, &SanitizeOptions::default())
}

/// Replace the interior of every `<svg>...</svg>` block with `new_content`,
/// preserving the opening and closing tags verbatim.
pub fn replace_svg(html: &str, new_content: &str) -> String {
    svg_re()
        .replace_all(html, |caps: &regex::Captures<'_>| {
            format!("{}{}{}", &caps[1], new_content, &caps[3])
        })
        .into_owned()
}

/// Replace every base64-embedded `<img>` tag with a minimal stub pointing
/// at `new_image_src`, discarding all other attributes.
pub fn replace_base64_images(html: &str, new_image_src: &str) -> String {
    let stub = format!("<img src=\"{}\"/>", new_image_src);
    base64_img_re()
        .replace_all(html, NoExpand(&stub))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMBINED: &str = "<html><head><meta charset=\"utf-8\"><style>body{}</style></head><body><!-- c --><script>x()</script><p>Hi</p></body></html>";

    #[test]
    fn removes_all_five_constructs() {
        let cleaned = clean_html_default(COMBINED);
        assert_eq!(cleaned, "<html><head></head><body><p>Hi</p></body></html>");
    }

    #[test]
    fn passthrough_when_nothing_matches() {
        let inputs = [
            "",
            "plain text, no markup at all",
            "<html><body><p>Hi</p></body></html>",
            "<div>unbalanced <span>tags",
        ];
        for input in inputs {
            assert_eq!(clean_html_default(input), input);
        }
    }

    #[test]
    fn five_pass_sequence_is_idempotent() {
        let once = clean_html_default(COMBINED);
        let twice = clean_html_default(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let upper = clean_html_default("<SCRIPT>alert(1)</SCRIPT>ok");
        let lower = clean_html_default("<script>alert(1)</script>ok");
        assert_eq!(upper, "ok");
        assert_eq!(upper, lower);
    }

    #[test]
    fn multiline_style_block_is_one_match() {
        let html = "before<style>\n.a{color:red}\n</style>after";
        assert_eq!(clean_html_default(html), "beforeafter");
    }

    #[test]
    fn tolerates_stray_spaces_in_tags() {
        let html = "< script >x()</ script >text< meta charset=\"utf-8\" >";
        assert_eq!(clean_html_default(html), "text");
    }

    #[test]
    fn removes_comments_spanning_lines() {
        let html = "a<!-- first\nsecond\nthird -->b";
        assert_eq!(clean_html_default(html), "ab");
    }

    #[test]
    fn removes_link_tags() {
        let html = "<link rel=\"stylesheet\" href=\"a.css\"><p>body</p>";
        assert_eq!(clean_html_default(html), "<p>body</p>");
    }

    #[test]
    fn svg_masking_preserves_tags() {
        let html = "<svg viewBox=\"0 0 10 10\"><circle r=\"5\"/></svg>";
        let opts = SanitizeOptions {
            mask_svg: true,
            ..Default::default()
        };
        assert_eq!(
            clean_html(html, &opts),
            "<svg viewBox=\"0 0 10 10\">this is a placeholder</svg>"
        );
    }

    #[test]
    fn svg_masking_handles_multiline_interiors() {
        let html = "<svg>\n<g>\n<path d=\"M0 0\"/>\n</g>\n</svg>";
        let opts = SanitizeOptions {
            mask_svg: true,
            ..Default::default()
        };
        assert_eq!(clean_html(html, &opts), "<svg>this is a placeholder</svg>");
    }

    #[test]
    fn base64_image_collapses_to_stub() {
        let html = "<img alt=\"x\" src=\"data:image/png;base64,AAAA\" width=\"10\">";
        let opts = SanitizeOptions {
            mask_base64: true,
            ..Default::default()
        };
        assert_eq!(clean_html(html, &opts), "<img src=\"#\"/>");
    }

    #[test]
    fn ordinary_images_survive_base64_masking() {
        let html = "<img src=\"https://example.com/a.png\" alt=\"x\">";
        let opts = SanitizeOptions {
            mask_base64: true,
            ..Default::default()
        };
        assert_eq!(clean_html(html, &opts), html);
    }

    #[test]
    fn masking_flags_default_to_off() {
        let html = "<svg><circle/></svg><img src=\"data:image/png;base64,AAAA\">";
        assert_eq!(clean_html_default(html), html);
    }

    #[test]
    fn flags_stay_independent() {
        let html = "<svg><circle/></svg><img src=\"data:image/gif;base64,BBBB\">";

        let svg_only = clean_html(
            html,
            &SanitizeOptions {
                mask_svg: true,
                mask_base64: false,
            },
        );
        assert_eq!(
            svg_only,
            "<svg>this is a placeholder</svg><img src=\"data:image/gif;base64,BBBB\">"
        );

        let base64_only = clean_html(
            html,
            &SanitizeOptions {
                mask_svg: false,
                mask_base64: true,
            },
        );
        assert_eq!(base64_only, "<svg><circle/></svg><img src=\"#\"/>");
    }

    #[test]
    fn custom_replacements_are_honoured() {
        assert_eq!(replace_svg("<svg>x</svg>", "[gone]"), "<svg>[gone]</svg>");
        assert_eq!(
            replace_base64_images("<img src=\"data:image/png;base64,AA\">", "removed.png"),
            "<img src=\"removed.png\"/>"
        );
    }
}
