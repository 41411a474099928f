//! Block transformation: rewrite WordPress block markup into linear text.
//!
//! ## Pass Order
//!
//! Passes run in a fixed order because the early ones match on the block
//! sentinels (`<!-- wp:quote -->`, `<!-- wp:embed {...} -->`, ...) that pass 5
//! deletes:
//!
//! 1. Repair newlines (see [`super::newlines`])
//! 2. Delete quote blocks and raw social embeds
//! 3. Replace video embed blocks with numbered placeholders
//! 4. Replace gallery and image blocks with image directives
//! 5. Strip the remaining block sentinels
//! 6. Strip leftover `<figure>` containers
//! 7. Horizontal rules → `---`
//! 8. Headings → `#` lines, emphasis removed
//! 9. Lists → `1.` / `-` lines, each item inline-formatted
//! 10. Paragraphs → bare lines, empty ones dropped
//!
//! Every pass is a regex rewrite that leaves non-matching text alone, so
//! malformed markup survives as residual text instead of failing the run.

use super::images::{ImageLocator, ImageResolution};
use super::inline::{format_inline, strip_tags};
use super::media::{video_url, MediaRefs};
use super::newlines::fix_newlines;
use super::placeholders::video_placeholder;
use crate::output::MigrationStats;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// Rewrite the block structure of `raw`.
///
/// `media` must come from [`super::media::extract_media`] over the same
/// document; video blocks are paired with `media.videos` by position.
/// Image outcomes are counted into `stats`.
pub fn transform_blocks(
    raw: &str,
    media: &MediaRefs,
    locator: &ImageLocator<'_>,
    stats: &mut MigrationStats,
) -> String {
    let s = fix_newlines(raw);
    let s = remove_quote_blocks(&s);
    let s = replace_video_blocks(&s, &media.videos);
    let s = replace_image_blocks(&s, locator, stats);
    let s = strip_block_comments(&s);
    let s = strip_figures(&s);
    let s = convert_rules(&s);
    let s = convert_headings(&s);
    let s = convert_lists(&s);
    unwrap_paragraphs(&s)
}

// ── Pass 2: Quote blocks and social embeds ───────────────────────────────────

static RE_QUOTE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--\s*wp:quote\b[^>]*?-->.*?<!--\s*/wp:quote\s*-->").unwrap()
});

static RE_SOCIAL_BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<blockquote\b[^>]*\binstagram-media\b[^>]*>.*?</blockquote\s*>"#).unwrap()
});

static RE_SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<script\b[^>]*>.*?</script\s*>").unwrap());

fn remove_quote_blocks(input: &str) -> String {
    let s = RE_QUOTE_BLOCK.replace_all(input, "");
    let s = RE_SOCIAL_BLOCKQUOTE.replace_all(&s, "");
    RE_SCRIPT.replace_all(&s, "").into_owned()
}

// ── Pass 3: Video embeds ─────────────────────────────────────────────────────

/// Whole embed block; group 1 is the descriptor, nested objects included.
static RE_EMBED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--\s*wp:embed\b([^>]*?)-->.*?<!--\s*/wp:embed\s*-->").unwrap()
});

/// Hands out placeholder slots in document order for one document.
struct VideoSlots {
    available: usize,
    next: usize,
}

impl VideoSlots {
    fn take(&mut self) -> Option<usize> {
        let idx = self.next;
        self.next += 1;
        (idx < self.available).then_some(idx)
    }
}

fn replace_video_blocks(input: &str, videos: &[String]) -> String {
    let mut slots = VideoSlots {
        available: videos.len(),
        next: 0,
    };
    let out = RE_EMBED_BLOCK.replace_all(input, |caps: &Captures<'_>| {
        if video_url(&caps[1]).is_none() {
            return caps[0].to_string();
        }
        match slots.take() {
            Some(idx) => format!("\n\n{}\n\n", video_placeholder(idx)),
            None => String::new(),
        }
    });
    if slots.next > slots.available {
        debug!(
            "Dropped {} video block(s) without an extracted URL",
            slots.next - slots.available
        );
    }
    out.into_owned()
}

// ── Pass 4: Images and galleries ─────────────────────────────────────────────

static RE_GALLERY_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--\s*wp:gallery\b[^>]*?-->(.*?)<!--\s*/wp:gallery\s*-->").unwrap()
});

static RE_IMAGE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--\s*wp:image\b[^>]*?-->(.*?)<!--\s*/wp:image\s*-->").unwrap()
});

/// An `<img>` with its optional link close and figcaption.
static RE_IMG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)<img\b([^>]*)>(?:\s*</a\s*>)?(?:\s*<figcaption\b[^>]*>(.*?)</figcaption\s*>)?",
    )
    .unwrap()
});

static RE_SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bsrc\s*=\s*"([^"]*)""#).unwrap());
static RE_ALT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\balt\s*=\s*"([^"]*)""#).unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn replace_image_blocks(
    input: &str,
    locator: &ImageLocator<'_>,
    stats: &mut MigrationStats,
) -> String {
    // Galleries first: they wrap their own wp:image blocks.
    let s = RE_GALLERY_BLOCK.replace_all(input, |caps: &Captures<'_>| {
        render_images(&caps[1], locator, stats)
    });
    RE_IMAGE_BLOCK
        .replace_all(&s, |caps: &Captures<'_>| {
            render_images(&caps[1], locator, stats)
        })
        .into_owned()
}

/// Emit one image directive per located `<img>` in `fragment`.
fn render_images(
    fragment: &str,
    locator: &ImageLocator<'_>,
    stats: &mut MigrationStats,
) -> String {
    let mut out = String::new();
    for caps in RE_IMG.captures_iter(fragment) {
        let attrs = &caps[1];
        let Some(src) = RE_SRC.captures(attrs).map(|c| decode(&c[1])) else {
            stats.images_unmapped += 1;
            continue;
        };
        match locator.locate(&src) {
            ImageResolution::Resolved(path) => {
                let caption = caps
                    .get(2)
                    .map(|m| caption_text(m.as_str()))
                    .filter(|c| !c.is_empty())
                    .or_else(|| RE_ALT.captures(attrs).map(|c| caption_text(&c[1])))
                    .unwrap_or_default();
                out.push_str(&format!("\n\n![{caption}]({path})\n\n"));
                stats.images_embedded += 1;
            }
            ImageResolution::Unmapped => {
                debug!("Skipping unmapped image {src}");
                stats.images_unmapped += 1;
            }
            ImageResolution::LeadImage => {
                debug!("Skipping image {src}: duplicates the lead image");
                stats.images_lead_duplicate += 1;
            }
        }
    }
    out
}

fn decode(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}

/// Single-line plain caption text.
fn caption_text(raw: &str) -> String {
    let plain = strip_tags(&decode(&strip_tags(raw)));
    RE_WHITESPACE.replace_all(plain.trim(), " ").into_owned()
}

// ── Pass 5: Block sentinels ──────────────────────────────────────────────────

/// Only the sentinel itself: the blank lines that passes 3 and 4 put around
/// their output must survive even when blocks were written back to back.
static RE_BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--\s*/?wp:\w[^>]*?-->").unwrap());

fn strip_block_comments(input: &str) -> String {
    RE_BLOCK_COMMENT.replace_all(input, "").into_owned()
}

// ── Pass 6: Leftover figures ─────────────────────────────────────────────────

static RE_FIGURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<figure\b[^>]*>.*?</figure\s*>").unwrap());

fn strip_figures(input: &str) -> String {
    RE_FIGURE.replace_all(input, "").into_owned()
}

// ── Pass 7: Horizontal rules ─────────────────────────────────────────────────

static RE_HR: Lazy<Regex> = Lazy::new(|| Regex::new(r"<hr\b[^>]*>").unwrap());

fn convert_rules(input: &str) -> String {
    RE_HR.replace_all(input, "\n---\n").into_owned()
}

// ── Pass 8: Headings ─────────────────────────────────────────────────────────

static RE_HEADINGS: Lazy<Vec<Regex>> = Lazy::new(|| {
    (1..=6)
        .map(|level| {
            Regex::new(&format!(r"(?s)<h{level}\b[^>]*>(.*?)</h{level}\s*>")).unwrap()
        })
        .collect()
});

static RE_EMPHASIS_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?(?:strong|b|em|i)(?:\s[^>]*)?>").unwrap());

fn convert_headings(input: &str) -> String {
    let mut text = input.to_string();
    for (i, re) in RE_HEADINGS.iter().enumerate() {
        let hashes = "#".repeat(i + 1);
        text = re
            .replace_all(&text, |caps: &Captures<'_>| {
                let inner = RE_EMPHASIS_TAG.replace_all(&caps[1], "");
                let inner = inner.trim();
                if inner.is_empty() {
                    String::new()
                } else {
                    format!("\n{hashes} {inner}\n")
                }
            })
            .into_owned();
    }
    text
}

// ── Pass 9: Lists ────────────────────────────────────────────────────────────

static RE_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<(ul|ol)\b[^>]*>(.*?)</(?:ul|ol)\s*>").unwrap());

static RE_LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<li\b[^>]*>(.*?)</li\s*>").unwrap());

fn convert_lists(input: &str) -> String {
    RE_LIST
        .replace_all(input, |caps: &Captures<'_>| {
            let ordered = &caps[1] == "ol";
            let mut out = String::from("\n");
            let items = RE_LIST_ITEM
                .captures_iter(&caps[2])
                .map(|item| format_inline(item[1].trim()))
                .filter(|item| !item.trim().is_empty());
            for (i, item) in items.enumerate() {
                let marker = if ordered {
                    format!("{}. ", i + 1)
                } else {
                    "- ".to_string()
                };
                let indent = " ".repeat(marker.len());
                let body = item
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .collect::<Vec<_>>()
                    .join(&format!("\n{indent}"));
                out.push_str(&marker);
                out.push_str(&body);
                out.push('\n');
            }
            out.push('\n');
            out
        })
        .into_owned()
}

// ── Pass 10: Paragraphs ──────────────────────────────────────────────────────

static RE_PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<p\b[^>]*>(.*?)</p\s*>").unwrap());

fn unwrap_paragraphs(input: &str) -> String {
    RE_PARAGRAPH
        .replace_all(input, |caps: &Captures<'_>| {
            let inner = caps[1].trim();
            if format_inline(inner).trim().is_empty() {
                String::new()
            } else {
                format!("\n{inner}\n")
            }
        })
        .into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageMap;
    use crate::pipeline::placeholders::collapse_newlines;

    fn run(raw: &str, media: &MediaRefs, map: &ImageMap, lead: &str) -> (String, MigrationStats) {
        let mut stats = MigrationStats::default();
        let locator = ImageLocator::new(map, lead);
        let out = transform_blocks(raw, media, &locator, &mut stats);
        (out, stats)
    }

    #[test]
    fn test_quote_block_removed() {
        let raw = "<!-- wp:quote --><blockquote class=\"wp-block-quote\"><p><a href=\"https://www.instagram.com/reel/X/\"></a></p></blockquote><!-- /wp:quote -->";
        let (out, _) = run(raw, &MediaRefs::default(), &ImageMap::default(), "");
        assert!(out.trim().is_empty(), "got: {out:?}");
    }

    #[test]
    fn test_instagram_blockquote_and_script_removed() {
        let raw = r#"<blockquote class="instagram-media" data-instgrm-permalink="x"><div>View</div></blockquote><script async src="//www.instagram.com/embed.js"></script><p>after</p>"#;
        let (out, _) = run(raw, &MediaRefs::default(), &ImageMap::default(), "");
        assert_eq!(out.trim(), "after");
    }

    #[test]
    fn test_video_blocks_get_placeholders_in_order() {
        let block = |id: &str| {
            format!(
                r#"<!-- wp:embed {{"url":"https://youtu.be/{id}","providerNameSlug":"youtube"}} --><figure class="wp-block-embed"><div>https://youtu.be/{id}</div></figure><!-- /wp:embed -->"#
            )
        };
        let raw = format!("{}{}{}", block("a"), block("b"), block("c"));
        let media = MediaRefs {
            videos: vec!["https://youtu.be/a".into(), "https://youtu.be/b".into()],
            social: vec![],
        };
        let (out, _) = run(&raw, &media, &ImageMap::default(), "");
        assert!(out.contains(&video_placeholder(0)));
        assert!(out.contains(&video_placeholder(1)));
        assert!(!out.contains(&video_placeholder(2)));
        assert!(!out.contains("youtu.be"));
    }

    #[test]
    fn test_nested_descriptor_keeps_video_order() {
        let raw = concat!(
            r#"<!-- wp:embed {"url":"https://youtu.be/a","style":{"spacing":{"margin":"0"}}} -->"#,
            r#"<figure class="wp-block-embed"><div>https://youtu.be/a</div></figure><!-- /wp:embed -->"#,
            r#"<!-- wp:embed {"url":"https://youtu.be/b"} -->"#,
            r#"<figure class="wp-block-embed"><div>https://youtu.be/b</div></figure><!-- /wp:embed -->"#,
        );
        let media = crate::pipeline::media::extract_media(raw);
        assert_eq!(media.videos.len(), 2);
        let (out, _) = run(raw, &media, &ImageMap::default(), "");
        let first = out.find(&video_placeholder(0)).expect("first placeholder");
        let second = out.find(&video_placeholder(1)).expect("second placeholder");
        assert!(first < second);
    }

    #[test]
    fn test_back_to_back_blocks_keep_blank_lines() {
        let raw = concat!(
            r#"<!-- wp:paragraph --><p>Hello</p><!-- /wp:paragraph -->"#,
            r#"<!-- wp:image --><figure><img src="https://s.com/a.jpg"/><figcaption>Cap</figcaption></figure><!-- /wp:image -->"#,
            r#"<!-- wp:paragraph --><p>Mid</p><!-- /wp:paragraph -->"#,
        );
        let map = ImageMap::from_pairs([("a.jpg", "/i/a.jpg")]);
        let (out, _) = run(raw, &MediaRefs::default(), &map, "");
        assert_eq!(collapse_newlines(&out), "Hello\n\n![Cap](/i/a.jpg)\n\nMid");
    }

    #[test]
    fn test_non_video_embed_stripped() {
        let raw = r#"<!-- wp:embed {"url":"https://twitter.com/x/status/1"} --><figure class="wp-block-embed"><div>https://twitter.com/x/status/1</div></figure><!-- /wp:embed -->"#;
        let (out, _) = run(raw, &MediaRefs::default(), &ImageMap::default(), "");
        assert!(out.trim().is_empty(), "got: {out:?}");
    }

    #[test]
    fn test_image_block_with_caption() {
        let raw = r#"<!-- wp:image {"id":5} --><figure class="wp-block-image"><img src="https://site.com/wp-content/uploads/plan.jpg" alt="alt text"/><figcaption class="wp-element-caption">Site <em>plan</em></figcaption></figure><!-- /wp:image -->"#;
        let map = ImageMap::from_pairs([("plan.jpg", "/images/p/plan.jpg")]);
        let (out, stats) = run(raw, &MediaRefs::default(), &map, "");
        assert_eq!(out.trim(), "![Site plan](/images/p/plan.jpg)");
        assert_eq!(stats.images_embedded, 1);
    }

    #[test]
    fn test_image_caption_falls_back_to_alt() {
        let raw = r#"<!-- wp:image --><figure><a href="https://site.com/big.jpg"><img src="https://site.com/plan.jpg" alt="Ground floor"/></a></figure><!-- /wp:image -->"#;
        let map = ImageMap::from_pairs([("plan.jpg", "/images/p/plan.jpg")]);
        let (out, _) = run(raw, &MediaRefs::default(), &map, "");
        assert_eq!(out.trim(), "![Ground floor](/images/p/plan.jpg)");
    }

    #[test]
    fn test_image_lead_and_unmapped_skipped() {
        let raw = r#"<!-- wp:image --><figure><img src="https://site.com/hero.jpg"/></figure><!-- /wp:image --><!-- wp:image --><figure><img src="https://site.com/unknown.jpg"/></figure><!-- /wp:image -->"#;
        let map = ImageMap::from_pairs([("hero.jpg", "/images/x/hero.jpg")]);
        let (out, stats) = run(raw, &MediaRefs::default(), &map, "/images/x/hero.jpg");
        assert!(out.trim().is_empty(), "got: {out:?}");
        assert_eq!(stats.images_lead_duplicate, 1);
        assert_eq!(stats.images_unmapped, 1);
    }

    #[test]
    fn test_gallery_expands_in_order() {
        let raw = r#"<!-- wp:gallery {"linkTo":"none"} --><figure class="wp-block-gallery has-nested-images"><!-- wp:image {"id":1} --><figure class="wp-block-image"><img src="https://s.com/a.jpg" alt=""/></figure><!-- /wp:image --><!-- wp:image {"id":2} --><figure class="wp-block-image"><img src="https://s.com/b.jpg" alt=""/><figcaption>Second</figcaption></figure><!-- /wp:image --><figcaption class="blocks-gallery-caption">Gallery</figcaption></figure><!-- /wp:gallery -->"#;
        let map = ImageMap::from_pairs([("a.jpg", "/i/a.jpg"), ("b.jpg", "/i/b.jpg")]);
        let (out, stats) = run(raw, &MediaRefs::default(), &map, "");
        let a = out.find("![](/i/a.jpg)").expect("first image");
        let b = out.find("![Second](/i/b.jpg)").expect("second image");
        assert!(a < b);
        assert!(!out.contains("Gallery"));
        assert_eq!(stats.images_embedded, 2);
    }

    #[test]
    fn test_leftover_figure_stripped() {
        let raw = r#"<figure class="wp-block-table"><table><tr><td>x</td></tr></table></figure><p>kept</p>"#;
        let (out, _) = run(raw, &MediaRefs::default(), &ImageMap::default(), "");
        assert_eq!(out.trim(), "kept");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(convert_rules("a<hr class=\"wp-block-separator\"/>b"), "a\n---\nb");
    }

    #[test]
    fn test_heading_emphasis_stripped() {
        assert_eq!(
            convert_headings("<h3 class=\"x\"><strong>Big</strong> <em>idea</em></h3>"),
            "\n### Big idea\n"
        );
    }

    #[test]
    fn test_ordered_list() {
        let out = convert_lists("<ol><li>one</li><li><strong>two</strong></li><li>three</li></ol>");
        assert_eq!(out, "\n1. one\n2. **two**\n3. three\n\n");
    }

    #[test]
    fn test_unordered_list_with_link() {
        let out = convert_lists(r#"<ul class="wp-block-list"><li><a href="/a">A</a></li><li>B</li></ul>"#);
        assert_eq!(out, "\n- [A](/a)\n- B\n\n");
    }

    #[test]
    fn test_list_item_break_indented() {
        let out = convert_lists("<ol><li>first<br>more</li></ol>");
        assert_eq!(out, "\n1. first\n   more\n\n");
    }

    #[test]
    fn test_empty_paragraph_dropped() {
        assert_eq!(unwrap_paragraphs("<p>  </p><p>&nbsp;</p><p><br></p>"), "");
        assert_eq!(unwrap_paragraphs("<p class=\"x\"> hi </p>"), "\nhi\n");
    }

    #[test]
    fn test_paragraph_does_not_match_pre() {
        assert_eq!(unwrap_paragraphs("<pre>code</pre>"), "<pre>code</pre>");
    }

    #[test]
    fn test_unterminated_block_left_alone() {
        let raw = "<!-- wp:quote --><blockquote><p>never closed</p></blockquote>";
        let (out, _) = run(raw, &MediaRefs::default(), &ImageMap::default(), "");
        assert!(out.contains("never closed"));
    }
}
