//! YouTube embed conversion
//!
//! Turns the ways a note can point at a YouTube video into Hugo's
//! `{{< youtube ID >}}` shortcode. Four passes run in a fixed order, each
//! over the output of the previous one:
//!
//! 1. `<iframe src="...">...</iframe>` tags
//! 2. Markdown images `![alt](https://...)`
//! 3. Markdown links `[text](https://...)`
//! 4. Bare YouTube URLs alone on a line, optionally wrapped in `<...>`
//!
//! An occurrence without a recognizable video ID is left byte for byte.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static IFRAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<iframe[^>]*\s+src=(?:"(?P<dq>[^"']+)"|'(?P<sq>[^"']+)')[^>]*>.*?</iframe>"#,
    )
    .unwrap()
});

static MARKDOWN_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.*?\]\((?P<url>https?://[^)]+)\)").unwrap());

static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]\((?P<url>https?://[^)]+)\)").unwrap());

static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*<?(?P<url>https?://(?:www\.)?(?:youtube\.com/watch\?v=[^&\s]+|youtu\.be/[^>\s]+|youtube\.com/embed/[^>\s]+))>?[ \t]*$",
    )
    .unwrap()
});

static WATCH_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]v=([^&\s]+)").unwrap());

static SHORT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([^?&\s/]+)").unwrap());

static EMBED_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtube\.com/embed/([^?&\s/]+)").unwrap());

/// Syntax a video reference was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceForm {
    IframeTag,
    MarkdownImage,
    MarkdownLink,
    BareUrl,
}

impl SurfaceForm {
    /// Pass order. Images go before links so `![..](..)` is never half-matched
    /// as a link once converted.
    pub const PASSES: [SurfaceForm; 4] = [
        SurfaceForm::IframeTag,
        SurfaceForm::MarkdownImage,
        SurfaceForm::MarkdownLink,
        SurfaceForm::BareUrl,
    ];

    fn pattern(self) -> &'static Regex {
        match self {
            SurfaceForm::IframeTag => &*IFRAME_RE,
            SurfaceForm::MarkdownImage => &*MARKDOWN_IMAGE_RE,
            SurfaceForm::MarkdownLink => &*MARKDOWN_LINK_RE,
            SurfaceForm::BareUrl => &*BARE_URL_RE,
        }
    }
}

/// A candidate video reference found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference<'t> {
    pub form: SurfaceForm,
    /// Byte range of the whole matched construct
    pub span: Range<usize>,
    pub url: &'t str,
    pub video_id: Option<&'t str>,
}

/// Pull a YouTube video ID out of a URL.
///
/// Tries `v=` query values, then `youtu.be/ID`, then `youtube.com/embed/ID`.
pub fn extract_youtube_id(url: &str) -> Option<&str> {
    let url = url.trim().trim_matches(['<', '>']);
    if url.is_empty() {
        return None;
    }

    [&*WATCH_ID_RE, &*SHORT_ID_RE, &*EMBED_ID_RE]
        .into_iter()
        .find_map(|re| re.captures(url).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
}

/// Hugo shortcode for a video ID
pub fn shortcode(video_id: &str) -> String {
    format!("{{{{< youtube {video_id} >}}}}")
}

/// Every match of one surface form in `text`, with its extracted ID if any
pub fn find_video_references(text: &str, form: SurfaceForm) -> Vec<VideoReference<'_>> {
    form.pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let url = ["url", "dq", "sq"]
                .iter()
                .find_map(|name| caps.name(name))?
                .as_str();
            Some(VideoReference {
                form,
                span: whole.range(),
                url,
                video_id: extract_youtube_id(url),
            })
        })
        .collect()
}

/// Run a single pass, replacing each reference that has an ID
pub fn convert_pass(text: &str, form: SurfaceForm) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for reference in find_video_references(text, form) {
        let Some(id) = reference.video_id else {
            continue;
        };
        out.push_str(&text[last..reference.span.start]);
        out.push_str(&shortcode(id));
        last = reference.span.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Convert every YouTube iframe, link, image link and bare URL in `text`
pub fn convert_video_embeds(text: &str) -> String {
    SurfaceForm::PASSES
        .into_iter()
        .fold(text.to_string(), |current, form| convert_pass(&current, form))
}
