//! Images, video, audio and embedded content.

use serde_json::{Value, json};

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::output::ElementNode;
use crate::processors::set;

/// `<img>` and `<picture>` → `image`.
pub struct ImageProcessor;

impl ElementProcessor for ImageProcessor {
    fn name(&self) -> &'static str {
        "image"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(&["img", "picture"])
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        ProcessorResult::Leaf(image_node(view, ctx))
    }
}

/// `image {image {url, external}, altText, loading?}` for an `<img>`, or for
/// the `<img>` inside a `<picture>`.
pub(crate) fn image_node(view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ElementNode {
    let img = if view.tag() == "picture" {
        view.tree
            .descendants(view.node)
            .find(|&n| view.tree.is_tag(n, "img"))
            .and_then(|n| view.view_of(n))
    } else {
        Some(view)
    };

    let mut node = ctx.node("image", view.node);
    let url = img
        .and_then(|i| i.attr("src").or_else(|| i.attr("data-src")))
        .or_else(|| first_source(view, "srcset"))
        .unwrap_or_default();
    set(&mut node, "image", json!({ "url": url, "external": true }));
    if let Some(alt) = img.and_then(|i| i.attr("alt")) {
        set(&mut node, "altText", alt);
    }
    if let Some(loading) = img.and_then(|i| i.attr("loading")) {
        set(&mut node, "loading", loading);
    }
    node
}

/// `attr` of the first `<source>` child, up to the first space (for
/// `srcset` candidates).
fn first_source<'a>(view: ElementView<'a>, attr: &str) -> Option<&'a str> {
    view.tree
        .element_children(view.node)
        .filter_map(|n| view.view_of(n))
        .find(|c| c.tag() == "source")
        .and_then(|c| c.attr(attr))
        .and_then(|v| v.split_whitespace().next())
}

/// Boolean media attributes, set only when present.
fn media_flags(view: ElementView<'_>, node: &mut ElementNode, flags: &[&str]) {
    for &flag in flags {
        if view.has_attr(flag) {
            set(node, flag, true);
        }
    }
}

/// `<video>` → `video {videoType: "media", media {url}, ...}`.
pub struct VideoProcessor;

impl ElementProcessor for VideoProcessor {
    fn name(&self) -> &'static str {
        "video"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "video"
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let mut node = ctx.node("video", view.node);
        let url = view
            .attr("src")
            .or_else(|| first_source(view, "src"))
            .unwrap_or_default();
        set(&mut node, "videoType", "media");
        set(&mut node, "media", json!({ "url": url }));
        media_flags(view, &mut node, &["autoplay", "loop", "muted", "controls"]);
        if let Some(poster) = view.attr("poster") {
            set(&mut node, "poster", poster);
        }
        ProcessorResult::Leaf(node)
    }
}

/// `<audio>` → `audio {file {url}, controls, autoplay, loop}`.
pub struct AudioProcessor;

impl ElementProcessor for AudioProcessor {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "audio"
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let mut node = ctx.node("audio", view.node);
        let url = view
            .attr("src")
            .or_else(|| first_source(view, "src"))
            .unwrap_or_default();
        set(&mut node, "file", json!({ "url": url }));
        media_flags(view, &mut node, &["controls", "autoplay", "loop"]);
        ProcessorResult::Leaf(node)
    }
}

/// `<iframe>` → `video` for YouTube and Vimeo, `code` otherwise. `<canvas>`,
/// `<object>` and `<embed>` → `code`.
pub struct EmbedProcessor;

impl ElementProcessor for EmbedProcessor {
    fn name(&self) -> &'static str {
        "embed"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(&["iframe", "canvas", "object", "embed"])
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let provider = if view.tag() == "iframe" {
            view.attr("src").and_then(video_provider)
        } else {
            None
        };
        let node = match provider {
            Some((video_type, id_key, id)) => {
                let mut node = ctx.node("video", view.node);
                set(&mut node, "videoType", video_type);
                set(&mut node, id_key, id);
                node
            }
            None => code_node(view, ctx),
        };
        ProcessorResult::Leaf(node)
    }
}

/// `code {code}` holding the element's markup.
pub(crate) fn code_node(view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ElementNode {
    let mut node = ctx.node("code", view.node);
    set(&mut node, "code", Value::String(view.outer_html()));
    node
}

/// `(videoType, id setting, id)` for a YouTube or Vimeo embed URL.
pub(crate) fn video_provider(url: &str) -> Option<(&'static str, &'static str, String)> {
    const YOUTUBE: &[&str] = &[
        "youtube.com/embed/",
        "youtube-nocookie.com/embed/",
        "youtu.be/",
        "youtube.com/watch?v=",
    ];
    for marker in YOUTUBE {
        if let Some(id) = id_after(url, marker) {
            return Some(("youtube", "youTubeId", id));
        }
    }
    for marker in ["player.vimeo.com/video/", "vimeo.com/"] {
        if let Some(id) = id_after(url, marker).filter(|id| id.chars().all(|c| c.is_ascii_digit())) {
            return Some(("vimeo", "vimeoId", id));
        }
    }
    None
}

fn id_after(url: &str, marker: &str) -> Option<String> {
    let start = url.find(marker)? + marker.len();
    let id: String = url[start..]
        .chars()
        .take_while(|c| !matches!(c, '?' | '&' | '/' | '#'))
        .collect();
    (!id.is_empty()).then_some(id)
}
