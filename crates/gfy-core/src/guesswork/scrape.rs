//! Locate the poster image of the item page's main video element.

use scraper::{Html, Selector};

use crate::error::{Error, Result};

/// CSS selector of the main `<video class="video media">` element.
///
/// Tied to the site's markup, which changes without notice; overridable via
/// `[scrape] video_selector`.
pub const DEFAULT_VIDEO_SELECTOR: &str = "video.video.media";

/// `poster` attribute of the first element matching `selector` in `html`.
pub fn poster_from_html(html: &str, selector: &str) -> Result<String> {
    let video_selector = Selector::parse(selector)
        .map_err(|e| Error::Config(format!("invalid video selector {:?}: {:?}", selector, e)))?;

    let document = Html::parse_document(html);
    let video = document
        .select(&video_selector)
        .next()
        .ok_or_else(|| Error::Parse(format!("no video element matching {:?}", selector)))?;

    video
        .value()
        .attr("poster")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .ok_or_else(|| Error::Parse("no poster on video element".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_poster_of_main_video() {
        let html = r#"<html><body>
            <video class="preview" poster="https://thumbs.gfycat.com/Other-poster.jpg"></video>
            <div><video class="video media" poster="https://thumbs.gfycat.com/AbcXyz-mobile.jpg">
                <source src="https://giant.gfycat.com/AbcXyz.webm" type="video/webm">
            </video></div>
        </body></html>"#;
        assert_eq!(
            poster_from_html(html, DEFAULT_VIDEO_SELECTOR).unwrap(),
            "https://thumbs.gfycat.com/AbcXyz-mobile.jpg"
        );
    }

    #[test]
    fn missing_video_is_parse_error() {
        let html = r#"<html><body><img src="x.jpg"></body></html>"#;
        let err = poster_from_html(html, DEFAULT_VIDEO_SELECTOR).unwrap_err();
        assert!(matches!(err, Error::Parse(ref m) if m.contains("no video element")));
    }

    #[test]
    fn missing_or_empty_poster_is_parse_error() {
        for html in [
            r#"<video class="video media"></video>"#,
            r#"<video class="video media" poster=""></video>"#,
        ] {
            let err = poster_from_html(html, DEFAULT_VIDEO_SELECTOR).unwrap_err();
            assert!(matches!(err, Error::Parse(ref m) if m.contains("no poster")));
        }
    }

    #[test]
    fn custom_selector() {
        let html = r#"<video id="player" poster="https://thumbs.gfycat.com/Abc-poster.jpg"></video>"#;
        assert_eq!(
            poster_from_html(html, "video#player").unwrap(),
            "https://thumbs.gfycat.com/Abc-poster.jpg"
        );
        assert!(matches!(
            poster_from_html(html, "video[["),
            Err(Error::Config(_))
        ));
    }
}
