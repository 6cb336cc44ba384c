//! Display text: status text with shortened links swapped for their display
//! form.

use crate::model::{EntityType, TweetEntity};

/// Rebuild `text` with each URL entity's range replaced by its display form.
///
/// Ranges are code-point positions in `text`. Entities must be ordered by
/// start and non-overlapping, which the entity extractor guarantees; any that
/// are not, and any non-URL entity, are skipped rather than mangling the text.
#[must_use]
pub fn display_text(text: &str, urls: Option<&[TweetEntity]>) -> String {
    let Some(urls) = urls.filter(|urls| !urls.is_empty()) else {
        return text.to_string();
    };

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 32);
    let mut cursor = 0;

    for entity in urls {
        if entity.kind() != EntityType::Url
            || entity.start < cursor
            || entity.end > chars.len()
            || entity.start > entity.end
        {
            continue;
        }
        out.extend(&chars[cursor..entity.start]);
        out.push_str(&entity.display_form());
        cursor = entity.end;
    }
    if cursor < chars.len() {
        out.extend(&chars[cursor..]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityPayload;

    fn url(start: usize, end: usize, display: &str) -> TweetEntity {
        TweetEntity {
            start,
            end,
            payload: EntityPayload::Url {
                url: "http://t.co/abcdefghijk".into(),
                display_url: Some(display.into()),
                expanded_url: None,
            },
        }
    }

    #[test]
    fn no_entities_returns_text() {
        assert_eq!(display_text("plain", None), "plain");
        assert_eq!(display_text("plain", Some(&[])), "plain");
    }

    #[test]
    fn replaces_single_url() {
        let text = "See: http://t.co/abcdefghijk here";
        let entities = [url(5, 28, "example.com")];
        assert_eq!(display_text(text, Some(&entities)), "See: example.com here");
    }

    #[test]
    fn replaces_consecutive_urls_and_keeps_suffix() {
        let text = "a http://t.co/1 b http://t.co/2 c";
        let entities = [url(2, 15, "one.com"), url(18, 31, "two.com")];
        assert_eq!(display_text(text, Some(&entities)), "a one.com b two.com c");
    }

    #[test]
    fn url_at_end_of_text() {
        let text = "go http://t.co/1";
        let entities = [url(3, 16, "one.com")];
        assert_eq!(display_text(text, Some(&entities)), "go one.com");
    }

    #[test]
    fn ignores_non_url_entities() {
        let text = "#tag http://t.co/1";
        let entities = [
            TweetEntity {
                start: 0,
                end: 4,
                payload: EntityPayload::Hashtag { tag: "tag".into() },
            },
            url(5, 18, "one.com"),
        ];
        assert_eq!(display_text(text, Some(&entities)), "#tag one.com");
    }

    #[test]
    fn counts_code_points_not_bytes() {
        let text = "🦀 http://t.co/1 ✓";
        let entities = [url(2, 15, "one.com")];
        assert_eq!(display_text(text, Some(&entities)), "🦀 one.com ✓");
    }
}
