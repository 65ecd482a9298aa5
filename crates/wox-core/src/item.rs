//! Result item types delivered by query producers.
//!
//! Field names follow the PascalCase wire format used between the launcher
//! core and its UI, so items can be decoded straight from a response
//! message.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the bytes in [`WoxImage::image_data`] should be interpreted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Inline SVG markup.
    #[default]
    Svg,
    /// Remote or local URL.
    Url,
    /// `data:` URI with base64 payload.
    Base64,
}

/// Icon attached to a result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct WoxImage {
    pub image_type: ImageType,
    pub image_data: String,
}

impl WoxImage {
    /// Create an SVG icon.
    pub fn svg(data: impl Into<String>) -> Self {
        Self {
            image_type: ImageType::Svg,
            image_data: data.into(),
        }
    }

    /// Create a URL icon.
    pub fn url(data: impl Into<String>) -> Self {
        Self {
            image_type: ImageType::Url,
            image_data: data.into(),
        }
    }
}

/// Preview payload for the selected result.
///
/// An empty `preview_type` means the result has nothing to preview. The
/// default value doubles as the sentinel returned when nothing is selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Preview {
    #[serde(default)]
    pub preview_type: String,
    #[serde(default)]
    pub preview_data: String,
    #[serde(default)]
    pub preview_properties: HashMap<String, String>,
}

impl Preview {
    /// Create a preview with a type and payload.
    pub fn new(preview_type: impl Into<String>, preview_data: impl Into<String>) -> Self {
        Self {
            preview_type: preview_type.into(),
            preview_data: preview_data.into(),
            preview_properties: HashMap::new(),
        }
    }

    /// Whether there is anything to show in a preview pane.
    pub fn is_empty(&self) -> bool {
        self.preview_type.is_empty()
    }
}

/// An action that can be invoked on a result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ResultAction {
    /// Identifier echoed back to the producer when the action runs.
    pub id: String,

    /// Display text.
    #[serde(default)]
    pub name: String,

    /// Run on Enter/click.
    #[serde(default)]
    pub is_default: bool,
}

impl ResultAction {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_default: false,
        }
    }

    /// Mark this action as the default.
    pub fn default_action(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// A single search result.
///
/// Immutable once merged into the accumulated set; only `index` is
/// rewritten by the accumulator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ResultItem {
    /// Producer-assigned identifier.
    #[serde(default)]
    pub id: String,

    /// Primary display text.
    pub title: String,

    /// Secondary display text.
    #[serde(default, rename = "SubTitle")]
    pub subtitle: String,

    #[serde(default)]
    pub icon: WoxImage,

    #[serde(default)]
    pub preview: Preview,

    #[serde(default)]
    pub actions: Vec<ResultAction>,

    /// Query text this result was computed for.
    pub associated_query: String,

    /// Position in the accumulated result set, assigned at merge time.
    #[serde(default)]
    pub index: usize,
}

impl ResultItem {
    /// Create a result answering `associated_query`.
    pub fn new(title: impl Into<String>, associated_query: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            associated_query: associated_query.into(),
            ..Default::default()
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_icon(mut self, icon: WoxImage) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_preview(mut self, preview: Preview) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_action(mut self, action: ResultAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Whether this result was computed for `query`.
    pub fn answers(&self, query: &str) -> bool {
        self.associated_query == query
    }

    /// Actions flagged as default, in declaration order.
    pub fn default_actions(&self) -> impl Iterator<Item = &ResultAction> {
        self.actions.iter().filter(|a| a.is_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_item() {
        let raw = r#"{
            "Id": "r1",
            "Title": "3",
            "SubTitle": "1+2",
            "Icon": {"ImageType": "url", "ImageData": "https://example.com/a.png"},
            "Preview": {"PreviewType": "text", "PreviewData": "three", "PreviewProperties": {}},
            "Actions": [{"Id": "copy", "Name": "Copy result", "IsDefault": true}],
            "AssociatedQuery": "1+2"
        }"#;

        let item: ResultItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.subtitle, "1+2");
        assert_eq!(item.icon.image_type, ImageType::Url);
        assert!(!item.preview.is_empty());
        assert_eq!(item.index, 0);
        assert!(item.answers("1+2"));
        assert_eq!(item.default_actions().count(), 1);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let raw = r#"{"Title": "only title", "AssociatedQuery": "q"}"#;
        let item: ResultItem = serde_json::from_str(raw).unwrap();
        assert!(item.preview.is_empty());
        assert!(item.actions.is_empty());
        assert_eq!(item.icon, WoxImage::default());
    }

    #[test]
    fn test_default_actions_keeps_every_flagged_action() {
        let item = ResultItem::new("t", "q")
            .with_action(ResultAction::new("a", "A").default_action())
            .with_action(ResultAction::new("b", "B"))
            .with_action(ResultAction::new("c", "C").default_action());

        let ids: Vec<_> = item.default_actions().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
