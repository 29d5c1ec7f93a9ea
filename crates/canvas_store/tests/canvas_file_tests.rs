//! Integration tests for canvas files
//!
//! Covers the serialize/deserialize round trip over generated documents,
//! loading through layers of quote-wrapping, and the historical layout
//! shapes still found in stored templates.

use canvas_model::{CanvasDocument, PageConfig, PageDimension, PageSize, Widget, WidgetKind};
use canvas_store::{deserialize, load_document, serialize, unwrap_quoted, SerializeOptions};
use proptest::prelude::*;
use serde_json::json;

const CONTAINER: PageSize = PageSize::new(900, 700);

fn arb_kind() -> impl Strategy<Value = WidgetKind> {
    prop::sample::select(WidgetKind::ALL.to_vec())
}

fn arb_widget() -> impl Strategy<Value = Widget> {
    (
        arb_kind(),
        0.0f64..2000.0,
        0.0f64..2000.0,
        -720i32..720,
        "[a-zA-Z0-9 {}._]{0,24}",
        prop::option::of("[a-z]{1,12}\\.png"),
    )
        .prop_map(|(kind, x, y, rotation, text, image_src)| {
            let mut widget = Widget::create(kind, x, y, CONTAINER);
            widget.rotation = rotation;
            widget.text = text;
            widget.image_src = image_src;
            widget
        })
}

fn arb_page() -> impl Strategy<Value = PageConfig> {
    prop_oneof![
        prop::sample::select(vec!["free", "a4-portrait", "a4l", "letterp", "letterl"])
            .prop_map(PageConfig::from_preset),
        (100i32..3000, 100i32..3000).prop_map(|(w, h)| PageConfig::custom(
            "custom",
            PageDimension::Px(w),
            PageDimension::Px(h),
            "Custom"
        )),
    ]
}

fn arb_document() -> impl Strategy<Value = CanvasDocument> {
    (prop::collection::vec(arb_widget(), 0..8), arb_page())
        .prop_map(|(widgets, page)| CanvasDocument::from_widgets(widgets, page))
}

proptest! {
    #[test]
    fn round_trip_preserves_widgets_and_page(doc in arb_document(), pretty in any::<bool>()) {
        let json = serialize(&doc, &SerializeOptions::for_document(&doc).with_pretty(pretty)).unwrap();
        let loaded = deserialize(&json).unwrap();

        prop_assert_eq!(&loaded.elements, &doc.widgets().to_vec());
        prop_assert_eq!(loaded.page_config.as_ref(), Some(doc.page()));
        prop_assert_eq!(loaded.total_elements, doc.len());
        prop_assert_eq!(loaded.skipped_elements, 0);
        prop_assert!(loaded.elements.iter().all(Widget::is_grid_aligned));
    }

    #[test]
    fn json_string_wrapping_is_transparent(doc in arb_document(), layers in 1usize..4) {
        let json = serialize(&doc, &SerializeOptions::for_document(&doc).with_pretty(false)).unwrap();
        let mut wrapped = json.clone();
        for _ in 0..layers {
            wrapped = serde_json::to_string(&wrapped).unwrap();
        }
        let unwrapped = unwrap_quoted(&wrapped);
        prop_assert_eq!(unwrapped.as_ref(), json.as_str());
        prop_assert_eq!(deserialize(&wrapped).unwrap(), deserialize(&json).unwrap());
    }

    #[test]
    fn naive_wrapping_is_transparent(doc in arb_document()) {
        let json = serialize(&doc, &SerializeOptions::for_document(&doc).with_pretty(false)).unwrap();
        let wrapped = format!("\"{}\"", json.replace('"', "\\\""));
        prop_assert_eq!(deserialize(&wrapped).unwrap(), deserialize(&json).unwrap());
    }

    #[test]
    fn unwrapping_is_idempotent(text in "[a-zA-Z0-9 {}\":,\\[\\]]{0,40}") {
        let once = unwrap_quoted(&text).into_owned();
        let twice = unwrap_quoted(&once).into_owned();
        // a fully unwrapped text only changes again if it was still quoted
        if !(once.len() >= 2 && once.starts_with('"') && once.ends_with('"')) {
            prop_assert_eq!(once, twice);
        }
    }
}

#[test]
fn legacy_layout_with_nested_geometry() {
    let raw = json!({
        "widgets": [
            {
                "id": 17,
                "widgetType": "text",
                "position": {"left": 33, "top": 41},
                "size": {"width": 190, "height": 38},
                "prompt_text": "Total for {branch}",
                "textStyle": {"font_size": 18, "color": "#333333"}
            },
            {
                "kind": "data_table",
                "x": "100",
                "y": "250.4"
            }
        ],
        "page_config": {"key": "a4-portrait"}
    });
    let loaded = deserialize(&raw.to_string()).unwrap();

    assert_eq!(loaded.elements.len(), 2);
    let text = &loaded.elements[0];
    assert_eq!(text.id.as_str(), "17");
    assert_eq!(text.kind, WidgetKind::TextBox);
    assert_eq!((text.x, text.y, text.width, text.height), (30, 40, 190, 40));
    assert_eq!(text.text, "Total for {branch}");
    assert_eq!(text.text_style.font_size, 18);
    assert_eq!(text.text_style.text_color, "#333333");

    let table = &loaded.elements[1];
    assert_eq!(table.kind, WidgetKind::DataTable);
    assert_eq!((table.x, table.y), (100, 250));
    assert!(!table.id.as_str().is_empty());

    assert_eq!(loaded.page_config, Some(PageConfig::from_preset("a4-portrait")));
}

#[test]
fn stored_layout_wrapped_by_database_column() {
    let mut doc = CanvasDocument::with_page(PageConfig::from_preset("letterl"));
    doc.add_widget(Widget::create(WidgetKind::Header, 0.0, 0.0, PageSize::new(1056, 816)));
    let json = serialize(&doc, &SerializeOptions::for_document(&doc)).unwrap();
    let column = serde_json::to_string(&serde_json::to_string(&json).unwrap()).unwrap();

    let restored = load_document(&column).unwrap();
    assert_eq!(restored.widgets(), doc.widgets());
    assert_eq!(restored.page(), doc.page());
}
