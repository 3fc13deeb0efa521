use super::*;
use crate::model::{ChartKind, DataPoint};
use crate::render::{Frame, TextContent};
use crate::resources::{FetchedImage, PLACEHOLDER_PNG};
use crate::search::SearchConfig;
use crate::style::{hex_color, Align, TextStyle};
use crate::template::ShapeConfig;
use image::{ImageBuffer, Rgb};
use parking_lot::Mutex;
use serde_json::json;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

struct FailingFetcher;

impl ImageFetcher for FailingFetcher {
    fn fetch(&self, url: &Url) -> Result<FetchedImage> {
        Err(DeckError::ValidationError(format!("offline: {}", url)))
    }
}

/// Serves `http://img.test/<n>` as a one-byte payload `n`, answering later
/// requests first.
struct DelayedFetcher {
    calls: AtomicUsize,
}

impl ImageFetcher for DelayedFetcher {
    fn fetch(&self, url: &Url) -> Result<FetchedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let n: u8 = url.path().trim_start_matches('/').parse().unwrap_or(0);
        std::thread::sleep(Duration::from_millis(u64::from(5 - n.min(4)) * 20));
        Ok(FetchedImage {
            content_type: Some("image/png; charset=binary".to_string()),
            bytes: vec![n],
        })
    }
}

fn offline_resolver() -> AssetResolver {
    AssetResolver::new(Box::new(FailingFetcher))
}

fn build_template(value: serde_json::Value) -> Template {
    Template::from_value(&value).expect("Failed to build template")
}

fn slide(value: serde_json::Value) -> Slide {
    Slide::from_value(value).expect("Failed to build slide")
}

fn text_of(element: &DrawInstruction) -> String {
    match element {
        DrawInstruction::Text(block) => match &block.content {
            TextContent::Plain(text) => text.clone(),
            TextContent::Bullets(items) => items.join("|"),
        },
        other => panic!("Expected a text block, got {:?}", other),
    }
}

#[test]
fn test_normalize_layouts_from_list() {
    let raw = json!([
        {"type": "title", "title": {"x": 1, "y": 1, "w": 8, "h": 1}},
        {"type": "quote", "text": {"x": 1, "y": 2, "w": 8, "h": 2}},
        {"title": {"x": 0, "y": 0, "w": 1, "h": 1}}
    ]);

    let layouts = normalize_layouts(&raw);
    let keys: Vec<&str> = layouts.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["title", "quote"]);

    // Normalizing the normalized form changes nothing
    let again = normalize_layouts(&serde_json::Value::Object(layouts.clone()));
    assert_eq!(again, layouts);
}

#[test]
fn test_normalize_layouts_last_duplicate_wins() {
    let raw = json!([
        {"type": "title", "title": {"x": 1}},
        {"type": "title", "title": {"x": 2}}
    ]);
    let layouts = normalize_layouts(&raw);
    assert_eq!(layouts.len(), 1);
    assert_eq!(layouts["title"]["title"]["x"], json!(2));
}

#[test]
fn test_normalize_layouts_rejects_scalars() {
    assert!(normalize_layouts(&json!("nope")).is_empty());
    assert!(normalize_layouts(&serde_json::Value::Null).is_empty());
}

#[test]
fn test_template_regions_keep_declaration_order() {
    let t = build_template(json!({
        "id": "minimal",
        "style": {"bgColor": "#FFF0F5", "fontSize": 18},
        "layouts": [{
            "type": "image",
            "imageUrl": {"x": 5, "y": 1, "w": 4, "h": 3},
            "title": {"x": 0.5, "y": 0.3, "w": 9, "h": 0.6, "bold": true},
            "caption": {"x": 1, "y": 4.5, "w": 8, "h": 0.5},
            "note": "not a region"
        }]
    }));

    let layout = t.layout("image").expect("image layout");
    let keys: Vec<&str> = layout.regions.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["imageUrl", "title", "caption"]);
    assert_eq!(layout.kind.as_deref(), Some("image"));
    assert_eq!(t.style.font_size, Some(18.0));
    assert!(t.layout("chart").is_none());
}

#[test]
fn test_template_catalog_from_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(
        temp_dir.path().join("b-ocean.json"),
        r#"{"name": "Ocean", "layouts": {"title": {"title": {"x": 1, "y": 1, "w": 8, "h": 1}}}}"#,
    )
    .expect("Failed to write template");
    std::fs::write(
        temp_dir.path().join("a-plain.json"),
        r#"{"id": "plain", "name": "Plain", "layouts": []}"#,
    )
    .expect("Failed to write template");

    let catalog = TemplateCatalog::load(temp_dir.path()).expect("Failed to load catalog");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.default_template().and_then(|t| t.id.as_deref()), Some("plain"));
    // Id falls back to the file stem
    assert!(catalog.find("b-ocean").is_some());
    assert!(catalog.find("Ocean").is_some());
    assert!(catalog.find("missing").is_none());
}

#[test]
fn test_content_map_narrows_slides() {
    let map = ContentMap::from_json(
        r#"{
            "topic": "Rust",
            "slides": [
                {"layout": "title", "title": "Rust", "subtitle": "Fast and safe"},
                {"layout": "timeline", "title": "History", "events": ["2010", "2015"]},
                {"layout": "bulleted-list", "bullets": 5},
                {"title": "No layout"},
                {"layout": "table", "table": {"data": [["Name", 1, {"text": "Bold", "options": {"bold": true}}]]}}
            ]
        }"#,
    )
    .expect("Failed to parse content map");

    let layouts: Vec<&str> = map.slides.iter().map(Slide::layout).collect();
    assert_eq!(layouts, vec!["title", "timeline", "table"]);
    assert!(matches!(&map.slides[1], Slide::Other { .. }));

    match &map.slides[2] {
        Slide::Table {
            table: Some(Body::Parsed(table)),
            ..
        } => {
            let row = &table.data.as_ref().expect("table data")[0];
            assert_eq!(row[0].text(), "Name");
            assert_eq!(row[1].text(), "1");
            assert!(row[2].is_bold());
        }
        other => panic!("Expected a table slide, got {:?}", other),
    }
}

#[test]
fn test_content_map_serializes_back() {
    let json = r#"{"topic":"Charts","slides":[{"layout":"chart","title":"Growth","content":{"type":"scatter","datasets":[{"label":"A","data":[{"x":1,"y":2}]}]}}]}"#;
    let map = ContentMap::from_json(json).expect("Failed to parse content map");
    let again = ContentMap::from_json(&map.to_json_pretty().expect("Failed to serialize"))
        .expect("Failed to reparse content map");
    assert_eq!(map, again);
}

#[test]
fn test_style_precedence() {
    let global = template::GlobalStyle {
        font_size: Some(18.0),
        text_color: Some("#333".to_string()),
        font_family: Some("Georgia".to_string()),
        ..Default::default()
    };

    let bare = ShapeConfig::at(0.0, 0.0, 1.0, 1.0);
    let style = TextStyle::resolve(&bare, &global);
    assert_eq!(style.font_size, 18.0);
    assert_eq!(style.color, "333333");
    assert_eq!(style.font_face, "Georgia");
    assert_eq!(style.align, Align::Left);
    assert!(!style.bold);

    let styled = ShapeConfig {
        font_size: Some(32.0),
        bold: Some(true),
        align: Some("center".to_string()),
        color: Some("ff0000".to_string()),
        ..bare.clone()
    };
    let style = TextStyle::resolve(&styled, &global);
    assert_eq!(style.font_size, 32.0);
    assert_eq!(style.color, "FF0000");
    assert_eq!(style.align, Align::Center);
    assert!(style.bold);

    let builtin = TextStyle::resolve(&bare, &template::GlobalStyle::default());
    assert_eq!(builtin.font_size, 14.0);
    assert_eq!(builtin.color, "000000");
    assert_eq!(builtin.font_face, "Arial");
}

#[test]
fn test_hex_color_forms() {
    assert_eq!(hex_color("#abc").as_deref(), Some("AABBCC"));
    assert_eq!(hex_color("FFF0F5").as_deref(), Some("FFF0F5"));
    assert_eq!(hex_color("blue"), None);
    assert_eq!(hex_color("#12345"), None);
}

#[test]
fn test_sanitize_file_name() {
    assert_eq!(utils::sanitize_file_name("A/B:C"), "A_B_C");
    assert_eq!(utils::sanitize_file_name("What? <Now>|*"), "What_ _Now___");
    assert_eq!(utils::sanitize_file_name("Line\nBreak\tTab"), "Line_Break_Tab");
}

#[test]
fn test_output_directory_checks() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let nested = temp_dir.path().join("decks").join("q1");
    utils::validate_directory_writable(&nested).expect("Failed to prepare output dir");
    assert!(nested.is_dir());
    assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 0);

    let file = temp_dir.path().join("deck.json");
    std::fs::write(&file, "{}").unwrap();
    assert!(utils::validate_file_exists(&file).is_ok());
    assert!(matches!(
        utils::ensure_directory_exists(&file),
        Err(DeckError::ValidationError(_))
    ));
    assert!(matches!(
        utils::validate_directory_exists(&temp_dir.path().join("missing")),
        Err(DeckError::PathNotFoundError(_))
    ));
}

#[test]
fn test_derive_file_name() {
    let with_topic = ContentMap::from_json(r#"{"topic": "Q1: Plans", "slides": []}"#).unwrap();
    assert_eq!(derive_file_name(&with_topic), "Q1_ Plans");

    let from_title =
        ContentMap::from_json(r#"{"topic": "", "slides": [{"layout": "title", "title": "Intro"}]}"#)
            .unwrap();
    assert_eq!(derive_file_name(&from_title), "Intro");

    let empty = ContentMap::default();
    assert_eq!(derive_file_name(&empty), "Generated_Presentation");
}

#[test]
fn test_failed_fetch_uses_placeholder() {
    let resolver = offline_resolver();
    let payload = resolver.resolve("https://example.invalid/cat.png");
    assert!(payload.is_placeholder());
    assert_eq!(payload.mime, "image/png");

    let malformed = resolver.resolve("data:image/png;base64,@@@");
    assert!(malformed.is_placeholder());
}

#[test]
fn test_inline_image_decoded_in_place() {
    let resolver = offline_resolver();
    let uri = format!("data:image/gif;base64,{}", PLACEHOLDER_PNG);
    let payload = resolver.resolve(&uri);
    assert_eq!(payload.mime, "image/gif");
    assert_eq!(payload.bytes, ImagePayload::placeholder().bytes);
    assert_eq!(payload.to_data_uri(), uri);
}

#[test]
fn test_local_image_is_read() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("red.png");
    ImageBuffer::from_fn(4, 4, |_, _| Rgb([255u8, 0u8, 0u8]))
        .save(&path)
        .expect("Failed to save image");

    let payload = offline_resolver().resolve(path.to_str().unwrap());
    assert_eq!(payload.mime, "image/png");
    assert!(!payload.is_placeholder());
}

#[test]
fn test_resolve_all_keeps_input_order() {
    let resolver = AssetResolver::new(Box::new(DelayedFetcher {
        calls: AtomicUsize::new(0),
    }));
    let references = ["http://img.test/1", "http://img.test/2", "http://img.test/3"];

    let payloads = resolver.resolve_all(&references);
    let bytes: Vec<u8> = payloads.iter().map(|p| p.bytes[0]).collect();
    assert_eq!(bytes, vec![1, 2, 3]);
    assert!(payloads.iter().all(|p| p.mime == "image/png"));
}

#[test]
fn test_resolver_cache_avoids_refetch() {
    let fetcher = std::sync::Arc::new(DelayedFetcher {
        calls: AtomicUsize::new(0),
    });

    struct Shared(std::sync::Arc<DelayedFetcher>);
    impl ImageFetcher for Shared {
        fn fetch(&self, url: &Url) -> Result<FetchedImage> {
            self.0.fetch(url)
        }
    }

    let resolver = AssetResolver::new(Box::new(Shared(fetcher.clone()))).with_cache();
    resolver.resolve("http://img.test/4");
    resolver.resolve("http://img.test/4");
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_chart_keeps_every_series() {
    let t = build_template(json!({
        "layouts": [{"type": "chart", "fontSize": 12, "chart": {"x": 1, "y": 1, "w": 8, "h": 4}}]
    }));
    let s = slide(json!({
        "layout": "chart",
        "title": "Revenue",
        "content": {
            "type": "line",
            "labels": ["Q1", "Q2"],
            "datasets": [
                {"label": "2023", "data": [1, 2]},
                {"label": "2024", "data": [3, 4]}
            ]
        }
    }));

    let resolver = offline_resolver();
    let renderer = SlideRenderer::new(&t.style, &resolver);
    let rendered = renderer.render(&s, t.layout("chart").unwrap());

    assert_eq!(rendered.elements.len(), 2);
    match &rendered.elements[0] {
        DrawInstruction::Chart(chart) => {
            assert_eq!(chart.kind, ChartKind::Line);
            assert_eq!(chart.font_size, 12.0);
            assert!(chart.show_legend);
            let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["2023", "2024"]);
            assert_eq!(chart.series[1].values, vec![DataPoint::Value(3.0), DataPoint::Value(4.0)]);
            assert_eq!(chart.series[0].categories(), vec!["Q1", "Q2"]);
        }
        other => panic!("Expected a chart, got {:?}", other),
    }

    // No title region: the fallback placement is used
    match &rendered.elements[1] {
        DrawInstruction::Text(block) => {
            assert_eq!(block.frame, Frame { x: 0.5, y: 0.3, w: 9.0, h: 0.5 });
        }
        other => panic!("Expected the title, got {:?}", other),
    }
}

#[test]
fn test_chart_point_series_are_not_merged() {
    let t = build_template(json!({"layouts": {"chart": {"chart": {"x": 1, "y": 1, "w": 8, "h": 4}}}}));
    let s = slide(json!({
        "layout": "chart",
        "content": {
            "type": "scatter",
            "datasets": [
                {"label": "2020", "data": [{"x": 1, "y": 18}]},
                {"label": "2025", "data": [{"x": 1, "y": 30}]}
            ]
        }
    }));

    let resolver = offline_resolver();
    let rendered = SlideRenderer::new(&t.style, &resolver).render(&s, t.layout("chart").unwrap());
    match &rendered.elements[..] {
        [DrawInstruction::Chart(chart)] => {
            assert_eq!(chart.series.len(), 2);
            assert_eq!(chart.series[0].name, "2020");
            assert_eq!(chart.series[0].values, vec![DataPoint::Point { x: 1.0, y: 18.0 }]);
            assert_eq!(chart.series[1].name, "2025");
            assert_eq!(chart.series[1].values, vec![DataPoint::Point { x: 1.0, y: 30.0 }]);
        }
        other => panic!("Expected a single chart, got {:?}", other),
    }
}

#[test]
fn test_chart_mixing_values_and_points_is_skipped() {
    let t = build_template(json!({"layouts": {"chart": {}}}));
    let s = slide(json!({
        "layout": "chart",
        "title": "Broken",
        "content": {"datasets": [{"label": "A", "data": [1, {"x": 2, "y": 3}]}]}
    }));

    let resolver = offline_resolver();
    let rendered = SlideRenderer::new(&t.style, &resolver).render(&s, t.layout("chart").unwrap());
    assert!(rendered.elements.is_empty());
}

#[test]
fn test_chart_without_datasets_keeps_empty_slide() {
    let t = build_template(json!({"layouts": {"chart": {}}}));
    let s = slide(json!({"layout": "chart", "title": "Empty", "content": {"type": "bar", "datasets": []}}));

    let resolver = offline_resolver();
    let rendered = SlideRenderer::new(&t.style, &resolver).render(&s, t.layout("chart").unwrap());
    assert_eq!(rendered.layout, "chart");
    assert!(rendered.elements.is_empty());
}

#[test]
fn test_malformed_chart_body_keeps_slide_in_deck() {
    let t = build_template(json!({
        "style": {"bgColor": "#FFF0F5"},
        "layouts": [
            {"type": "title", "title": {"x": 1, "y": 2, "w": 8, "h": 1}},
            {"type": "chart", "chart": {"x": 1, "y": 1, "w": 8, "h": 4}}
        ]
    }));
    let map = ContentMap::from_json(
        r#"{"slides": [
            {"layout": "title", "title": "A"},
            {"layout": "chart", "title": "B", "content": {"datasets": [{"label": "2024", "data": ["10"]}]}},
            {"layout": "title", "title": "C"}
        ]}"#,
    )
    .expect("Failed to parse content map");

    assert_eq!(map.slides.len(), 3);
    assert!(matches!(
        &map.slides[1],
        Slide::Chart {
            content: Some(Body::Malformed { .. }),
            ..
        }
    ));

    let rendered = render_slides(&map, &t, &offline_resolver());
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[1].layout, "chart");
    assert!(rendered[1].elements.is_empty());
    assert_eq!(rendered[1].background.as_deref(), Some("FFF0F5"));
    assert_eq!(text_of(&rendered[2].elements[0]), "C");
}

#[test]
fn test_malformed_table_body_is_kept_and_serialized_back() {
    let s = slide(json!({
        "layout": "table",
        "title": "Flags",
        "table": {"data": [["Enabled", true]]}
    }));
    assert!(matches!(
        &s,
        Slide::Table {
            table: Some(Body::Malformed { .. }),
            ..
        }
    ));
    assert_eq!(s.to_value()["table"], json!({"data": [["Enabled", true]]}));

    let t = build_template(json!({"layouts": {"table": {"title": {"x": 0, "y": 0, "w": 9, "h": 1}}}}));
    let resolver = offline_resolver();
    let rendered = SlideRenderer::new(&t.style, &resolver).render(&s, t.layout("table").unwrap());
    assert_eq!(rendered.layout, "table");
    assert!(rendered.elements.is_empty());
}

#[test]
fn test_chart_defaults_without_region() {
    let t = build_template(json!({"style": {"fontSize": 16}, "layouts": {"chart": {}}}));
    let s = slide(json!({
        "layout": "chart",
        "content": {"datasets": [{"label": "Points", "data": [{"x": 2, "y": 5}]}]}
    }));

    let resolver = offline_resolver();
    let rendered = SlideRenderer::new(&t.style, &resolver).render(&s, t.layout("chart").unwrap());
    match &rendered.elements[0] {
        DrawInstruction::Chart(chart) => {
            assert_eq!(chart.frame, Frame { x: 1.0, y: 1.2, w: 8.0, h: 4.0 });
            assert_eq!(chart.font_size, 16.0);
            assert_eq!(chart.kind, ChartKind::Bar);
            assert_eq!(chart.series[0].categories(), vec!["2"]);
        }
        other => panic!("Expected a chart, got {:?}", other),
    }
}

#[test]
fn test_table_is_padded_and_bordered() {
    let t = build_template(json!({
        "layouts": [{"type": "table", "borderColor": "#ff0000", "table": {"x": 1, "y": 1.5, "w": 8, "h": 3}}]
    }));
    let s = slide(json!({
        "layout": "table",
        "table": {"data": [["Name", "Score", "Rank"], ["Ada"]]}
    }));

    let resolver = offline_resolver();
    let rendered = SlideRenderer::new(&t.style, &resolver).render(&s, t.layout("table").unwrap());
    match &rendered.elements[0] {
        DrawInstruction::Table(table) => {
            assert_eq!(table.border_color, "FF0000");
            assert!(table.rows.iter().all(|row| row.len() == 3));
            assert_eq!(table.rows[1][0].text, "Ada");
            assert_eq!(table.rows[1][2].text, "");
        }
        other => panic!("Expected a table, got {:?}", other),
    }
}

#[test]
fn test_comparison_draws_matching_regions() {
    let t = build_template(json!({
        "layouts": [{
            "type": "comparison",
            "leftTitle": {"x": 0.5, "y": 1, "w": 4, "h": 0.5},
            "rightDescription": {"x": 5, "y": 1.6, "w": 4, "h": 3},
            "title": {"x": 0.5, "y": 0.2, "w": 9, "h": 0.6}
        }]
    }));
    let s = slide(json!({
        "layout": "comparison",
        "title": "Rust vs Go",
        "comparison": {
            "left": {"title": "Rust", "description": "Zero-cost abstractions"},
            "right": {"title": "Go", "description": "Simple concurrency"}
        }
    }));

    let resolver = offline_resolver();
    let rendered =
        SlideRenderer::new(&t.style, &resolver).render(&s, t.layout("comparison").unwrap());
    let texts: Vec<String> = rendered.elements.iter().map(text_of).collect();
    assert_eq!(texts, vec!["Rust", "Simple concurrency", "Rust vs Go"]);
}

#[test]
fn test_gallery_images_and_single_description() {
    let t = build_template(json!({
        "layouts": [{
            "type": "three-images-with-description",
            "title": {"x": 0.5, "y": 0.2, "w": 9, "h": 0.6},
            "images": [
                {"x": 0.5, "y": 1, "w": 2.8, "h": 2},
                {"x": 3.6, "y": 1, "w": 2.8, "h": 2},
                {"x": 6.7, "y": 1, "w": 2.8, "h": 2}
            ],
            "description": {"x": 0.5, "y": 3.5, "w": 9, "h": 1}
        }]
    }));
    let s = slide(json!({
        "layout": "three-images-with-description",
        "title": "Gallery",
        "images": ["https://example.invalid/a.png", "https://example.invalid/b.png"],
        "description": "Two pictures"
    }));

    let resolver = offline_resolver();
    let rendered = SlideRenderer::new(&t.style, &resolver)
        .render(&s, t.layout("three-images-with-description").unwrap());

    assert_eq!(rendered.elements.len(), 4);
    assert_eq!(text_of(&rendered.elements[0]), "Gallery");
    match (&rendered.elements[1], &rendered.elements[2]) {
        (DrawInstruction::Image(first), DrawInstruction::Image(second)) => {
            assert_eq!(first.frame.x, 0.5);
            assert_eq!(second.frame.x, 3.6);
            assert!(first.image.is_placeholder());
        }
        other => panic!("Expected two images, got {:?}", other),
    }
    assert_eq!(text_of(&rendered.elements[3]), "Two pictures");
}

#[test]
fn test_description_declared_before_images_is_drawn_once() {
    let t = build_template(json!({
        "layouts": [{
            "type": "three-images-with-description",
            "description": {"x": 0.5, "y": 3.5, "w": 9, "h": 1},
            "images": [{"x": 0.5, "y": 1, "w": 2.8, "h": 2}]
        }]
    }));
    let s = slide(json!({
        "layout": "three-images-with-description",
        "images": ["data:image/png;base64,iVBORw0KGgo="],
        "description": "Only once"
    }));

    let resolver = offline_resolver();
    let rendered = SlideRenderer::new(&t.style, &resolver)
        .render(&s, t.layout("three-images-with-description").unwrap());

    let texts: Vec<String> = rendered
        .elements
        .iter()
        .filter(|e| matches!(e, DrawInstruction::Text(_)))
        .map(text_of)
        .collect();
    assert_eq!(texts, vec!["Only once"]);
    assert_eq!(rendered.elements.len(), 2);
    assert!(matches!(rendered.elements[1], DrawInstruction::Image(_)));
}

#[test]
fn test_bullets_render_as_list() {
    let t = build_template(json!({
        "layouts": {"bulleted-list": {"bullets": {"x": 1, "y": 1, "w": 8, "h": 4}, "title": {"x": 1, "y": 0.2, "w": 8, "h": 0.6}}}
    }));
    let s = slide(json!({"layout": "bulleted-list", "title": "", "bullets": ["One", "Two"]}));

    let resolver = offline_resolver();
    let rendered =
        SlideRenderer::new(&t.style, &resolver).render(&s, t.layout("bulleted-list").unwrap());
    // Empty title is skipped
    assert_eq!(rendered.elements.len(), 1);
    match &rendered.elements[0] {
        DrawInstruction::Text(block) => {
            assert_eq!(block.content, TextContent::Bullets(vec!["One".into(), "Two".into()]));
        }
        other => panic!("Expected bullets, got {:?}", other),
    }
}

#[test]
fn test_unmatched_layouts_are_skipped_in_order() {
    let t = build_template(json!({
        "style": {"bgColor": "#FFF0F5"},
        "layouts": [
            {"type": "title", "title": {"x": 1, "y": 2, "w": 8, "h": 1}},
            {"type": "bulleted-list", "bullets": {"x": 1, "y": 1, "w": 8, "h": 4}}
        ]
    }));
    let map = ContentMap::from_json(
        r#"{"slides": [
            {"layout": "title", "title": "Hello"},
            {"layout": "quote", "text": "Skipped"},
            {"layout": "bulleted-list", "bullets": ["a", "b"]}
        ]}"#,
    )
    .unwrap();

    let rendered = render_slides(&map, &t, &offline_resolver());
    let layouts: Vec<&str> = rendered.iter().map(|s| s.layout.as_str()).collect();
    assert_eq!(layouts, vec!["title", "bulleted-list"]);
    assert!(rendered.iter().all(|s| s.background.as_deref() == Some("FFF0F5")));
}

#[test]
fn test_write_presentation_parts() {
    let mut slide = RenderedSlide::new("image");
    slide.background = Some("112233".to_string());
    slide.elements.push(DrawInstruction::Text(render::TextBlock {
        frame: Frame { x: 1.0, y: 1.0, w: 8.0, h: 1.0 },
        content: TextContent::Plain("Hello & welcome".to_string()),
        style: TextStyle::resolve(&ShapeConfig::default(), &template::GlobalStyle::default()),
    }));
    slide.elements.push(DrawInstruction::Image(render::ImageBlock {
        frame: Frame { x: 1.0, y: 2.0, w: 2.0, h: 2.0 },
        image: ImagePayload::placeholder(),
    }));
    slide.elements.push(DrawInstruction::Chart(render::ChartBlock {
        frame: Frame { x: 4.0, y: 2.0, w: 5.0, h: 3.0 },
        kind: ChartKind::Pie,
        series: vec![render::ChartSeries {
            name: "Share".to_string(),
            labels: vec!["A".to_string(), "B".to_string()],
            values: vec![DataPoint::Value(60.0), DataPoint::Value(40.0)],
        }],
        font_size: 12.0,
        show_legend: true,
    }));

    let bytes = write_presentation(&[slide], &PptxConfig::default()).expect("Failed to write");
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).expect("Failed to read PPTX as ZIP");

    let mut read = |name: &str| {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap_or_else(|_| panic!("Missing part {}", name))
            .read_to_string(&mut content)
            .expect("Failed to read part");
        content
    };

    let slide_xml = read("ppt/slides/slide1.xml");
    assert!(slide_xml.contains("Hello &amp; welcome"));
    assert!(slide_xml.contains(r#"sz="1400""#));
    assert!(slide_xml.contains(r#"<a:srgbClr val="112233"/>"#));
    assert!(slide_xml.contains(r#"r:embed="rId2""#));

    let chart_xml = read("ppt/charts/chart1.xml");
    assert!(chart_xml.contains("<c:pieChart>"));
    assert!(chart_xml.contains(r#"<c:legendPos val="b"/>"#));
    assert!(!chart_xml.contains("<c:valAx>"));

    let content_types = read("[Content_Types].xml");
    assert!(content_types.contains(r#"Extension="png""#));
    assert!(content_types.contains("/ppt/charts/chart1.xml"));

    let rels = read("ppt/slides/_rels/slide1.xml.rels");
    assert!(rels.contains("../media/image1.png"));
    assert!(rels.contains("../charts/chart1.xml"));
}

#[test]
fn test_backdrop_single_color() {
    let red = ImageBuffer::from_fn(10, 10, |_, _| Rgb([255u8, 0u8, 0u8]));
    let backdrop = palette::estimate(&red);
    assert_eq!(backdrop, Backdrop::Gradient(vec![[255, 0, 0]]));
    assert_eq!(backdrop.to_css(), "linear-gradient(to bottom right, rgb(255, 0, 0))");
    assert_eq!(backdrop.primary_hex(), "FF0000");
}

#[test]
fn test_backdrop_ranks_by_frequency() {
    let image = ImageBuffer::from_fn(10, 1, |x, _| match x {
        0 => Rgb([200u8, 0u8, 0u8]),
        1..=3 => Rgb([0u8, 200u8, 0u8]),
        4..=7 => Rgb([0u8, 0u8, 200u8]),
        8 => Rgb([255u8, 255u8, 255u8]),
        _ => Rgb([0u8, 0u8, 0u8]),
    });
    let backdrop = palette::estimate(&image);
    assert_eq!(
        backdrop,
        Backdrop::Gradient(vec![[0, 0, 200], [0, 200, 0], [200, 0, 0]])
    );
}

#[test]
fn test_backdrop_falls_back_to_white() {
    let image = ImageBuffer::from_fn(4, 4, |x, _| {
        if x % 2 == 0 {
            Rgb([255u8, 255u8, 255u8])
        } else {
            Rgb([5u8, 5u8, 5u8])
        }
    });
    let backdrop = palette::estimate(&image);
    assert_eq!(backdrop, Backdrop::Fallback);
    assert_eq!(backdrop.to_css(), "white");
}

#[test]
fn test_parse_outline_response() {
    let fenced = "Here you go:\n```json\n[{\"title\": \"Intro\", \"bullets\": [\"Why\"]}]\n```\nEnjoy";
    let outline = parse_outline_response(fenced).expect("Failed to parse fenced outline");
    assert_eq!(outline.len(), 1);
    assert_eq!(outline[0].bullets, vec!["Why"]);

    let bare = r#"[{"title": "A"}, {"title": "B"}]"#;
    assert_eq!(parse_outline_response(bare).unwrap().len(), 2);

    assert!(parse_outline_response(r#"[{"title": " "}]"#).is_err());
    assert!(parse_outline_response("not json").is_err());
}

#[test]
fn test_limit_outline() {
    let outline: Vec<OutlineItem> = (1..=7)
        .map(|i| OutlineItem {
            title: format!("Slide {}", i),
            bullets: Vec::new(),
        })
        .collect();
    let limited = outline::limit_outline(&outline, outline::DEFAULT_OUTLINE_LIMIT);
    assert_eq!(limited.len(), 5);
    assert_eq!(limited[4].title, "Slide 5");
}

#[test]
fn test_finalize_adds_closing_slides_once() {
    let outline = vec![OutlineItem {
        title: "Rust VS Go".to_string(),
        bullets: Vec::new(),
    }];
    let mut map = ContentMap::from_json(r#"{"slides": [{"layout": "title", "title": "Hi"}]}"#).unwrap();

    finalize_content_map(&mut map, &outline);
    finalize_content_map(&mut map, &outline);

    let layouts: Vec<&str> = map.slides.iter().map(Slide::layout).collect();
    assert_eq!(layouts, vec!["title", "conclusion", "comparison"]);
}

#[test]
fn test_finalize_without_comparison_markers() {
    let outline = vec![OutlineItem {
        title: "History".to_string(),
        bullets: Vec::new(),
    }];
    let mut map =
        ContentMap::from_json(r#"{"slides": [{"layout": "conclusion", "conclusion": "Done"}]}"#).unwrap();
    finalize_content_map(&mut map, &outline);
    assert_eq!(map.slides.len(), 1);
}

struct FakeSearch {
    queries: Mutex<Vec<String>>,
    found: bool,
}

impl FakeSearch {
    fn new(found: bool) -> Self {
        Self {
            queries: Mutex::new(Vec::new()),
            found,
        }
    }
}

impl ImageSearch for FakeSearch {
    fn search(&self, query: &str) -> Option<String> {
        self.queries.lock().push(query.to_string());
        self.found
            .then(|| format!("https://img.test/{}", query.replace(' ', "_")))
    }
}

#[test]
fn test_enrich_images() {
    let mut map = ContentMap::from_json(
        r#"{"topic": "Space", "slides": [
            {"layout": "three-images-with-description", "title": "Planets", "images": ["one.png"]},
            {"layout": "image"},
            {"layout": "conclusion", "imageUrl": "https://keep.test/x.png"},
            {"layout": "title", "title": "Untouched"}
        ]}"#,
    )
    .unwrap();
    let search = FakeSearch::new(true);

    enrich_images(&mut map, &search);

    assert_eq!(
        map.slides[0].fields().images.as_deref().unwrap(),
        &[
            "https://img.test/Planets_1".to_string(),
            "https://img.test/Planets_2".to_string(),
            "https://img.test/Planets_3".to_string()
        ]
    );
    assert_eq!(
        map.slides[1].fields().image_url.as_deref(),
        Some("https://img.test/Space")
    );
    assert_eq!(
        map.slides[2].fields().image_url.as_deref(),
        Some("https://keep.test/x.png")
    );
    assert_eq!(search.queries.lock().len(), 4);
}

#[test]
fn test_image_provider_falls_back_to_placeholder() {
    let search = FakeSearch::new(false);
    let resolver = offline_resolver();
    let provider = ImageProvider::new(&search, &resolver);
    assert!(provider.provide("nothing").is_placeholder());

    let found = FakeSearch::new(true);
    let provider = ImageProvider::new(&found, &resolver);
    // Found but unreachable: still the placeholder
    assert!(provider.provide("offline").is_placeholder());
}

#[test]
fn test_config_search_requires_credentials() {
    let config = Config::default();
    assert!(config.search_config().is_none());
    assert_eq!(config.resolver_config().timeout_ms, 10000);

    let config = Config {
        google_api_key: Some("key".to_string()),
        google_cx: Some("cx".to_string()),
        ..Config::default()
    };
    let search: SearchConfig = config.search_config().expect("search config");
    assert_eq!(search.api_key, "key");
    assert_eq!(search.cx, "cx");
}
