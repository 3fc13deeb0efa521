// ABOUTME: Content map data model for the slidecraft application
// ABOUTME: Narrows loosely-typed slide JSON into a closed set of slide variants

use crate::errors::{DeckError, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// The abstract, template-independent description of a whole deck.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(from = "RawContentMap", into = "RawContentMap")]
pub struct ContentMap {
    pub topic: Option<String>,
    pub slides: Vec<Slide>,
}

/// Wire form of a content map. Slides stay untyped until each one is narrowed
/// on its own, so one malformed slide cannot reject the whole map.
#[derive(Deserialize, Serialize)]
struct RawContentMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    #[serde(default)]
    slides: Vec<Value>,
}

impl From<RawContentMap> for ContentMap {
    fn from(raw: RawContentMap) -> Self {
        let slides = raw
            .slides
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match Slide::from_value(value) {
                Ok(slide) => Some(slide),
                Err(e) => {
                    warn!("Dropping slide {} from content map: {}", i + 1, e);
                    None
                }
            })
            .collect();

        Self {
            topic: raw.topic,
            slides,
        }
    }
}

impl From<ContentMap> for RawContentMap {
    fn from(map: ContentMap) -> Self {
        Self {
            topic: map.topic,
            slides: map.slides.iter().map(Slide::to_value).collect(),
        }
    }
}

impl ContentMap {
    /// Parse a content map from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a content map from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DeckError::PathNotFoundError(path.to_path_buf()));
        }
        let json = fs::read_to_string(path).map_err(DeckError::FileReadError)?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The topic, treating an empty string as absent.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref().filter(|t| !t.is_empty())
    }

    pub fn has_layout(&self, layout: &str) -> bool {
        self.slides.iter().any(|s| s.layout() == layout)
    }
}

/// A single slide, keyed by its `layout` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Slide {
    Title(SlideFields),
    BulletedList(SlideFields),
    Quote(SlideFields),
    Image(SlideFields),
    Conclusion(SlideFields),
    ThreeImagesWithDescription(SlideFields),
    Table {
        fields: SlideFields,
        table: Option<Body<TableData>>,
    },
    Chart {
        fields: SlideFields,
        content: Option<Body<ChartContent>>,
    },
    Comparison {
        fields: SlideFields,
        comparison: Option<Body<Comparison>>,
    },
    /// A layout tag outside the known set; rendered through the generic region walk.
    Other { layout: String, fields: SlideFields },
}

impl Slide {
    /// Narrow one raw slide object into its variant.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(DeckError::ContentMapError(
                "slide is not a JSON object".to_string(),
            ));
        };

        let layout = match map.remove("layout") {
            Some(Value::String(layout)) => layout,
            _ => {
                return Err(DeckError::ContentMapError(
                    "slide has no `layout` tag".to_string(),
                ))
            }
        };

        let slide = match layout.as_str() {
            "title" => Slide::Title(fields_from(map)?),
            "bulleted-list" => Slide::BulletedList(fields_from(map)?),
            "quote" => Slide::Quote(fields_from(map)?),
            "image" => Slide::Image(fields_from(map)?),
            "conclusion" => Slide::Conclusion(fields_from(map)?),
            "three-images-with-description" => Slide::ThreeImagesWithDescription(fields_from(map)?),
            "table" => {
                let table = take_body(&mut map, "table");
                Slide::Table {
                    fields: fields_from(map)?,
                    table,
                }
            }
            "chart" => {
                let content = take_body(&mut map, "content");
                Slide::Chart {
                    fields: fields_from(map)?,
                    content,
                }
            }
            "comparison" => {
                let comparison = take_body(&mut map, "comparison");
                Slide::Comparison {
                    fields: fields_from(map)?,
                    comparison,
                }
            }
            _ => Slide::Other {
                layout: layout.clone(),
                fields: fields_from(map)?,
            },
        };

        Ok(slide)
    }

    /// Convert back into the JSON shape accepted by [`Slide::from_value`].
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("layout".to_string(), Value::String(self.layout().to_string()));

        if let Ok(Value::Object(fields)) = serde_json::to_value(self.fields()) {
            map.extend(fields);
        }

        let body = match self {
            Slide::Table { table: Some(t), .. } => Some(("table", t.to_value())),
            Slide::Chart {
                content: Some(c), ..
            } => Some(("content", c.to_value())),
            Slide::Comparison {
                comparison: Some(c),
                ..
            } => Some(("comparison", c.to_value())),
            _ => None,
        };
        if let Some((key, Some(value))) = body {
            map.insert(key.to_string(), value);
        }

        Value::Object(map)
    }

    /// The layout tag used to look up this slide's template layout.
    pub fn layout(&self) -> &str {
        match self {
            Slide::Title(_) => "title",
            Slide::BulletedList(_) => "bulleted-list",
            Slide::Quote(_) => "quote",
            Slide::Image(_) => "image",
            Slide::Conclusion(_) => "conclusion",
            Slide::ThreeImagesWithDescription(_) => "three-images-with-description",
            Slide::Table { .. } => "table",
            Slide::Chart { .. } => "chart",
            Slide::Comparison { .. } => "comparison",
            Slide::Other { layout, .. } => layout,
        }
    }

    pub fn fields(&self) -> &SlideFields {
        match self {
            Slide::Title(f)
            | Slide::BulletedList(f)
            | Slide::Quote(f)
            | Slide::Image(f)
            | Slide::Conclusion(f)
            | Slide::ThreeImagesWithDescription(f) => f,
            Slide::Table { fields, .. }
            | Slide::Chart { fields, .. }
            | Slide::Comparison { fields, .. }
            | Slide::Other { fields, .. } => fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut SlideFields {
        match self {
            Slide::Title(f)
            | Slide::BulletedList(f)
            | Slide::Quote(f)
            | Slide::Image(f)
            | Slide::Conclusion(f)
            | Slide::ThreeImagesWithDescription(f) => f,
            Slide::Table { fields, .. }
            | Slide::Chart { fields, .. }
            | Slide::Comparison { fields, .. }
            | Slide::Other { fields, .. } => fields,
        }
    }

    /// The slide title, treating an empty string as absent.
    pub fn title(&self) -> Option<&str> {
        self.fields().title.as_deref().filter(|t| !t.is_empty())
    }
}

fn fields_from(map: Map<String, Value>) -> Result<SlideFields> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| DeckError::ContentMapError(format!("invalid slide fields: {}", e)))
}

fn take_body<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<Body<T>> {
    match map.remove(key) {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(body) => Some(Body::Parsed(body)),
            Err(e) => {
                warn!("Keeping slide with malformed `{}`: {}", key, e);
                Some(Body::Malformed {
                    raw: value,
                    reason: format!("invalid `{}`: {}", key, e),
                })
            }
        },
    }
}

/// A structured slide body (table, chart or comparison).
#[derive(Debug, Clone, PartialEq)]
pub enum Body<T> {
    Parsed(T),
    /// The body had the wrong shape. The raw JSON is kept so the slide still
    /// serializes back as it was read.
    Malformed { raw: Value, reason: String },
}

impl<T: Serialize> Body<T> {
    pub fn parsed(&self) -> std::result::Result<&T, &str> {
        match self {
            Body::Parsed(body) => Ok(body),
            Body::Malformed { reason, .. } => Err(reason.as_str()),
        }
    }

    fn to_value(&self) -> Option<Value> {
        match self {
            Body::Parsed(body) => serde_json::to_value(body).ok(),
            Body::Malformed { raw, .. } => Some(raw.clone()),
        }
    }
}

/// Fields shared by every slide variant. Any extra keys are kept by name so the
/// generic region walk can still match them against template regions.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_strings",
        skip_serializing_if = "Option::is_none"
    )]
    pub bullets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_strings",
        skip_serializing_if = "Option::is_none"
    )]
    pub images: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A populated slide field as seen by the generic region walk.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(Vec<&'a str>),
}

impl<'a> FieldValue<'a> {
    fn from_json(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(FieldValue::Text(s)),
            Value::Array(items) => items
                .iter()
                .map(Value::as_str)
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::List),
            _ => None,
        }
    }

    fn list(items: &'a [String]) -> Self {
        FieldValue::List(items.iter().map(String::as_str).collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }
}

impl SlideFields {
    /// Look up a field by its JSON name. Empty strings and empty lists count as absent.
    pub fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        let value = match key {
            "title" => text_field(&self.title),
            "subtitle" => text_field(&self.subtitle),
            "text" => text_field(&self.text),
            "caption" => text_field(&self.caption),
            "description" => text_field(&self.description),
            "conclusion" => text_field(&self.conclusion),
            "imageUrl" => text_field(&self.image_url),
            "bullets" => self.bullets.as_deref().map(FieldValue::list),
            "images" => self.images.as_deref().map(FieldValue::list),
            other => self.extra.get(other).and_then(FieldValue::from_json),
        };
        value.filter(|v| !v.is_empty())
    }
}

fn text_field(value: &Option<String>) -> Option<FieldValue<'_>> {
    value.as_deref().map(FieldValue::Text)
}

/// Accept a list whose entries are not all strings; non-strings are rendered as JSON
/// and nulls are dropped.
fn lenient_strings<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(items.map(|items| {
        items
            .into_iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect()
    }))
}

/// Table body: a grid of cells, first row conventionally a header.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct TableData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Vec<TableCell>>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TableCell {
    Text(String),
    Number(f64),
    Rich {
        text: String,
        #[serde(default)]
        options: CellOptions,
    },
    Empty,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct CellOptions {
    #[serde(default)]
    pub bold: bool,
}

impl TableCell {
    pub fn text(&self) -> String {
        match self {
            TableCell::Text(s) => s.clone(),
            TableCell::Number(n) => n.to_string(),
            TableCell::Rich { text, .. } => text.clone(),
            TableCell::Empty => String::new(),
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, TableCell::Rich { options, .. } if options.bold)
    }
}

/// Chart body as produced by the content-map generator.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ChartContent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_strings",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<Dataset>>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Dataset {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DataPoint {
    Value(f64),
    Point { x: f64, y: f64 },
}

impl DataPoint {
    /// The value plotted on the value axis.
    pub fn y(&self) -> f64 {
        match self {
            DataPoint::Value(v) => *v,
            DataPoint::Point { y, .. } => *y,
        }
    }

    pub fn x(&self) -> Option<f64> {
        match self {
            DataPoint::Value(_) => None,
            DataPoint::Point { x, .. } => Some(*x),
        }
    }
}

/// Supported chart families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Scatter,
}

impl ChartKind {
    /// Parse a chart type name; absent or unrecognized names become `Bar`.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_lowercase()).as_deref() {
            Some("line") => ChartKind::Line,
            Some("pie") => ChartKind::Pie,
            Some("scatter") => ChartKind::Scatter,
            Some("bar") | None => ChartKind::Bar,
            Some(other) => {
                warn!("Unsupported chart type '{}', using bar", other);
                ChartKind::Bar
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Comparison {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<ComparisonSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<ComparisonSide>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ComparisonSide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
