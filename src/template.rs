// ABOUTME: Template model for the slidecraft application
// ABOUTME: Normalizes template definitions into per-layout region lookups and loads template catalogs

use crate::errors::{DeckError, Result};
use crate::utils::{validate_directory_exists, validate_file_exists};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Layout-level keys that configure the layout itself rather than a region.
const LAYOUT_KEYS: [&str; 3] = ["type", "fontSize", "borderColor"];

/// A visual template: global style defaults plus region geometry per layout tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub style: GlobalStyle,
    pub layouts: IndexMap<String, LayoutSpec>,
}

/// Global defaults applied to every slide of a template.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStyle {
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
}

/// Placement and style of one region, in layout units (the canvas is 10 x 5.625).
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeConfig {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub h: f64,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub align: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub font_face: Option<String>,
}

impl ShapeConfig {
    /// A bare region with geometry only.
    pub fn at(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            ..Self::default()
        }
    }
}

/// A region declared by a layout: a single placement, or indexed sub-regions
/// for multi-image fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Single(ShapeConfig),
    Multi(Vec<ShapeConfig>),
}

/// Region placements for one layout tag, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSpec {
    pub kind: Option<String>,
    pub font_size: Option<f64>,
    pub border_color: Option<String>,
    pub regions: IndexMap<String, Region>,
}

impl LayoutSpec {
    /// Build a layout from its raw JSON object. Values that are neither a region
    /// object nor a list of region objects are ignored.
    pub fn from_value(value: &Value) -> Self {
        let mut spec = LayoutSpec::default();
        let Some(entries) = value.as_object() else {
            return spec;
        };

        spec.kind = entries.get("type").and_then(Value::as_str).map(String::from);
        spec.font_size = entries.get("fontSize").and_then(Value::as_f64);
        spec.border_color = entries
            .get("borderColor")
            .and_then(Value::as_str)
            .map(String::from);

        for (key, raw) in entries {
            if LAYOUT_KEYS.contains(&key.as_str()) {
                continue;
            }
            let region = match raw {
                Value::Object(_) => serde_json::from_value(raw.clone()).map(Region::Single),
                Value::Array(_) => serde_json::from_value(raw.clone()).map(Region::Multi),
                _ => {
                    debug!("Ignoring non-region layout entry '{}'", key);
                    continue;
                }
            };
            match region {
                Ok(region) => {
                    spec.regions.insert(key.clone(), region);
                }
                Err(e) => warn!("Ignoring malformed region '{}': {}", key, e),
            }
        }

        spec
    }

    /// A single-placement region by key.
    pub fn region(&self, key: &str) -> Option<&ShapeConfig> {
        match self.regions.get(key) {
            Some(Region::Single(shape)) => Some(shape),
            _ => None,
        }
    }

    /// A multi-image region by key.
    pub fn multi_region(&self, key: &str) -> Option<&[ShapeConfig]> {
        match self.regions.get(key) {
            Some(Region::Multi(shapes)) => Some(shapes),
            _ => None,
        }
    }
}

/// Normalize a raw `layouts` value into a mapping keyed by layout type.
///
/// A list of `{type, ...}` records is keyed by each record's `type` (the last
/// record wins on duplicates); a mapping is returned as-is; anything else yields
/// an empty mapping. Normalizing an already-normalized value changes nothing.
pub fn normalize_layouts(raw: &Value) -> Map<String, Value> {
    match raw {
        Value::Array(entries) => {
            let mut layouts = Map::new();
            for entry in entries {
                match entry.get("type").and_then(Value::as_str) {
                    Some(kind) => {
                        layouts.insert(kind.to_string(), entry.clone());
                    }
                    None => warn!("Skipping layout entry without a `type`"),
                }
            }
            layouts
        }
        Value::Object(layouts) => layouts.clone(),
        _ => Map::new(),
    }
}

impl Template {
    /// Build a template from its raw JSON definition.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(DeckError::TemplateError(
                "template definition is not a JSON object".to_string(),
            ));
        };

        let text = |key: &str| object.get(key).and_then(Value::as_str).map(String::from);

        let style = match object.get("style") {
            Some(raw) => serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
                warn!("Ignoring malformed template style: {}", e);
                GlobalStyle::default()
            }),
            None => GlobalStyle::default(),
        };

        let layouts = normalize_layouts(object.get("layouts").unwrap_or(&Value::Null))
            .iter()
            .map(|(kind, spec)| (kind.clone(), LayoutSpec::from_value(spec)))
            .collect();

        Ok(Self {
            id: text("id"),
            name: text("name"),
            description: text("description"),
            cover_url: text("coverUrl"),
            style,
            layouts,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Read a template from a JSON file. A template without an `id` takes the file stem.
    pub fn from_file(path: &Path) -> Result<Self> {
        validate_file_exists(path)?;
        let json = fs::read_to_string(path).map_err(DeckError::FileReadError)?;
        let mut template = Self::from_json(&json)?;
        if template.id.is_none() {
            template.id = path.file_stem().map(|s| s.to_string_lossy().to_string());
        }
        Ok(template)
    }

    /// Exact-tag lookup of a layout.
    pub fn layout(&self, kind: &str) -> Option<&LayoutSpec> {
        self.layouts.get(kind)
    }

    /// Human-readable label for listings.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("(unnamed)")
    }
}

/// The set of templates a user can choose from.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    pub fn from_templates(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Load a catalog from a directory: `index.json` (a list of templates) when
    /// present, otherwise every `*.json` file in name order.
    pub fn load(dir: &Path) -> Result<Self> {
        validate_directory_exists(dir)?;

        let index = dir.join("index.json");
        if index.is_file() {
            info!("Loading template catalog from {:?}", index);
            let json = fs::read_to_string(&index).map_err(DeckError::FileReadError)?;
            let entries: Vec<Value> = serde_json::from_str(&json)?;
            let templates = entries
                .iter()
                .filter_map(|entry| match Template::from_value(entry) {
                    Ok(template) => Some(template),
                    Err(e) => {
                        warn!("Skipping catalog entry: {}", e);
                        None
                    }
                })
                .collect();
            return Ok(Self { templates });
        }

        let pattern = format!("{}/*.json", dir.to_string_lossy());
        let mut paths: Vec<_> = glob::glob(&pattern)
            .map_err(|e| DeckError::TemplateError(format!("Invalid glob pattern: {}", e)))?
            .flatten()
            .collect();
        paths.sort();

        info!("Found {} template files in {:?}", paths.len(), dir);
        let templates = paths
            .iter()
            .filter_map(|path| match Template::from_file(path) {
                Ok(template) => Some(template),
                Err(e) => {
                    warn!("Skipping template {:?}: {}", path, e);
                    None
                }
            })
            .collect();

        Ok(Self { templates })
    }

    /// Find a template by id, falling back to a name match.
    pub fn find(&self, id: &str) -> Option<&Template> {
        self.templates
            .iter()
            .find(|t| t.id.as_deref() == Some(id))
            .or_else(|| self.templates.iter().find(|t| t.name.as_deref() == Some(id)))
    }

    /// The preselected template: the first one in the catalog.
    pub fn default_template(&self) -> Option<&Template> {
        self.templates.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
