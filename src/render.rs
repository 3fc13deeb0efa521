// ABOUTME: Slide rendering module for the slidecraft application
// ABOUTME: Merges slide content with template regions into positioned draw instructions

use crate::errors::{DeckError, Result};
use crate::model::{
    ChartContent, ChartKind, Comparison, DataPoint, FieldValue, Slide, SlideFields, TableCell, TableData,
};
use crate::resources::{AssetResolver, ImagePayload};
use crate::style::{hex_color, layered, TextStyle, DEFAULT_BORDER_COLOR};
use crate::template::{GlobalStyle, LayoutSpec, Region, ShapeConfig};
use log::{debug, warn};
use std::collections::HashSet;

/// Position and size in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl From<&ShapeConfig> for Frame {
    fn from(shape: &ShapeConfig) -> Self {
        Self {
            x: shape.x,
            y: shape.y,
            w: shape.w,
            h: shape.h,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextContent {
    Plain(String),
    Bullets(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub frame: Frame,
    pub content: TextContent,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub frame: Frame,
    pub image: ImagePayload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    pub text: String,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub frame: Frame,
    /// Rectangular grid: every row has the same number of cells.
    pub rows: Vec<Vec<RenderedCell>>,
    pub style: TextStyle,
    pub border_color: String,
}

/// One chart series: a dataset with the shared category labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<DataPoint>,
}

impl ChartSeries {
    /// Category names, one per value: the shared label when present, otherwise the
    /// point's x value, otherwise its 1-based position.
    pub fn categories(&self) -> Vec<String> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, point)| match (self.labels.get(i), point.x()) {
                (Some(label), _) => label.clone(),
                (None, Some(x)) => x.to_string(),
                (None, None) => (i + 1).to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBlock {
    pub frame: Frame,
    pub kind: ChartKind,
    pub series: Vec<ChartSeries>,
    pub font_size: f64,
    /// Legends are placed at the bottom of the chart.
    pub show_legend: bool,
}

/// A single positioned drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction {
    Text(TextBlock),
    Image(ImageBlock),
    Table(TableBlock),
    Chart(ChartBlock),
}

/// Everything needed to draw one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlide {
    pub layout: String,
    pub background: Option<String>,
    pub elements: Vec<DrawInstruction>,
}

impl RenderedSlide {
    pub fn new(layout: &str) -> Self {
        Self {
            layout: layout.to_string(),
            background: None,
            elements: Vec::new(),
        }
    }
}

fn fallback_chart_region() -> ShapeConfig {
    ShapeConfig::at(1.0, 1.2, 8.0, 4.0)
}

fn fallback_table_region() -> ShapeConfig {
    ShapeConfig::at(1.0, 1.0, 8.0, 4.0)
}

fn fallback_title_region() -> ShapeConfig {
    ShapeConfig::at(0.5, 0.3, 9.0, 0.5)
}

/// Renders slides against one template's global style.
pub struct SlideRenderer<'a> {
    global: &'a GlobalStyle,
    resolver: &'a AssetResolver,
}

impl<'a> SlideRenderer<'a> {
    pub fn new(global: &'a GlobalStyle, resolver: &'a AssetResolver) -> Self {
        Self { global, resolver }
    }

    /// Render one slide with its matched layout. Never fails: a chart or table body
    /// that cannot be built is logged and left out, keeping the slide in place.
    pub fn render(&self, slide: &Slide, layout: &LayoutSpec) -> RenderedSlide {
        let mut rendered = RenderedSlide::new(slide.layout());

        let body = match slide {
            Slide::Chart {
                fields,
                content: Some(content),
            } => content
                .parsed()
                .map_err(|reason| DeckError::ChartError(reason.to_string()))
                .and_then(|content| self.chart_body(fields, content, layout)),
            Slide::Table {
                fields,
                table: Some(table),
            } => match table.parsed() {
                Ok(TableData { data: Some(rows) }) => self.table_body(fields, rows, layout),
                Ok(TableData { data: None }) => Ok(self.generic_body(fields, layout)),
                Err(reason) => Err(DeckError::TableError(reason.to_string())),
            },
            Slide::Comparison {
                fields,
                comparison: Some(comparison),
            } => match comparison.parsed() {
                Ok(comparison) => Ok(self.comparison_body(fields, comparison, layout)),
                Err(reason) => Err(DeckError::ContentMapError(reason.to_string())),
            },
            _ => Ok(self.generic_body(slide.fields(), layout)),
        };

        match body {
            Ok(elements) => rendered.elements = elements,
            Err(e) => warn!(
                "Skipping body of {} slide '{}': {}",
                slide.layout(),
                slide.title().unwrap_or(""),
                e
            ),
        }

        rendered
    }

    fn chart_body(
        &self,
        fields: &SlideFields,
        content: &ChartContent,
        layout: &LayoutSpec,
    ) -> Result<Vec<DrawInstruction>> {
        let datasets = content
            .datasets
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| DeckError::ChartError("chart has no datasets".to_string()))?;

        let labels = content.labels.clone().unwrap_or_default();
        let mut series = Vec::with_capacity(datasets.len());
        for dataset in datasets {
            let points = dataset.data.iter().filter(|p| p.x().is_some()).count();
            if points != 0 && points != dataset.data.len() {
                return Err(DeckError::ChartError(format!(
                    "dataset '{}' mixes plain values and points",
                    dataset.label
                )));
            }
            series.push(ChartSeries {
                name: dataset.label.clone(),
                labels: labels.clone(),
                values: dataset.data.clone(),
            });
        }

        let region = layout
            .region("chart")
            .cloned()
            .unwrap_or_else(fallback_chart_region);
        let font_size = crate::style::font_size(region.font_size.or(layout.font_size), self.global);

        let mut elements = vec![DrawInstruction::Chart(ChartBlock {
            frame: Frame::from(&region),
            kind: ChartKind::from_name(content.kind.as_deref()),
            series,
            font_size,
            show_legend: true,
        })];
        self.push_title(fields, layout, &mut elements);
        Ok(elements)
    }

    fn table_body(
        &self,
        fields: &SlideFields,
        rows: &[Vec<TableCell>],
        layout: &LayoutSpec,
    ) -> Result<Vec<DrawInstruction>> {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return Err(DeckError::TableError("table has no cells".to_string()));
        }

        let grid = rows
            .iter()
            .map(|row| {
                let mut cells: Vec<RenderedCell> = row
                    .iter()
                    .map(|cell| RenderedCell {
                        text: cell.text(),
                        bold: cell.is_bold(),
                    })
                    .collect();
                cells.resize_with(columns, || RenderedCell {
                    text: String::new(),
                    bold: false,
                });
                cells
            })
            .collect();

        let region = layout
            .region("table")
            .cloned()
            .unwrap_or_else(fallback_table_region);
        let border_color = layered(
            region.border_color.as_deref().and_then(hex_color),
            layout.border_color.as_deref().and_then(hex_color),
            DEFAULT_BORDER_COLOR.to_string(),
        );

        let mut elements = vec![DrawInstruction::Table(TableBlock {
            frame: Frame::from(&region),
            rows: grid,
            style: TextStyle::resolve(&region, self.global),
            border_color,
        })];
        self.push_title(fields, layout, &mut elements);
        Ok(elements)
    }

    fn comparison_body(
        &self,
        fields: &SlideFields,
        comparison: &Comparison,
        layout: &LayoutSpec,
    ) -> Vec<DrawInstruction> {
        let side = |s: &Option<crate::model::ComparisonSide>| {
            s.as_ref()
                .map(|s| (s.title.clone(), s.description.clone()))
                .unwrap_or_default()
        };
        let (left_title, left_description) = side(&comparison.left);
        let (right_title, right_description) = side(&comparison.right);

        let parts = [
            ("leftTitle", left_title),
            ("leftDescription", left_description),
            ("rightTitle", right_title),
            ("rightDescription", right_description),
            ("title", fields.title.clone()),
        ];

        parts
            .iter()
            .filter_map(|(key, value)| {
                let value = value.as_deref().filter(|v| !v.is_empty())?;
                let region = layout.region(key)?;
                Some(self.text_block(FieldValue::Text(value), region))
            })
            .collect()
    }

    /// Walk the layout's regions in declaration order, drawing every region whose
    /// same-named slide field is populated.
    fn generic_body(&self, fields: &SlideFields, layout: &LayoutSpec) -> Vec<DrawInstruction> {
        let mut elements = Vec::new();
        let mut drawn: HashSet<&str> = HashSet::new();

        for (key, region) in &layout.regions {
            let key = key.as_str();
            if drawn.contains(key) {
                continue;
            }
            let Some(value) = fields.field(key) else {
                debug!("No content for region '{}'", key);
                continue;
            };

            match (key, region, value) {
                ("imageUrl", Region::Single(shape), FieldValue::Text(reference)) => {
                    elements.push(DrawInstruction::Image(ImageBlock {
                        frame: Frame::from(shape),
                        image: self.resolver.resolve(reference),
                    }));
                }
                ("images", Region::Multi(shapes), FieldValue::List(references)) => {
                    let images = self.resolver.resolve_all(&references);
                    for (i, image) in images.into_iter().enumerate() {
                        match shapes.get(i) {
                            Some(shape) => elements.push(DrawInstruction::Image(ImageBlock {
                                frame: Frame::from(shape),
                                image,
                            })),
                            None => debug!("No sub-region for image {} of 'images'", i + 1),
                        }
                    }
                    if let (false, Some(description), Some(shape)) = (
                        drawn.contains("description"),
                        fields.field("description"),
                        layout.region("description"),
                    ) {
                        elements.push(self.text_block(description, shape));
                        drawn.insert("description");
                    }
                }
                ("imageUrl", ..) | ("images", ..) => {
                    debug!("Region '{}' does not match its image content, skipping", key);
                }
                (_, Region::Single(shape), value) => {
                    elements.push(self.text_block(value, shape));
                }
                (_, Region::Multi(_), _) => {
                    debug!("Multi-image region '{}' holds no images, skipping", key);
                }
            }
            drawn.insert(key);
        }

        elements
    }

    fn push_title(&self, fields: &SlideFields, layout: &LayoutSpec, elements: &mut Vec<DrawInstruction>) {
        if let Some(title) = fields.field("title") {
            let fallback = fallback_title_region();
            let region = layout.region("title").unwrap_or(&fallback);
            elements.push(self.text_block(title, region));
        }
    }

    fn text_block(&self, value: FieldValue<'_>, shape: &ShapeConfig) -> DrawInstruction {
        let content = match value {
            FieldValue::Text(text) => TextContent::Plain(text.to_string()),
            FieldValue::List(items) => TextContent::Bullets(items.iter().map(|s| s.to_string()).collect()),
        };
        DrawInstruction::Text(TextBlock {
            frame: Frame::from(shape),
            content,
            style: TextStyle::resolve(shape, self.global),
        })
    }
}
