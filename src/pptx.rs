// ABOUTME: PPTX generation module for the slidecraft application
// ABOUTME: Serializes rendered slides into an Office Open XML presentation package

use crate::errors::{DeckError, Result};
use crate::model::ChartKind;
use crate::render::{
    ChartBlock, ChartSeries, DrawInstruction, Frame, ImageBlock, RenderedSlide, TableBlock,
    TextBlock, TextContent,
};
use crate::resources::ImagePayload;
use crate::style::TextStyle;
use log::info;
use quick_xml::escape::escape;
use std::collections::BTreeSet;
use std::io::{Cursor, Write};
use zip::{write::FileOptions, ZipWriter};

/// EMUs per layout unit (one inch).
pub const EMU_PER_UNIT: f64 = 914400.0;
/// 16:9 canvas, 10 x 5.625 layout units.
pub const SLIDE_WIDTH_EMU: i64 = 9144000;
pub const SLIDE_HEIGHT_EMU: i64 = 5143500;

const NS_DECL: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_CHART: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";
const REL_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXTENDED: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";

/// Configuration for PPTX generation
pub struct PptxConfig {
    pub title: String,
    pub creator: String,
}

impl Default for PptxConfig {
    fn default() -> Self {
        Self {
            title: "Presentation".to_string(),
            creator: "slidecraft".to_string(),
        }
    }
}

/// Convert layout units to EMUs.
fn emu(units: f64) -> i64 {
    (units * EMU_PER_UNIT).round() as i64
}

/// Relationship list for one package part; ids are assigned in insertion order.
#[derive(Default)]
struct Relationships {
    entries: Vec<(&'static str, String)>,
}

impl Relationships {
    fn add(&mut self, kind: &'static str, target: String) -> String {
        self.entries.push((kind, target));
        format!("rId{}", self.entries.len())
    }

    fn to_xml(&self) -> String {
        let mut xml = format!(
            "{}\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
            XML_HEADER
        );
        for (i, (kind, target)) in self.entries.iter().enumerate() {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="{}" Target="{}"/>"#,
                i + 1,
                kind,
                escape(target)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Parts produced while walking the rendered slides.
#[derive(Default)]
struct PackageParts<'a> {
    media: Vec<(String, &'a ImagePayload)>,
    charts: Vec<String>,
    slides: Vec<(String, String)>,
}

/// Serialize rendered slides into a PPTX package held in memory.
pub fn write_presentation(slides: &[RenderedSlide], config: &PptxConfig) -> Result<Vec<u8>> {
    info!("Serializing {} slides to PPTX", slides.len());

    let mut parts = PackageParts::default();
    for slide in slides {
        let (xml, rels) = slide_xml(slide, &mut parts);
        parts.slides.push((xml, rels.to_xml()));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    add_part(&mut zip, "[Content_Types].xml", &content_types_xml(&parts))?;
    add_part(&mut zip, "_rels/.rels", &package_rels_xml())?;
    add_part(&mut zip, "docProps/app.xml", &app_xml(parts.slides.len()))?;
    add_part(&mut zip, "docProps/core.xml", &core_xml(config))?;

    let mut pres_rels = Relationships::default();
    pres_rels.add(REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string());
    pres_rels.add(REL_THEME, "theme/theme1.xml".to_string());
    let slide_rel_ids: Vec<String> = (1..=parts.slides.len())
        .map(|n| pres_rels.add(REL_SLIDE, format!("slides/slide{}.xml", n)))
        .collect();
    add_part(&mut zip, "ppt/_rels/presentation.xml.rels", &pres_rels.to_xml())?;
    add_part(&mut zip, "ppt/presentation.xml", &presentation_xml(&slide_rel_ids))?;

    let mut master_rels = Relationships::default();
    master_rels.add(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string());
    master_rels.add(REL_THEME, "../theme/theme1.xml".to_string());
    add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML)?;
    add_part(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &master_rels.to_xml(),
    )?;

    let mut layout_rels = Relationships::default();
    layout_rels.add(REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml".to_string());
    add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT_XML)?;
    add_part(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &layout_rels.to_xml(),
    )?;
    add_part(&mut zip, "ppt/theme/theme1.xml", THEME_XML)?;

    for (i, (xml, rels)) in parts.slides.iter().enumerate() {
        let n = i + 1;
        add_part(&mut zip, &format!("ppt/slides/slide{}.xml", n), xml)?;
        add_part(&mut zip, &format!("ppt/slides/_rels/slide{}.xml.rels", n), rels)?;
    }

    for (name, payload) in &parts.media {
        zip.start_file(format!("ppt/media/{}", name), FileOptions::default())?;
        zip.write_all(&payload.bytes)
            .map_err(|e| DeckError::PptxError(format!("Failed to write media {}: {}", name, e)))?;
    }

    for (i, chart) in parts.charts.iter().enumerate() {
        add_part(&mut zip, &format!("ppt/charts/chart{}.xml", i + 1), chart)?;
    }

    let cursor = zip.finish()?;
    info!("PPTX package complete");
    Ok(cursor.into_inner())
}

fn add_part(zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, content: &str) -> Result<()> {
    zip.start_file(name, FileOptions::default())?;
    zip.write_all(content.as_bytes())
        .map_err(|e| DeckError::PptxError(format!("Failed to write {}: {}", name, e)))
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "image/png",
    }
}

fn content_types_xml(parts: &PackageParts<'_>) -> String {
    let extensions: BTreeSet<&str> = parts.media.iter().map(|(_, p)| p.extension()).collect();

    let mut xml = format!(
        "{}\n<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        XML_HEADER
    );
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    for ext in extensions {
        xml.push_str(&format!(
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            ext,
            content_type_for(ext)
        ));
    }
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    for n in 1..=parts.slides.len() {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            n
        ));
    }
    for n in 1..=parts.charts.len() {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/charts/chart{}.xml" ContentType="application/vnd.openxmlformats-officedocument.drawingml.chart+xml"/>"#,
            n
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn package_rels_xml() -> String {
    let mut rels = Relationships::default();
    rels.add(REL_OFFICE_DOCUMENT, "ppt/presentation.xml".to_string());
    rels.add(REL_CORE, "docProps/core.xml".to_string());
    rels.add(REL_EXTENDED, "docProps/app.xml".to_string());
    rels.to_xml()
}

fn app_xml(slide_count: usize) -> String {
    format!(
        r#"{}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>slidecraft</Application>
    <Slides>{}</Slides>
</Properties>"#,
        XML_HEADER, slide_count
    )
}

fn core_xml(config: &PptxConfig) -> String {
    format!(
        r#"{}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>{}</dc:title>
    <dc:creator>{}</dc:creator>
    <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
    <cp:revision>1</cp:revision>
</cp:coreProperties>"#,
        XML_HEADER,
        escape(&config.title),
        escape(&config.creator),
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    )
}

fn presentation_xml(slide_rel_ids: &[String]) -> String {
    let slide_ids: String = slide_rel_ids
        .iter()
        .enumerate()
        .map(|(i, rid)| format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + i, rid))
        .collect();
    let slide_list = if slide_ids.is_empty() {
        String::new()
    } else {
        format!("<p:sldIdLst>{}</p:sldIdLst>", slide_ids)
    };

    format!(
        r#"{header}
<p:presentation {ns}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{slides}<p:sldSz cx="{cx}" cy="{cy}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        header = XML_HEADER,
        ns = NS_DECL,
        slides = slide_list,
        cx = SLIDE_WIDTH_EMU,
        cy = SLIDE_HEIGHT_EMU
    )
}

/// Build one slide part, registering its media and charts with the package.
fn slide_xml<'a>(slide: &'a RenderedSlide, parts: &mut PackageParts<'a>) -> (String, Relationships) {
    let mut rels = Relationships::default();
    rels.add(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string());

    let mut xml = format!("{}\n<p:sld {}><p:cSld>", XML_HEADER, NS_DECL);

    if let Some(color) = &slide.background {
        xml.push_str(&format!(
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
            color
        ));
    }

    xml.push_str(concat!(
        "<p:spTree>",
        r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    ));

    // id 1 is the group shape
    for (i, element) in slide.elements.iter().enumerate() {
        let shape_id = i + 2;
        match element {
            DrawInstruction::Text(block) => write_text_shape(&mut xml, shape_id, block),
            DrawInstruction::Image(block) => {
                let name = format!("image{}.{}", parts.media.len() + 1, block.image.extension());
                let rid = rels.add(REL_IMAGE, format!("../media/{}", name));
                parts.media.push((name, &block.image));
                write_picture(&mut xml, shape_id, block, &rid);
            }
            DrawInstruction::Table(block) => write_table(&mut xml, shape_id, block),
            DrawInstruction::Chart(block) => {
                parts.charts.push(chart_xml(block));
                let rid = rels.add(REL_CHART, format!("../charts/chart{}.xml", parts.charts.len()));
                write_chart_frame(&mut xml, shape_id, block.frame, &rid);
            }
        }
    }

    xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    (xml, rels)
}

fn xfrm(tag: &str, frame: Frame) -> String {
    format!(
        r#"<{tag}><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></{tag}>"#,
        emu(frame.x),
        emu(frame.y),
        emu(frame.w),
        emu(frame.h),
        tag = tag
    )
}

/// Run properties shared by text boxes and table cells.
fn run_properties(style: &TextStyle, bold: bool) -> String {
    format!(
        r#"<a:rPr lang="en-US" sz="{}" b="{}" i="{}" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{}"/></a:rPr>"#,
        (style.font_size * 100.0).round() as i64,
        if bold { 1 } else { 0 },
        if style.italic { 1 } else { 0 },
        style.color,
        escape(&style.font_face)
    )
}

fn paragraph(text: &str, style: &TextStyle, bold: bool, bullet: bool) -> String {
    let size = (style.font_size * 100.0).round() as i64;
    let props = if bullet {
        format!(
            r#"<a:pPr marL="285750" indent="-285750" algn="{}"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/></a:pPr>"#,
            style.align.ooxml()
        )
    } else {
        format!(r#"<a:pPr algn="{}"><a:buNone/></a:pPr>"#, style.align.ooxml())
    };

    if text.is_empty() {
        return format!(r#"<a:p>{}<a:endParaRPr lang="en-US" sz="{}"/></a:p>"#, props, size);
    }
    format!(
        "<a:p>{}<a:r>{}<a:t>{}</a:t></a:r></a:p>",
        props,
        run_properties(style, bold),
        escape(text)
    )
}

fn write_text_shape(xml: &mut String, shape_id: usize, block: &TextBlock) {
    xml.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#,
        id = shape_id
    ));
    xml.push_str("<p:spPr>");
    xml.push_str(&xfrm("a:xfrm", block.frame));
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);
    xml.push_str(r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#);

    match &block.content {
        TextContent::Plain(text) => {
            for line in text.split('\n') {
                xml.push_str(&paragraph(line, &block.style, block.style.bold, false));
            }
        }
        TextContent::Bullets(items) => {
            for item in items {
                xml.push_str(&paragraph(item, &block.style, block.style.bold, true));
            }
        }
    }

    xml.push_str("</p:txBody></p:sp>");
}

fn write_picture(xml: &mut String, shape_id: usize, block: &ImageBlock, rid: &str) {
    xml.push_str(&format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
        id = shape_id
    ));
    xml.push_str(&format!(
        r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
        rid
    ));
    xml.push_str("<p:spPr>");
    xml.push_str(&xfrm("a:xfrm", block.frame));
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
}

fn cell_border(tag: &str, color: &str) -> String {
    format!(
        r#"<{tag} w="12700"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></{tag}>"#,
        color,
        tag = tag
    )
}

fn write_table(xml: &mut String, shape_id: usize, block: &TableBlock) {
    let columns = block.rows.first().map(Vec::len).unwrap_or(0).max(1);
    let col_width = emu(block.frame.w) / columns as i64;
    let row_height = emu(block.frame.h) / block.rows.len().max(1) as i64;

    xml.push_str(&format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Table {id}"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr>"#,
        id = shape_id
    ));
    xml.push_str(&xfrm("p:xfrm", block.frame));
    xml.push_str(r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid>"#);
    for _ in 0..columns {
        xml.push_str(&format!(r#"<a:gridCol w="{}"/>"#, col_width));
    }
    xml.push_str("</a:tblGrid>");

    let borders: String = ["a:lnL", "a:lnR", "a:lnT", "a:lnB"]
        .iter()
        .map(|tag| cell_border(tag, &block.border_color))
        .collect();

    for row in &block.rows {
        xml.push_str(&format!(r#"<a:tr h="{}">"#, row_height));
        for cell in row {
            xml.push_str("<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>");
            xml.push_str(&paragraph(&cell.text, &block.style, cell.bold || block.style.bold, false));
            xml.push_str(&format!("</a:txBody><a:tcPr>{}</a:tcPr></a:tc>", borders));
        }
        xml.push_str("</a:tr>");
    }

    xml.push_str("</a:tbl></a:graphicData></a:graphic></p:graphicFrame>");
}

fn write_chart_frame(xml: &mut String, shape_id: usize, frame: Frame, rid: &str) {
    xml.push_str(&format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Chart {id}"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>"#,
        id = shape_id
    ));
    xml.push_str(&xfrm("p:xfrm", frame));
    xml.push_str(&format!(
        r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="{}"/></a:graphicData></a:graphic></p:graphicFrame>"#,
        rid
    ));
}

const CAT_AXIS_ID: u32 = 111;
const VAL_AXIS_ID: u32 = 222;

fn string_literal(values: &[String]) -> String {
    let mut xml = format!(r#"<c:strLit><c:ptCount val="{}"/>"#, values.len());
    for (i, value) in values.iter().enumerate() {
        xml.push_str(&format!(r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, i, escape(value)));
    }
    xml.push_str("</c:strLit>");
    xml
}

fn number_literal(values: &[f64]) -> String {
    let mut xml = format!(
        r#"<c:numLit><c:formatCode>General</c:formatCode><c:ptCount val="{}"/>"#,
        values.len()
    );
    for (i, value) in values.iter().enumerate() {
        xml.push_str(&format!(r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, i, value));
    }
    xml.push_str("</c:numLit>");
    xml
}

fn series_xml(kind: ChartKind, index: usize, series: &ChartSeries) -> String {
    let mut xml = format!(
        r#"<c:ser><c:idx val="{i}"/><c:order val="{i}"/><c:tx><c:v>{}</c:v></c:tx>"#,
        escape(&series.name),
        i = index
    );
    let ys: Vec<f64> = series.values.iter().map(|p| p.y()).collect();

    match kind {
        ChartKind::Scatter => {
            let xs: Vec<f64> = series
                .values
                .iter()
                .enumerate()
                .map(|(i, p)| p.x().unwrap_or((i + 1) as f64))
                .collect();
            xml.push_str(r#"<c:spPr><a:ln w="19050"><a:noFill/></a:ln></c:spPr>"#);
            xml.push_str(&format!("<c:xVal>{}</c:xVal>", number_literal(&xs)));
            xml.push_str(&format!("<c:yVal>{}</c:yVal>", number_literal(&ys)));
            xml.push_str(r#"<c:smooth val="0"/>"#);
        }
        ChartKind::Bar => {
            xml.push_str(r#"<c:invertIfNegative val="0"/>"#);
            xml.push_str(&format!("<c:cat>{}</c:cat>", string_literal(&series.categories())));
            xml.push_str(&format!("<c:val>{}</c:val>", number_literal(&ys)));
        }
        ChartKind::Line => {
            xml.push_str(&format!("<c:cat>{}</c:cat>", string_literal(&series.categories())));
            xml.push_str(&format!("<c:val>{}</c:val>", number_literal(&ys)));
            xml.push_str(r#"<c:smooth val="0"/>"#);
        }
        ChartKind::Pie => {
            xml.push_str(&format!("<c:cat>{}</c:cat>", string_literal(&series.categories())));
            xml.push_str(&format!("<c:val>{}</c:val>", number_literal(&ys)));
        }
    }

    xml.push_str("</c:ser>");
    xml
}

fn axes_xml(kind: ChartKind) -> String {
    let value_axis = |id: u32, cross: u32, pos: &str, between: &str| {
        format!(
            r#"<c:valAx><c:axId val="{}"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="0"/><c:axPos val="{}"/><c:majorGridlines/><c:numFmt formatCode="General" sourceLinked="0"/><c:majorTickMark val="out"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/><c:crossAx val="{}"/><c:crosses val="autoZero"/><c:crossBetween val="{}"/></c:valAx>"#,
            id, pos, cross, between
        )
    };

    match kind {
        ChartKind::Pie => String::new(),
        ChartKind::Scatter => format!(
            "{}{}",
            value_axis(CAT_AXIS_ID, VAL_AXIS_ID, "b", "midCat"),
            value_axis(VAL_AXIS_ID, CAT_AXIS_ID, "l", "midCat")
        ),
        ChartKind::Bar | ChartKind::Line => format!(
            r#"<c:catAx><c:axId val="{}"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="0"/><c:axPos val="b"/><c:numFmt formatCode="General" sourceLinked="0"/><c:majorTickMark val="out"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/><c:crossAx val="{}"/><c:crosses val="autoZero"/><c:auto val="1"/><c:lblAlgn val="ctr"/><c:lblOffset val="100"/><c:noMultiLvlLbl val="0"/></c:catAx>{}"#,
            CAT_AXIS_ID,
            VAL_AXIS_ID,
            value_axis(VAL_AXIS_ID, CAT_AXIS_ID, "l", "between")
        ),
    }
}

/// Chart part with literal (workbook-free) data caches.
fn chart_xml(block: &ChartBlock) -> String {
    let series: String = block
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| series_xml(block.kind, i, s))
        .collect();
    let axis_ids = format!(r#"<c:axId val="{}"/><c:axId val="{}"/>"#, CAT_AXIS_ID, VAL_AXIS_ID);

    let plot = match block.kind {
        ChartKind::Bar => format!(
            r#"<c:barChart><c:barDir val="col"/><c:grouping val="clustered"/><c:varyColors val="0"/>{}<c:gapWidth val="150"/>{}</c:barChart>"#,
            series, axis_ids
        ),
        ChartKind::Line => format!(
            r#"<c:lineChart><c:grouping val="standard"/><c:varyColors val="0"/>{}<c:marker val="1"/>{}</c:lineChart>"#,
            series, axis_ids
        ),
        ChartKind::Pie => format!(
            r#"<c:pieChart><c:varyColors val="1"/>{}<c:firstSliceAng val="0"/></c:pieChart>"#,
            series
        ),
        ChartKind::Scatter => format!(
            r#"<c:scatterChart><c:scatterStyle val="lineMarker"/><c:varyColors val="0"/>{}{}</c:scatterChart>"#,
            series, axis_ids
        ),
    };

    let legend = if block.show_legend {
        r#"<c:legend><c:legendPos val="b"/><c:overlay val="0"/></c:legend>"#
    } else {
        ""
    };

    format!(
        r#"{header}
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><c:roundedCorners val="0"/><c:chart><c:autoTitleDeleted val="1"/><c:plotArea><c:layout/>{plot}{axes}</c:plotArea>{legend}<c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/></c:chart><c:txPr><a:bodyPr/><a:lstStyle/><a:p><a:pPr><a:defRPr sz="{size}"/></a:pPr><a:endParaRPr lang="en-US"/></a:p></c:txPr></c:chartSpace>"#,
        header = XML_HEADER,
        plot = plot,
        axes = axes_xml(block.kind),
        legend = legend,
        size = (block.font_size * 100.0).round() as i64
    )
}

const SLIDE_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="slidecraft"><a:themeElements><a:clrScheme name="slidecraft"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="slidecraft"><a:majorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="slidecraft"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;
