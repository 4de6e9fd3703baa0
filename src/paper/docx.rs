//! WordprocessingML package writer.
//!
//! Models the constructs the paper layout uses (styled and aligned paragraphs,
//! grid tables, Office Math and inline pictures) and serializes each package part
//! through [`quick_xml::Writer`] before packing them into a zip container.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::{Reader, Writer};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::images::{ImageFormat, ImageInfo};
use crate::error::Result;

type PartWriter = Writer<Vec<u8>>;
type XmlResult = quick_xml::Result<()>;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_PICTURE: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

const DOCUMENT_NAMESPACES: [(&str, &str); 6] = [
    ("xmlns:w", NS_MAIN),
    ("xmlns:r", NS_RELATIONSHIPS),
    (
        "xmlns:m",
        "http://schemas.openxmlformats.org/officeDocument/2006/math",
    ),
    (
        "xmlns:wp",
        "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing",
    ),
    (
        "xmlns:a",
        "http://schemas.openxmlformats.org/drawingml/2006/main",
    ),
    ("xmlns:pic", NS_PICTURE),
];

const MAIN_DOCUMENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const STYLES_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

const BORDER_EDGES: [&str; 6] = [
    "w:top",
    "w:left",
    "w:bottom",
    "w:right",
    "w:insideH",
    "w:insideV",
];

const BODY_FONTS: [(&str, &str); 3] = [
    ("w:ascii", "Calibri"),
    ("w:hAnsi", "Calibri"),
    ("w:cs", "Calibri"),
];

/// Default cell padding, in twips
const TABLE_CELL_MARGINS: [(&str, &str); 4] = [
    ("w:top", "0"),
    ("w:left", "108"),
    ("w:bottom", "0"),
    ("w:right", "108"),
];

/// One inch in twentieths of a point
pub const TWIPS_PER_INCH: u32 = 1440;
/// US Letter, in twips
const PAGE_SIZE_TWIPS: (u32, u32) = (12240, 15840);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    /// Office Math fragment accepted by [`sanitize_omml`]
    Math(String),
    Picture(PictureRef),
}

/// Handle to an image registered with [`DocxBuilder::add_image`]
#[derive(Debug, Clone, PartialEq)]
pub struct PictureRef {
    rel_id: String,
    doc_pr_id: u32,
    name: String,
    width_emu: u64,
    height_emu: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    style: Option<&'static str>,
    alignment: Option<Alignment>,
    inlines: Vec<Inline>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new().push(Inline::Text(text.into()))
    }

    pub fn styled(mut self, style: &'static str) -> Self {
        self.style = Some(style);
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn push(mut self, inline: Inline) -> Self {
        self.inlines.push(inline);
        self
    }

    fn write_xml(&self, w: &mut PartWriter) -> XmlResult {
        if self.style.is_none() && self.alignment.is_none() && self.inlines.is_empty() {
            return empty(w, "w:p", &[]);
        }
        element(w, "w:p", |w| {
            if self.style.is_some() || self.alignment.is_some() {
                element(w, "w:pPr", |w| {
                    if let Some(style) = self.style {
                        val(w, "w:pStyle", style)?;
                    }
                    if let Some(alignment) = self.alignment {
                        val(w, "w:jc", alignment.as_str())?;
                    }
                    Ok(())
                })?;
            }
            for inline in &self.inlines {
                match inline {
                    Inline::Text(text) => write_text_run(w, text)?,
                    Inline::Math(omml) => write_math(w, omml)?,
                    Inline::Picture(picture) => write_picture_run(w, picture)?,
                }
            }
            Ok(())
        })
    }
}

/// Table cell; an empty cell still gets the paragraph Word requires
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    paragraphs: Vec<Paragraph>,
}

impl TableCell {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    pub fn text(text: impl Into<String>, alignment: Option<Alignment>) -> Self {
        let mut paragraph = Paragraph::text(text);
        paragraph.alignment = alignment;
        Self::new(vec![paragraph])
    }

    fn write_xml(&self, w: &mut PartWriter, width: Option<u32>) -> XmlResult {
        element(w, "w:tc", |w| {
            if let Some(width) = width {
                element(w, "w:tcPr", |w| {
                    empty(
                        w,
                        "w:tcW",
                        &[("w:w", width.to_string().as_str()), ("w:type", "dxa")],
                    )
                })?;
            }
            if self.paragraphs.is_empty() {
                empty(w, "w:p", &[])?;
            }
            for paragraph in &self.paragraphs {
                paragraph.write_xml(w)?;
            }
            Ok(())
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    column_widths: Vec<u32>,
    rows: Vec<Vec<TableCell>>,
}

impl Table {
    /// `column_widths` in twips; every row must have the same number of cells
    pub fn new(column_widths: Vec<u32>) -> Self {
        Self {
            column_widths,
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, cells: Vec<TableCell>) -> Self {
        self.rows.push(cells);
        self
    }

    pub fn push_row(&mut self, cells: Vec<TableCell>) {
        self.rows.push(cells);
    }

    fn write_xml(&self, w: &mut PartWriter) -> XmlResult {
        element(w, "w:tbl", |w| {
            element(w, "w:tblPr", |w| {
                val(w, "w:tblStyle", "TableGrid")?;
                empty(w, "w:tblW", &[("w:w", "0"), ("w:type", "auto")])?;
                write_grid_borders(w)
            })?;
            element(w, "w:tblGrid", |w| {
                for width in &self.column_widths {
                    empty(w, "w:gridCol", &[("w:w", width.to_string().as_str())])?;
                }
                Ok(())
            })?;
            for row in &self.rows {
                element(w, "w:tr", |w| {
                    for (index, cell) in row.iter().enumerate() {
                        cell.write_xml(w, self.column_widths.get(index).copied())?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone)]
struct MediaPart {
    rel_id: String,
    file_name: String,
    bytes: Vec<u8>,
}

/// Accumulates body blocks and media, then packs the `.docx`
#[derive(Debug, Clone)]
pub struct DocxBuilder {
    blocks: Vec<Block>,
    media: Vec<MediaPart>,
    margin_twips: u32,
}

impl Default for DocxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            media: Vec::new(),
            margin_twips: TWIPS_PER_INCH,
        }
    }

    pub fn paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Register image bytes as a media part and return an inline reference
    pub fn add_image(&mut self, bytes: Vec<u8>, info: &ImageInfo) -> Inline {
        let index = self.media.len() + 1;
        // rId1 is reserved for styles
        let rel_id = format!("rId{}", index + 1);
        let file_name = format!("image{index}.{}", info.format.extension());
        let (width_emu, height_emu) = info.display_size_emu();

        self.media.push(MediaPart {
            rel_id: rel_id.clone(),
            file_name: file_name.clone(),
            bytes,
        });

        Inline::Picture(PictureRef {
            rel_id,
            doc_pr_id: index as u32,
            name: file_name,
            width_emu,
            height_emu,
        })
    }

    fn document_xml(&self) -> quick_xml::Result<Vec<u8>> {
        xml_part(|w| {
            w.create_element("w:document")
                .with_attributes(DOCUMENT_NAMESPACES)
                .write_inner_content(|w| {
                    element(w, "w:body", |w| {
                        for block in &self.blocks {
                            match block {
                                Block::Paragraph(paragraph) => paragraph.write_xml(w)?,
                                Block::Table(table) => table.write_xml(w)?,
                            }
                        }
                        self.write_section(w)
                    })
                })?;
            Ok(())
        })
    }

    fn write_section(&self, w: &mut PartWriter) -> XmlResult {
        let margin = self.margin_twips.to_string();
        let (page_width, page_height) = PAGE_SIZE_TWIPS;
        element(w, "w:sectPr", |w| {
            empty(
                w,
                "w:pgSz",
                &[
                    ("w:w", page_width.to_string().as_str()),
                    ("w:h", page_height.to_string().as_str()),
                ],
            )?;
            empty(
                w,
                "w:pgMar",
                &[
                    ("w:top", margin.as_str()),
                    ("w:right", margin.as_str()),
                    ("w:bottom", margin.as_str()),
                    ("w:left", margin.as_str()),
                    ("w:header", "720"),
                    ("w:footer", "720"),
                    ("w:gutter", "0"),
                ],
            )
        })
    }

    fn document_rels_xml(&self) -> quick_xml::Result<Vec<u8>> {
        let styles_type = format!("{NS_RELATIONSHIPS}/styles");
        let image_type = format!("{NS_RELATIONSHIPS}/image");
        xml_part(|w| {
            w.create_element("Relationships")
                .with_attribute(("xmlns", NS_PACKAGE_RELATIONSHIPS))
                .write_inner_content(|w| {
                    relationship(w, "rId1", &styles_type, "styles.xml")?;
                    for part in &self.media {
                        let target = format!("media/{}", part.file_name);
                        relationship(w, &part.rel_id, &image_type, &target)?;
                    }
                    Ok::<(), quick_xml::Error>(())
                })?;
            Ok(())
        })
    }

    /// Pack every part into a zip container
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let parts = [
            ("[Content_Types].xml", content_types_xml()?),
            ("_rels/.rels", package_rels_xml()?),
            ("word/document.xml", self.document_xml()?),
            ("word/styles.xml", styles_xml()?),
            ("word/_rels/document.xml.rels", self.document_rels_xml()?),
        ];
        for (name, xml) in parts {
            zip.start_file(name, options)?;
            zip.write_all(&xml)?;
        }

        for part in &self.media {
            // Already-compressed formats are stored as-is
            let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file(format!("word/media/{}", part.file_name), stored)?;
            zip.write_all(&part.bytes)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

fn xml_part(body: impl FnOnce(&mut PartWriter) -> XmlResult) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    body(&mut writer)?;
    Ok(writer.into_inner())
}

fn element(
    w: &mut PartWriter,
    name: &str,
    inner: impl FnOnce(&mut PartWriter) -> XmlResult,
) -> XmlResult {
    w.create_element(name).write_inner_content(inner)?;
    Ok(())
}

fn empty(w: &mut PartWriter, name: &str, attributes: &[(&str, &str)]) -> XmlResult {
    w.create_element(name)
        .with_attributes(attributes.iter().copied())
        .write_empty()?;
    Ok(())
}

/// `<name w:val="value"/>`
fn val(w: &mut PartWriter, name: &str, value: &str) -> XmlResult {
    empty(w, name, &[("w:val", value)])
}

fn relationship(w: &mut PartWriter, id: &str, rel_type: &str, target: &str) -> XmlResult {
    empty(
        w,
        "Relationship",
        &[("Id", id), ("Type", rel_type), ("Target", target)],
    )
}

fn write_grid_borders(w: &mut PartWriter) -> XmlResult {
    element(w, "w:tblBorders", |w| {
        for edge in BORDER_EDGES {
            empty(
                w,
                edge,
                &[
                    ("w:val", "single"),
                    ("w:sz", "4"),
                    ("w:space", "0"),
                    ("w:color", "000000"),
                ],
            )?;
        }
        Ok(())
    })
}

fn write_text_run(w: &mut PartWriter, text: &str) -> XmlResult {
    element(w, "w:r", |w| {
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                empty(w, "w:br", &[])?;
            }
            w.create_element("w:t")
                .with_attribute(("xml:space", "preserve"))
                .write_text_content(BytesText::new(line.trim_end_matches('\r')))?;
        }
        Ok(())
    })
}

/// Re-emit a sanitized fragment event by event
fn write_math(w: &mut PartWriter, omml: &str) -> XmlResult {
    let mut reader = Reader::from_str(omml);
    loop {
        match reader.read_event()? {
            Event::Eof => return Ok(()),
            event => w.write_event(event)?,
        }
    }
}

fn write_picture_run(w: &mut PartWriter, picture: &PictureRef) -> XmlResult {
    let id = picture.doc_pr_id.to_string();
    let cx = picture.width_emu.to_string();
    let cy = picture.height_emu.to_string();
    let label = format!("Picture {id}");

    element(w, "w:r", |w| {
        element(w, "w:drawing", |w| {
            w.create_element("wp:inline")
                .with_attributes([("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")])
                .write_inner_content(|w| {
                    empty(w, "wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
                    empty(w, "wp:docPr", &[("id", id.as_str()), ("name", label.as_str())])?;
                    element(w, "a:graphic", |w| {
                        w.create_element("a:graphicData")
                            .with_attribute(("uri", NS_PICTURE))
                            .write_inner_content(|w| {
                                element(w, "pic:pic", |w| write_picture(w, picture, &id, &cx, &cy))
                            })?;
                        Ok(())
                    })
                })?;
            Ok(())
        })
    })
}

fn write_picture(
    w: &mut PartWriter,
    picture: &PictureRef,
    id: &str,
    cx: &str,
    cy: &str,
) -> XmlResult {
    element(w, "pic:nvPicPr", |w| {
        empty(w, "pic:cNvPr", &[("id", id), ("name", picture.name.as_str())])?;
        empty(w, "pic:cNvPicPr", &[])
    })?;
    element(w, "pic:blipFill", |w| {
        empty(w, "a:blip", &[("r:embed", picture.rel_id.as_str())])?;
        element(w, "a:stretch", |w| empty(w, "a:fillRect", &[]))
    })?;
    element(w, "pic:spPr", |w| {
        element(w, "a:xfrm", |w| {
            empty(w, "a:off", &[("x", "0"), ("y", "0")])?;
            empty(w, "a:ext", &[("cx", cx), ("cy", cy)])
        })?;
        w.create_element("a:prstGeom")
            .with_attribute(("prst", "rect"))
            .write_inner_content(|w| empty(w, "a:avLst", &[]))?;
        Ok(())
    })
}

fn content_types_xml() -> quick_xml::Result<Vec<u8>> {
    let image_formats = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Gif];
    xml_part(|w| {
        w.create_element("Types")
            .with_attribute(("xmlns", NS_CONTENT_TYPES))
            .write_inner_content(|w| {
                let defaults = [
                    ("rels", "application/vnd.openxmlformats-package.relationships+xml"),
                    ("xml", "application/xml"),
                ];
                for (extension, content_type) in defaults {
                    content_default(w, extension, content_type)?;
                }
                for format in image_formats {
                    let content_type = format!("image/{}", format.extension());
                    content_default(w, format.extension(), &content_type)?;
                }
                for (part, content_type) in [
                    ("/word/document.xml", MAIN_DOCUMENT_TYPE),
                    ("/word/styles.xml", STYLES_TYPE),
                ] {
                    empty(
                        w,
                        "Override",
                        &[("PartName", part), ("ContentType", content_type)],
                    )?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

fn content_default(w: &mut PartWriter, extension: &str, content_type: &str) -> XmlResult {
    empty(
        w,
        "Default",
        &[("Extension", extension), ("ContentType", content_type)],
    )
}

fn package_rels_xml() -> quick_xml::Result<Vec<u8>> {
    let document_type = format!("{NS_RELATIONSHIPS}/officeDocument");
    xml_part(|w| {
        w.create_element("Relationships")
            .with_attribute(("xmlns", NS_PACKAGE_RELATIONSHIPS))
            .write_inner_content(|w| {
                relationship(w, "rId1", &document_type, "word/document.xml")
            })?;
        Ok(())
    })
}

/// Bold paragraph style used for the title and part headings
struct HeadingStyle {
    id: &'static str,
    name: &'static str,
    half_points: u32,
    space_before: u32,
    space_after: u32,
    outline_level: Option<u32>,
}

const HEADING_STYLES: [HeadingStyle; 2] = [
    HeadingStyle {
        id: "Title",
        name: "Title",
        half_points: 32,
        space_before: 0,
        space_after: 240,
        outline_level: None,
    },
    HeadingStyle {
        id: "Heading1",
        name: "heading 1",
        half_points: 28,
        space_before: 240,
        space_after: 120,
        outline_level: Some(0),
    },
];

fn styles_xml() -> quick_xml::Result<Vec<u8>> {
    xml_part(|w| {
        w.create_element("w:styles")
            .with_attribute(("xmlns:w", NS_MAIN))
            .write_inner_content(|w| {
                element(w, "w:docDefaults", |w| {
                    element(w, "w:rPrDefault", |w| {
                        element(w, "w:rPr", |w| {
                            empty(w, "w:rFonts", &BODY_FONTS)?;
                            val(w, "w:sz", "22")
                        })
                    })?;
                    element(w, "w:pPrDefault", |w| {
                        element(w, "w:pPr", |w| empty(w, "w:spacing", &[("w:after", "120")]))
                    })
                })?;

                style(w, "paragraph", "Normal", true, |w| val(w, "w:name", "Normal"))?;
                for heading in &HEADING_STYLES {
                    write_heading_style(w, heading)?;
                }

                style(w, "table", "TableNormal", true, |w| {
                    val(w, "w:name", "Normal Table")?;
                    element(w, "w:tblPr", |w| {
                        empty(w, "w:tblInd", &[("w:w", "0"), ("w:type", "dxa")])?;
                        element(w, "w:tblCellMar", |w| {
                            for (side, width) in TABLE_CELL_MARGINS {
                                empty(w, side, &[("w:w", width), ("w:type", "dxa")])?;
                            }
                            Ok(())
                        })
                    })
                })?;
                style(w, "table", "TableGrid", false, |w| {
                    val(w, "w:name", "Table Grid")?;
                    val(w, "w:basedOn", "TableNormal")?;
                    element(w, "w:tblPr", write_grid_borders)
                })
            })?;
        Ok(())
    })
}

fn style(
    w: &mut PartWriter,
    kind: &str,
    id: &str,
    is_default: bool,
    inner: impl FnOnce(&mut PartWriter) -> XmlResult,
) -> XmlResult {
    let mut attributes = vec![("w:type", kind)];
    if is_default {
        attributes.push(("w:default", "1"));
    }
    attributes.push(("w:styleId", id));
    w.create_element("w:style")
        .with_attributes(attributes)
        .write_inner_content(inner)?;
    Ok(())
}

fn write_heading_style(w: &mut PartWriter, heading: &HeadingStyle) -> XmlResult {
    style(w, "paragraph", heading.id, false, |w| {
        val(w, "w:name", heading.name)?;
        val(w, "w:basedOn", "Normal")?;
        val(w, "w:next", "Normal")?;
        element(w, "w:pPr", |w| {
            if heading.outline_level.is_some() {
                empty(w, "w:keepNext", &[])?;
            }
            empty(
                w,
                "w:spacing",
                &[
                    ("w:before", heading.space_before.to_string().as_str()),
                    ("w:after", heading.space_after.to_string().as_str()),
                ],
            )?;
            if let Some(level) = heading.outline_level {
                val(w, "w:outlineLvl", &level.to_string())?;
            }
            Ok(())
        })?;
        element(w, "w:rPr", |w| {
            empty(w, "w:b", &[])?;
            val(w, "w:sz", &heading.half_points.to_string())
        })
    })
}

/// Accept an Office Math fragment when it is well-formed XML whose top-level
/// elements all live in the `m:` namespace. Returns the fragment ready to sit
/// inside a `w:p`, wrapping bare math content in `m:oMath`.
pub fn sanitize_omml(omml: &str) -> Option<String> {
    let mut fragment = omml.trim();
    if fragment.starts_with("<?xml") {
        let end = fragment.find("?>")?;
        fragment = fragment[end + 2..].trim_start();
    }
    if fragment.is_empty() {
        return None;
    }

    let mut reader = Reader::from_str(fragment);
    let mut depth: usize = 0;
    let mut roots: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if depth == 0 {
                    roots.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                }
                depth += 1;
            }
            Ok(Event::End(_)) => {
                depth = depth.checked_sub(1)?;
            }
            Ok(Event::Empty(empty)) => {
                if depth == 0 {
                    roots.push(String::from_utf8_lossy(empty.name().as_ref()).into_owned());
                }
            }
            Ok(Event::Text(text)) => {
                if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) {
                    return None;
                }
            }
            Ok(Event::Comment(_)) => {}
            Ok(Event::Eof) => break,
            Ok(Event::CData(_)) if depth > 0 => {}
            Ok(_) | Err(_) => return None,
        }
    }

    if depth != 0 || roots.is_empty() || !roots.iter().all(|r| r.starts_with("m:")) {
        return None;
    }

    let is_math_root = |r: &String| r == "m:oMath" || r == "m:oMathPara";
    if roots.iter().all(is_math_root) {
        Some(fragment.to_string())
    } else {
        Some(format!("<m:oMath>{fragment}</m:oMath>"))
    }
}
