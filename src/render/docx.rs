//! DOCX (Office Open XML) serialization.
//!
//! Writes a minimal WordprocessingML package: one section, A4 page, one
//! `w:p` per paragraph, inline pictures for image runs. Each distinct image
//! is stored once under `word/media/` no matter how often it is shown.

use super::cleanup::escape_xml;
use crate::error::Result;
use crate::model::{Document, ImageRun, LoadedImage, Paragraph, Run, TextRun};
use chrono::SecondsFormat;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::io::{Cursor, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// MIME type of a DOCX package.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// English Metric Units per CSS pixel (914400 EMU per inch / 96 px).
const EMU_PER_PIXEL: f64 = 9525.0;

/// A4 page size and 1-inch margins, in twips.
const PAGE_WIDTH: u32 = 11906;
const PAGE_HEIGHT: u32 = 16838;
const PAGE_MARGIN: u32 = 1440;

const STYLES_REL_ID: &str = "rId1";

/// Serialize a document into DOCX bytes.
pub fn to_docx(doc: &Document) -> Result<Vec<u8>> {
    let cursor = write_docx(doc, Cursor::new(Vec::new()))?;
    Ok(cursor.into_inner())
}

/// Serialize a document as DOCX into any seekable writer.
pub fn write_docx<W: Write + Seek>(doc: &Document, writer: W) -> Result<W> {
    let media = MediaTable::collect(doc);

    let mut zip = ZipWriter::new(writer);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", deflated)?;
    zip.write_all(content_types_xml(&media).as_bytes())?;

    zip.start_file("_rels/.rels", deflated)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;

    zip.start_file("docProps/core.xml", deflated)?;
    zip.write_all(core_xml(doc).as_bytes())?;

    zip.start_file("docProps/app.xml", deflated)?;
    zip.write_all(APP_XML.as_bytes())?;

    zip.start_file("word/document.xml", deflated)?;
    zip.write_all(document_xml(doc, &media).as_bytes())?;

    zip.start_file("word/styles.xml", deflated)?;
    zip.write_all(STYLES_XML.as_bytes())?;

    zip.start_file("word/_rels/document.xml.rels", deflated)?;
    zip.write_all(document_rels_xml(&media).as_bytes())?;

    // Image formats are already compressed
    for entry in &media.entries {
        zip.start_file(format!("word/media/{}", entry.filename), stored)?;
        zip.write_all(&entry.image.data)?;
    }

    let writer = zip.finish()?;
    log::debug!(
        "Packed DOCX with {} paragraph(s) and {} media file(s)",
        doc.paragraph_count(),
        media.entries.len()
    );
    Ok(writer)
}

struct MediaEntry<'a> {
    rel_id: String,
    filename: String,
    image: &'a LoadedImage,
}

/// Distinct images of a document, keyed by URL.
struct MediaTable<'a> {
    entries: Vec<MediaEntry<'a>>,
    by_url: HashMap<&'a str, usize>,
}

impl<'a> MediaTable<'a> {
    fn collect(doc: &'a Document) -> Self {
        let mut table = Self {
            entries: Vec::new(),
            by_url: HashMap::new(),
        };

        for run in doc.paragraphs.iter().flat_map(Paragraph::images) {
            let url = run.image.url.as_str();
            if table.by_url.contains_key(url) {
                continue;
            }
            let index = table.entries.len() + 1;
            table.by_url.insert(url, table.entries.len());
            table.entries.push(MediaEntry {
                // rId1 is the styles part
                rel_id: format!("rId{}", index + 1),
                filename: run.image.suggested_filename(index),
                image: &run.image,
            });
        }

        table
    }

    fn rel_id(&self, url: &str) -> Option<&str> {
        self.by_url
            .get(url)
            .map(|&i| self.entries[i].rel_id.as_str())
    }

    fn extensions(&self) -> BTreeSet<(&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.image.extension(), e.image.mime_type.as_str()))
            .collect()
    }
}

fn content_types_xml(media: &MediaTable<'_>) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
    );
    for (ext, mime) in media.extensions() {
        let _ = write!(
            xml,
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            ext, mime
        );
    }
    xml.push_str(
        r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#,
    );
    xml
}

fn document_rels_xml(media: &MediaTable<'_>) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        STYLES_REL_ID
    );
    for entry in &media.entries {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{}"/>"#,
            entry.rel_id, entry.filename
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn core_xml(doc: &Document) -> String {
    let created = doc
        .metadata
        .created
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    let title = doc
        .metadata
        .title
        .as_deref()
        .map(|t| format!("<dc:title>{}</dc:title>", escape_xml(t)))
        .unwrap_or_default();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">{title}<dc:creator>{creator}</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified></cp:coreProperties>"#,
        title = title,
        creator = escape_xml(&doc.metadata.creator),
        created = created,
    )
}

fn document_xml(doc: &Document, media: &MediaTable<'_>) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><w:body>"#,
    );

    let mut drawing_id = 0u32;
    for paragraph in &doc.paragraphs {
        let _ = write!(
            xml,
            r#"<w:p><w:pPr><w:spacing w:after="{}"/></w:pPr>"#,
            paragraph.spacing_after
        );
        for run in &paragraph.runs {
            match run {
                Run::Text(text) => write_text_run(&mut xml, text),
                Run::Image(image) => {
                    // MediaTable::collect registered every image run
                    if let Some(rel_id) = media.rel_id(&image.image.url) {
                        drawing_id += 1;
                        write_image_run(&mut xml, image, rel_id, drawing_id);
                    }
                }
            }
        }
        xml.push_str("</w:p>");
    }

    let _ = write!(
        xml,
        r#"<w:sectPr><w:pgSz w:w="{w}" w:h="{h}"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        w = PAGE_WIDTH,
        h = PAGE_HEIGHT,
        m = PAGE_MARGIN
    );
    xml
}

fn write_text_run(xml: &mut String, run: &TextRun) {
    xml.push_str("<w:r><w:rPr>");
    if run.style.bold {
        xml.push_str("<w:b/><w:bCs/>");
    }
    if let Some(color) = &run.style.color {
        let _ = write!(xml, r#"<w:color w:val="{}"/>"#, escape_xml(color));
    }
    let _ = write!(
        xml,
        r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr><w:t xml:space="preserve">{text}</w:t></w:r>"#,
        size = run.style.size_half_points,
        text = escape_xml(&run.text)
    );
}

fn write_image_run(xml: &mut String, run: &ImageRun, rel_id: &str, id: u32) {
    let cx = pixels_to_emu(run.width);
    let cy = pixels_to_emu(run.height);
    let name = format!("Picture {}", id);
    let alt = escape_xml(&run.alt_text);

    let _ = write!(
        xml,
        r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:effectExtent l="0" t="0" r="0" b="0"/><wp:docPr id="{id}" name="{name}" descr="{alt}"/><wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="{name}" descr="{alt}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#,
        cx = cx,
        cy = cy,
        id = id,
        name = name,
        alt = alt,
        rel_id = rel_id,
    );
}

fn pixels_to_emu(pixels: f64) -> u64 {
    (pixels * EMU_PER_PIXEL).round().max(0.0) as u64
}

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>penpolish</Application></Properties>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="24"/><w:szCs w:val="24"/></w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style></w:styles>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageRun, LoadedImage, TextRun};
    use std::io::Read;
    use std::sync::Arc;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    fn part_names(bytes: &[u8]) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn test_package_parts() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("Hello"));

        let bytes = to_docx(&doc).unwrap();
        assert_eq!(&bytes[..2], b"PK");

        let names = part_names(&bytes);
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
        ] {
            assert!(names.iter().any(|n| n == part), "missing {}", part);
        }
    }

    #[test]
    fn test_text_runs_are_escaped_and_styled() {
        let mut doc = Document::new();
        let mut p = Paragraph::new();
        p.add_text("a < b & c");
        p.add_run(Run::Text(TextRun::fallback("gone", 24)));
        doc.add_paragraph(p);

        let xml = read_part(&to_docx(&doc).unwrap(), "word/document.xml");
        assert!(xml.contains("a &lt; b &amp; c"));
        assert!(xml.contains(r#"<w:color w:val="FF0000"/>"#));
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains(" [Image: gone] "));
        assert!(xml.contains(r#"<w:spacing w:after="120"/>"#));
        assert!(xml.contains(r#"<w:sz w:val="24"/>"#));
    }

    #[test]
    fn test_empty_paragraph_is_written() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::new());
        let xml = read_part(&to_docx(&doc).unwrap(), "word/document.xml");
        assert_eq!(xml.matches("<w:p>").count(), 1);
    }

    #[test]
    fn test_repeated_image_is_stored_once() {
        let image = Arc::new(LoadedImage::new(
            "http://x/a.png",
            vec![1, 2, 3],
            "image/png",
            100,
            50,
        ));
        let mut doc = Document::new();
        for _ in 0..2 {
            let mut p = Paragraph::new();
            p.add_run(Run::Image(ImageRun::fitted(image.clone(), "a", 550)));
            doc.add_paragraph(p);
        }

        let bytes = to_docx(&doc).unwrap();
        let media: Vec<_> = part_names(&bytes)
            .into_iter()
            .filter(|n| n.starts_with("word/media/"))
            .collect();
        assert_eq!(media, vec!["word/media/image1.png".to_string()]);

        let xml = read_part(&bytes, "word/document.xml");
        assert_eq!(xml.matches(r#"r:embed="rId2""#).count(), 2);
        assert!(xml.contains(r#"<wp:extent cx="952500" cy="476250"/>"#));
        assert!(xml.contains(r#"<wp:docPr id="2" name="Picture 2" descr="a"/>"#));

        let rels = read_part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Id="rId2""#));
        assert!(rels.contains("media/image1.png"));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains(r#"Extension="png" ContentType="image/png""#));
    }

    #[test]
    fn test_core_properties_title() {
        let mut doc = Document::new();
        doc.metadata.title = Some("R&D notes".to_string());
        let core = read_part(&to_docx(&doc).unwrap(), "docProps/core.xml");
        assert!(core.contains("<dc:title>R&amp;D notes</dc:title>"));
        assert!(core.contains("<dc:creator>penpolish"));
    }

    #[test]
    fn test_pixels_to_emu() {
        assert_eq!(pixels_to_emu(1.0), 9525);
        assert_eq!(pixels_to_emu(550.0), 5_238_750);
        assert_eq!(pixels_to_emu(0.5), 4763);
    }
}
