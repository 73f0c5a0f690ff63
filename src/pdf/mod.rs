//! # PDF Canvas
//!
//! A [`Canvas`] that accumulates drawing operations per page and writes a
//! valid PDF file when the document is finished.
//!
//! This is a from-scratch PDF 1.7 writer. A planner needs very little of
//! the format: one standard font, text, stroked lines, and link
//! annotations with explicit page destinations. Writing the bytes
//! ourselves keeps that subset small and fully under our control.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, font
//! 4 0 obj ... endobj  <- content stream / page pairs
//! ...                 <- link annotations
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>
use std::path::Path;

use miniz_oxide::deflate::compress_to_vec_zlib;
use tracing::debug;

use crate::canvas::{check_page_size, Canvas, PageId, Rect};
use crate::error::{PlannerError, Result};
use crate::font::HELVETICA;

/// Object ids fixed by the writer. Pages and annotations follow.
const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_ID: usize = 3;
const FIRST_PAGE_ID: usize = 4;

/// The document being drawn. Created empty; freed on drop.
#[derive(Debug, Default)]
pub struct PdfCanvas {
    pages: Vec<PdfPage>,
    title: Option<String>,
}

#[derive(Debug)]
struct PdfPage {
    width: f64,
    height: f64,
    /// Uncompressed content stream operators.
    content: String,
    links: Vec<(Rect, PageId)>,
}

/// Tracks allocated PDF objects during writing. An object's id is its
/// index; slot 0 is the free-list head and is never written.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        let id = self.objects.len();
        self.objects.push(data);
        id
    }
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title written into the Info dictionary.
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Number of link annotations across all pages.
    pub fn link_count(&self) -> usize {
        self.pages.iter().map(|page| page.links.len()).sum()
    }

    fn page_mut(&mut self, page: PageId) -> Result<&mut PdfPage> {
        self.pages
            .get_mut(page.0)
            .ok_or(PlannerError::UnknownPage(page))
    }

    /// Serialize the document to PDF bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3 = Helvetica
        // 4+ = (content stream, page) pairs, then link annotations
        builder.push(vec![]);
        builder.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
        builder.push(vec![]);
        builder.push(
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                 /Encoding /WinAnsiEncoding >>",
                HELVETICA.pdf_name
            )
            .into_bytes(),
        );

        // Link destinations may point forward, so every page id is known
        // before any page dictionary is written.
        let page_obj_id = |page: PageId| FIRST_PAGE_ID + 2 * page.0 + 1;
        let mut next_annot_id = FIRST_PAGE_ID + 2 * self.pages.len();
        let mut annotations: Vec<Vec<u8>> = Vec::new();
        let mut page_obj_ids: Vec<usize> = Vec::with_capacity(self.pages.len());

        for (index, page) in self.pages.iter().enumerate() {
            let compressed = compress_to_vec_zlib(page.content.as_bytes(), 6);
            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            let content_obj_id = builder.push(content_data);

            let mut annot_refs: Vec<String> = Vec::with_capacity(page.links.len());
            for (rect, destination) in &page.links {
                annotations.push(
                    Self::link_annotation(rect, page.height, page_obj_id(*destination))
                        .into_bytes(),
                );
                annot_refs.push(format!("{} 0 R", next_annot_id));
                next_annot_id += 1;
            }

            let mut page_dict = format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << /F0 {} 0 R >> >>",
                PAGES_ID, page.width, page.height, content_obj_id, FONT_ID
            );
            if !annot_refs.is_empty() {
                let _ = write!(page_dict, " /Annots [{}]", annot_refs.join(" "));
            }
            page_dict.push_str(" >>");
            let id = builder.push(page_dict.into_bytes());
            debug_assert_eq!(id, page_obj_id(PageId(index)));
            page_obj_ids.push(id);
        }

        for annotation in annotations {
            builder.push(annotation);
        }

        // Write Pages tree (object 2)
        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[PAGES_ID] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = self.title.as_ref().map(|title| {
            builder.push(
                format!(
                    "<< /Title ({}) /Producer (Planner {}) /Creator (Planner) >>",
                    Self::escape_pdf_string(title),
                    env!("CARGO_PKG_VERSION")
                )
                .into_bytes(),
            )
        });

        self.serialize(&builder, info_obj_id)
    }

    /// Write the finished document to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes();
        std::fs::write(path, &bytes).map_err(|source| PlannerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "document saved");
        Ok(())
    }

    fn link_annotation(rect: &Rect, page_height: f64, destination_obj: usize) -> String {
        format!(
            "<< /Type /Annot /Subtype /Link /Rect [{:.2} {:.2} {:.2} {:.2}] \
             /Border [0 0 0] /Dest [{} 0 R /Fit] >>",
            rect.x0,
            page_height - rect.y1,
            rect.x1,
            page_height - rect.y0,
            destination_obj
        )
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: Option<usize>) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        // Header
        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let header = format!("{} 0 obj\n", i);
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(obj);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root {} 0 R",
            builder.objects.len(),
            CATALOG_ID
        );
        if let Some(info_id) = info_obj_id {
            let _ = write!(output, " /Info {} 0 R", info_id);
        }
        let _ = write!(output, " >>\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}

impl Canvas for PdfCanvas {
    fn new_page(&mut self, width: f64, height: f64) -> Result<PageId> {
        check_page_size(width, height)?;
        self.pages.push(PdfPage {
            width,
            height,
            content: String::new(),
            links: Vec::new(),
        });
        Ok(PageId(self.pages.len() - 1))
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn draw_text(
        &mut self,
        page: PageId,
        x: f64,
        y: f64,
        font_size: f64,
        text: &str,
    ) -> Result<()> {
        let page = self.page_mut(page)?;
        let pdf_y = page.height - y;
        let _ = write!(
            page.content,
            "BT\n/F0 {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            font_size,
            x,
            pdf_y,
            Self::escape_pdf_string(text)
        );
        Ok(())
    }

    fn draw_line(
        &mut self,
        page: PageId,
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
    ) -> Result<()> {
        let page = self.page_mut(page)?;
        let h = page.height;
        let _ = write!(
            page.content,
            "q\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
            width,
            from.0,
            h - from.1,
            to.0,
            h - to.1
        );
        Ok(())
    }

    fn draw_rect(&mut self, page: PageId, rect: &Rect, width: f64) -> Result<()> {
        let page = self.page_mut(page)?;
        let y = page.height - rect.y1;
        let _ = write!(
            page.content,
            "q\n{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\nQ\n",
            width,
            rect.x0,
            y,
            rect.width(),
            rect.height()
        );
        Ok(())
    }

    fn add_link(&mut self, source: PageId, rect: Rect, destination: PageId) -> Result<()> {
        if destination.0 >= self.pages.len() {
            return Err(PlannerError::UnknownPage(destination));
        }
        self.page_mut(source)?.links.push((rect, destination));
        Ok(())
    }

    fn measure_text_width(&self, text: &str, font_size: f64) -> f64 {
        HELVETICA.measure_string(text, font_size)
    }
}
