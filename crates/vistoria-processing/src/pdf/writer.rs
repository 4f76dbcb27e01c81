//! Emission of paginated blocks into PDF bytes via `pdf-writer`.

use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use super::layout::{Page, TextBlock, AVG_GLYPH_WIDTH, PAGE_HEIGHT, PAGE_WIDTH};

const FONT_REGULAR: Name = Name(b"F1");
const FONT_BOLD: Name = Name(b"F2");
// Link color; reset to black after each link block.
const LINK_RGB: (f32, f32, f32) = (0.05, 0.25, 0.65);

struct PageRefs {
    page: Ref,
    content: Ref,
    annots: Vec<(Ref, Rect, String)>,
}

/// Clickable region spanning the wrapped line's bounding box.
fn link_rect(block: &TextBlock) -> Rect {
    let width = block.text.chars().count() as f32 * block.size * AVG_GLYPH_WIDTH;
    Rect::new(
        block.x,
        block.y - 2.0,
        block.x + width,
        block.y + block.size,
    )
}

/// Serialize the paginated layout into a PDF byte sequence.
pub fn emit_pdf(pages: &[Page]) -> Vec<u8> {
    let mut counter = 0;
    let mut next_id = move || {
        counter += 1;
        Ref::new(counter)
    };

    let catalog_id = next_id();
    let page_tree_id = next_id();
    let font_regular_id = next_id();
    let font_bold_id = next_id();

    let page_refs: Vec<PageRefs> = pages
        .iter()
        .map(|page| {
            let page_id = next_id();
            let content_id = next_id();
            let annots = page
                .blocks
                .iter()
                .filter_map(|block| {
                    block
                        .link
                        .as_ref()
                        .map(|url| (next_id(), link_rect(block), url.clone()))
                })
                .collect();
            PageRefs {
                page: page_id,
                content: content_id,
                annots,
            }
        })
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_refs.iter().map(|refs| refs.page))
        .count(page_refs.len() as i32);

    pdf.type1_font(font_regular_id)
        .base_font(Name(b"Helvetica"));
    pdf.type1_font(font_bold_id)
        .base_font(Name(b"Helvetica-Bold"));

    for (page, refs) in pages.iter().zip(&page_refs) {
        {
            let mut page_obj = pdf.page(refs.page);
            page_obj.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            page_obj.parent(page_tree_id);
            page_obj.contents(refs.content);
            {
                let mut resources = page_obj.resources();
                let mut fonts = resources.fonts();
                fonts.pair(FONT_REGULAR, font_regular_id);
                fonts.pair(FONT_BOLD, font_bold_id);
            }
            if !refs.annots.is_empty() {
                page_obj.annotations(refs.annots.iter().map(|(id, _, _)| *id));
            }
        }

        for (id, rect, url) in &refs.annots {
            let mut annot = pdf.annotation(*id);
            annot.subtype(AnnotationType::Link);
            annot.rect(*rect);
            annot
                .action()
                .action_type(ActionType::Uri)
                .uri(Str(url.as_bytes()));
        }

        let mut content = Content::new();
        for block in &page.blocks {
            if block.link.is_some() {
                content.set_fill_rgb(LINK_RGB.0, LINK_RGB.1, LINK_RGB.2);
            }
            content.begin_text();
            content.set_font(
                if block.bold { FONT_BOLD } else { FONT_REGULAR },
                block.size,
            );
            content.next_line(block.x, block.y);
            content.show(Str(block.text.as_bytes()));
            content.end_text();
            if block.link.is_some() {
                content.set_fill_rgb(0.0, 0.0, 0.0);
            }
        }
        pdf.stream(refs.content, &content.finish());
    }

    pdf.finish()
}
