//! Pure pagination: positioned text blocks on fixed-height pages.
//!
//! The builder keeps a running vertical cursor. Every block advances the
//! cursor by a size-proportional line height, and the page-break check runs
//! before each placed line (a single long wrapped field can overflow a page
//! on its own, so checking only at section boundaries is not enough).

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 48.0;

const LINE_FACTOR: f32 = 1.45;
/// Average Helvetica glyph advance at size 1.0. Good enough for wrapping;
/// exact metrics are not worth carrying a font parser for.
pub(crate) const AVG_GLYPH_WIDTH: f32 = 0.52;

/// One positioned run of text. `y` is the baseline. A block with a `link`
/// gets a clickable region over its bounding box and a distinguishing color.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub text: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub blocks: Vec<TextBlock>,
}

pub struct LayoutBuilder {
    pages: Vec<Page>,
    cursor: f32,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        LayoutBuilder {
            pages: vec![Page::default()],
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn line_height(size: f32) -> f32 {
        size * LINE_FACTOR
    }

    pub(crate) fn max_chars(size: f32) -> usize {
        (((PAGE_WIDTH - 2.0 * MARGIN) / (size * AVG_GLYPH_WIDTH)) as usize).max(1)
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    /// Advance the cursor by one line of the given size, breaking to a new
    /// page first if the line would cross the bottom margin. Returns the
    /// baseline for the pending line.
    fn advance(&mut self, size: f32) -> f32 {
        let line_height = Self::line_height(size);
        if self.cursor - line_height < MARGIN {
            self.new_page();
        }
        self.cursor -= line_height;
        self.cursor
    }

    fn push(&mut self, text: String, size: f32, bold: bool, link: Option<String>) {
        let y = self.advance(size);
        self.pages
            .last_mut()
            .expect("layout always has a current page")
            .blocks
            .push(TextBlock {
                x: MARGIN,
                y,
                size,
                bold,
                text,
                link,
            });
    }

    /// Place wrapped text. Each wrapped line consumes its own
    /// pagination-checked slot.
    pub fn text(&mut self, text: &str, size: f32, bold: bool) {
        for line in wrap(text, Self::max_chars(size)) {
            self.push(line, size, bold, None);
        }
    }

    /// Place a clickable label. Same wrapping and pagination as text, with a
    /// link region registered per wrapped line.
    pub fn link(&mut self, label: &str, url: &str, size: f32) {
        for line in wrap(label, Self::max_chars(size)) {
            self.push(line, size, false, Some(url.to_string()));
        }
    }

    /// Vertical spacer between sections.
    pub fn gap(&mut self, size: f32) {
        let _ = self.advance(size);
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

impl Default for LayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Greedy word wrap to at most `max_chars` per line; overlong words are
/// hard-split. Always yields at least one (possibly empty) line.
pub(crate) fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(max_chars).collect();
            let split_at = head.len();
            lines.push(head);
            word = &word[split_at..];
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
