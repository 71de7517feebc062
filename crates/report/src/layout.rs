//! Page geometry for the Revista Vehicular form

use pdf_core::PageSize;

/// Every position and size used by the report, in millimetres
///
/// Y values grow downward from the top edge of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstants {
    pub page: PageSize,
    /// Left/right page margin
    pub margin: f64,

    // Header
    pub logo_y: f64,
    pub logo_width: f64,
    pub logo_height: f64,
    pub left_logo_x: f64,
    pub right_logo_x: f64,
    pub title_y: f64,
    pub subtitle_y: f64,
    pub folio_label_x: f64,
    pub folio_value_x: f64,
    pub folio_y: f64,

    /// Baseline of the first field row
    pub content_start_y: f64,
    /// Fixed column X offsets of the field grid
    pub columns: [f64; 4],
    pub row_height: f64,
    /// Gap between a field label and its value
    pub label_gap: f64,

    // Vehicle photos, beside the vehicle block
    pub motor_photo_x: f64,
    pub serial_photo_x: f64,
    pub photo_width: f64,
    pub photo_height: f64,
    /// Photo top edge relative to the first vehicle row baseline
    pub photo_top_offset: f64,
    pub photo_caption_gap: f64,

    // Checklist
    pub checklist_columns: [f64; 3],
    pub checklist_value_offsets: [f64; 3],

    pub observation_line_height: f64,
    /// Space between the observations and the approval line
    pub approval_gap: f64,
    pub disclaimer_line_height: f64,

    // Signatures
    /// Space between the disclaimer and the signer names
    pub signature_gap: f64,
    pub signature_rules: [(f64, f64); 2],
    pub signature_line_height: f64,

    // Score line and footer
    pub footer_reserved_height: f64,
    pub score_margin: f64,
    pub signature_buffer: f64,
    /// Distance of the first footer line from the bottom edge
    pub footer_offset: f64,
    pub footer_line_height: f64,

    // Font sizes in points
    pub title_font_size: f32,
    pub subtitle_font_size: f32,
    pub section_font_size: f32,
    pub body_font_size: f32,
    pub small_font_size: f32,
}

impl LayoutConstants {
    /// US Letter portrait, the only format the form is printed on
    pub const LETTER: LayoutConstants = LayoutConstants {
        page: PageSize::LETTER_PORTRAIT,
        margin: 15.0,

        logo_y: 8.0,
        logo_width: 40.0,
        logo_height: 18.0,
        left_logo_x: 15.0,
        right_logo_x: 160.9,
        title_y: 18.0,
        subtitle_y: 24.0,
        folio_label_x: 160.0,
        folio_value_x: 170.0,
        folio_y: 32.0,

        content_start_y: 40.0,
        columns: [15.0, 75.0, 120.0, 145.0],
        row_height: 6.0,
        label_gap: 1.5,

        motor_photo_x: 150.0,
        serial_photo_x: 177.0,
        photo_width: 24.0,
        photo_height: 20.0,
        photo_top_offset: -4.0,
        photo_caption_gap: 3.0,

        checklist_columns: [15.0, 75.0, 145.0],
        checklist_value_offsets: [45.0, 45.0, 40.0],

        observation_line_height: 5.0,
        approval_gap: 4.0,
        disclaimer_line_height: 4.0,

        signature_gap: 12.0,
        signature_rules: [(25.0, 95.0), (120.0, 190.0)],
        signature_line_height: 4.0,

        footer_reserved_height: 25.0,
        score_margin: 10.0,
        signature_buffer: 8.0,
        footer_offset: 20.0,
        footer_line_height: 4.0,

        title_font_size: 14.0,
        subtitle_font_size: 10.0,
        section_font_size: 9.0,
        body_font_size: 8.0,
        small_font_size: 7.0,
    };

    /// Width available between the margins
    pub fn content_width(&self) -> f64 {
        self.page.width - 2.0 * self.margin
    }

    /// Horizontal centre of the page
    pub fn center_x(&self) -> f64 {
        self.page.width / 2.0
    }

    /// Baseline of the score line
    ///
    /// Pinned above the footer unless the signature block ends too low, in
    /// which case it follows the signatures.
    pub fn score_line_y(&self, signature_end_y: f64) -> f64 {
        let pinned =
            self.page.height - self.footer_reserved_height - self.row_height - self.score_margin;
        pinned.max(signature_end_y + self.signature_buffer)
    }

    /// Baseline of the first footer line
    pub fn footer_y(&self) -> f64 {
        self.page.height - self.footer_offset
    }
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Vertical drawing position, threaded through the layout steps
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Cursor {
    pub y: f64,
}

impl Cursor {
    pub fn at(y: f64) -> Self {
        Self { y }
    }

    /// Move down by `dy` millimetres
    #[must_use]
    pub fn advance(self, dy: f64) -> Self {
        Self { y: self.y + dy }
    }

    /// Move down by `count` rows of `height`
    #[must_use]
    pub fn advance_lines(self, count: usize, height: f64) -> Self {
        self.advance(count as f64 * height)
    }
}
