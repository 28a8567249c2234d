use once_cell::sync::Lazy;
use regex::Regex;

/// First glyph in the atlas; cells run through ASCII in row-major order.
pub const FIRST_GLYPH: u32 = 0x20; // ' '

/// A fixed-grid bitmap font. Cells are uniform, glyphs are monospaced; the
/// grid dimensions come from the `NxM` suffix of the texture filename
/// (e.g. `arcade 16x6.png`).
#[derive(Clone, Debug)]
pub struct Font {
    pub texture_key: String,
    pub cols: u32,
    pub rows: u32,
    pub cell_w: u32,
    pub cell_h: u32,
}

static SHEET_DIMS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)x(\d+)").unwrap());

/// Parses the trailing `<cols>x<rows>` out of a sheet filename. Falls back to
/// a single cell when the name carries no dimensions.
pub fn parse_sheet_dims_from_filename(name: &str) -> (u32, u32) {
    let mut dims = (1, 1);
    for caps in SHEET_DIMS_RE.captures_iter(name) {
        let cols = caps[1].parse().unwrap_or(1);
        let rows = caps[2].parse().unwrap_or(1);
        dims = (cols, rows);
    }
    dims
}

impl Font {
    pub fn new(texture_key: String, tex_w: u32, tex_h: u32) -> Self {
        let (cols, rows) = parse_sheet_dims_from_filename(&texture_key);
        let cols = cols.max(1);
        let rows = rows.max(1);
        Font {
            cell_w: (tex_w / cols).max(1),
            cell_h: (tex_h / rows).max(1),
            texture_key,
            cols,
            rows,
        }
    }

    /// Atlas cell for a character, or `None` for glyphs outside the sheet.
    pub fn glyph_cell(&self, c: char) -> Option<(u32, u32)> {
        let code = c as u32;
        if code < FIRST_GLYPH {
            return None;
        }
        let index = code - FIRST_GLYPH;
        if index >= self.cols * self.rows {
            return None;
        }
        Some((index % self.cols, index / self.cols))
    }

    /// Horizontal advance for one glyph rendered at `px` height.
    #[inline(always)]
    pub fn advance(&self, px: f32) -> f32 {
        px * self.cell_w as f32 / self.cell_h as f32
    }

    /// Width of a single line at `px` height.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        self.advance(px) * text.chars().count() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_font() -> Font {
        // 16x6 grid of 8x16 cells.
        Font::new("arcade 16x6.png".to_string(), 128, 96)
    }

    #[test]
    fn sheet_dims_come_from_the_filename() {
        assert_eq!(parse_sheet_dims_from_filename("arcade 16x6.png"), (16, 6));
        assert_eq!(parse_sheet_dims_from_filename("plain.png"), (1, 1));
    }

    #[test]
    fn glyph_cells_follow_ascii_order() {
        let font = test_font();
        assert_eq!(font.glyph_cell(' '), Some((0, 0)));
        assert_eq!(font.glyph_cell('!'), Some((1, 0)));
        assert_eq!(font.glyph_cell('0'), Some((0, 1)));
        assert_eq!(font.glyph_cell('A'), Some((1, 2)));
    }

    #[test]
    fn out_of_range_glyphs_have_no_cell() {
        let font = test_font();
        assert_eq!(font.glyph_cell('\t'), None);
        assert_eq!(font.glyph_cell('é'), None);
    }

    #[test]
    fn measure_is_monospaced() {
        let font = test_font();
        // 8x16 cells: advance at 32px is 16px per glyph.
        assert!((font.advance(32.0) - 16.0).abs() < 1e-4);
        assert!((font.measure("Ready?", 32.0) - 96.0).abs() < 1e-3);
    }
}
