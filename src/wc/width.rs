use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Approximate terminal display width of a codepoint for -L, in the spirit
/// of wcwidth(3): 0 for controls and zero-width marks, 2 for East Asian
/// wide/fullwidth characters and common emoji, 1 for everything else.
pub fn display_width(c: char) -> usize {
    let cp = c as u32;

    // NUL and C0/C1 control ranges occupy no columns.
    if cp < 0x20 || (cp >= 0x7F && cp < 0xA0) {
        return 0;
    }

    // Combining marks and zero-width format characters (Mn, Me, Cf).
    if matches!(
        c.general_category(),
        GeneralCategory::NonspacingMark
            | GeneralCategory::EnclosingMark
            | GeneralCategory::Format
    ) {
        return 0;
    }

    if is_wide(cp) { 2 } else { 1 }
}

/// East Asian wide/fullwidth ranges and common emoji blocks.
fn is_wide(cp: u32) -> bool {
    if cp < 0x1100 {
        return false;
    }

    cp <= 0x115F
        || cp == 0x2329
        || cp == 0x232A
        || (cp >= 0x2E80 && cp <= 0xA4CF && cp != 0x303F)
        || (cp >= 0xAC00 && cp <= 0xD7A3)
        || (cp >= 0xF900 && cp <= 0xFAFF)
        || (cp >= 0xFE10 && cp <= 0xFE19)
        || (cp >= 0xFE30 && cp <= 0xFE6F)
        || (cp >= 0xFF00 && cp <= 0xFF60)
        || (cp >= 0xFFE0 && cp <= 0xFFE6)
        || (cp >= 0x1F300 && cp <= 0x1FAFF)
        || (cp >= 0x20000 && cp <= 0x3FFFD)
}
