//! Display Adapter Trait
//!
//! Rendering is fire-and-forget: the display reports nothing back and the
//! pipeline never waits on it beyond the call itself. Pixel and glyph work
//! belongs to the implementation.

use crate::display::{Category, Field, Rgb565};

/// On-device display
pub trait Display {
    /// Render a number into a field
    fn render_value(&mut self, digits: u32, field: Field);

    /// Render text into a field with foreground/background colours
    fn render_label(&mut self, text: &str, field: Field, fg: Rgb565, bg: Rgb565);

    /// Render a health category into a field
    fn render_category(&mut self, category: Category, field: Field);
}

impl<T: Display + ?Sized> Display for &mut T {
    fn render_value(&mut self, digits: u32, field: Field) {
        (**self).render_value(digits, field)
    }

    fn render_label(&mut self, text: &str, field: Field, fg: Rgb565, bg: Rgb565) {
        (**self).render_label(text, field, fg, bg)
    }

    fn render_category(&mut self, category: Category, field: Field) {
        (**self).render_category(category, field)
    }
}
