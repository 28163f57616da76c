//! Choosing a font size and line breaks for the free region
//!
//! All searches are geometric: start at a guess, multiply by the shrink
//! factor until the text fits, and fall back to the floor size when it
//! never does. The searches only measure; nothing here draws.

use balloon_core::{FontSpec, LineLayout, Result, TextExtents, TextLayout, TextMeasurer};

/// The optimistic first measurement of a text block
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    /// Widest line
    pub width: f64,
    /// Sum of line heights times the line spacing
    pub height: f64,
    pub font_size: f64,
}

/// Greedily wraps `text` at `max_width` and measures the resulting block
///
/// A single word wider than `max_width` still gets a line of its own.
pub fn measure_text_block<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font: &FontSpec,
    size: f64,
    max_width: f64,
    line_spacing: f64,
) -> Result<TextBlock> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let trial = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        let extents = measurer.measure_text(&trial, font, size)?;
        if extents.width > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = trial;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let mut width: f64 = 0.0;
    let mut height = 0.0;
    for line in &lines {
        let extents = measurer.measure_text(line, font, size)?;
        width = width.max(extents.width);
        height += extents.height * line_spacing;
    }

    Ok(TextBlock {
        lines,
        width,
        height,
        font_size: size,
    })
}

/// Font-size searches against one measurer and font
#[derive(Debug, Clone, Copy)]
pub struct TextFitter<'a, M: ?Sized> {
    measurer: &'a M,
    font: &'a FontSpec,
    /// Floor of every search
    pub min_size: f64,
    /// Geometric step, strictly between 0 and 1
    pub shrink: f64,
    /// Pitch between wrapped lines, in line heights
    pub line_spacing: f64,
}

impl<'a, M: TextMeasurer + ?Sized> TextFitter<'a, M> {
    pub fn new(measurer: &'a M, font: &'a FontSpec, min_size: f64) -> Self {
        Self {
            measurer,
            font,
            min_size,
            shrink: 0.92,
            line_spacing: 1.1,
        }
    }

    pub fn with_shrink(mut self, shrink: f64) -> Self {
        self.shrink = shrink;
        self
    }

    pub fn with_line_spacing(mut self, line_spacing: f64) -> Self {
        self.line_spacing = line_spacing;
        self
    }

    pub fn font(&self) -> &FontSpec {
        self.font
    }

    pub fn measure(&self, text: &str, size: f64) -> Result<TextExtents> {
        self.measurer.measure_text(text, self.font, size)
    }

    /// The whole text as one line at `size`
    pub fn single_line(&self, text: &str, size: f64) -> Result<TextLayout> {
        let extents = self.measure(text, size)?;
        Ok(TextLayout {
            font_size: size,
            total_height: extents.height,
            lines: vec![LineLayout {
                text: text.to_string(),
                extents,
            }],
            wrapped: false,
        })
    }

    /// Largest size from `max_size` down whose single line fits the box
    ///
    /// The box is `box_w x box_h` scaled by `margin`. Falls back to the
    /// floor size when nothing above it fits.
    pub fn fit_in_box(
        &self,
        text: &str,
        box_w: f64,
        box_h: f64,
        max_size: f64,
        margin: f64,
    ) -> Result<TextLayout> {
        let (target_w, target_h) = (box_w * margin, box_h * margin);
        let mut size = max_size;
        while size >= self.min_size {
            let layout = self.single_line(text, size)?;
            let extents = &layout.lines[0].extents;
            if extents.width <= target_w && extents.height <= target_h {
                return Ok(layout);
            }
            size *= self.shrink;
        }
        self.single_line(text, self.min_size)
    }

    /// Breaks `text` into at most two lines no wider than `max_width`
    ///
    /// Line one is filled greedily; whatever does not fit becomes line
    /// two. When line two is also too wide the size shrinks and the split
    /// is retried. If every word fits on one line, the result is a single
    /// unwrapped line. A single word is never wrapped and keeps
    /// `start_size` (raised to the floor).
    pub fn wrap_two_lines(
        &self,
        text: &str,
        max_width: f64,
        start_size: f64,
    ) -> Result<TextLayout> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() <= 1 {
            return self.single_line(text, start_size.max(self.min_size));
        }

        let mut size = start_size;
        'shrink: while size >= self.min_size {
            let mut first = 0;
            for (i, _) in words.iter().enumerate() {
                let trial = words[..=i].join(" ");
                let extents = self.measure(&trial, size)?;
                if extents.width > max_width && first > 0 {
                    let second = words[i..].join(" ");
                    let second_extents = self.measure(&second, size)?;
                    if second_extents.width > max_width {
                        size *= self.shrink;
                        continue 'shrink;
                    }
                    let first_line = words[..first].join(" ");
                    let first_extents = self.measure(&first_line, size)?;
                    return Ok(TextLayout {
                        font_size: size,
                        total_height: first_extents.height
                            + second_extents.height * self.line_spacing,
                        lines: vec![
                            LineLayout {
                                text: first_line,
                                extents: first_extents,
                            },
                            LineLayout {
                                text: second,
                                extents: second_extents,
                            },
                        ],
                        wrapped: true,
                    });
                }
                first = i + 1;
            }
            return self.single_line(&words.join(" "), size);
        }
        self.single_line(text, self.min_size)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Monospace stand-in: 0.6 em per character, 0.72 em of ink above the baseline
    pub(crate) struct MockMeasurer;

    impl TextMeasurer for MockMeasurer {
        fn measure_text(&self, text: &str, _font: &FontSpec, size: f64) -> Result<TextExtents> {
            let width = text.chars().count() as f64 * 0.6 * size;
            Ok(TextExtents {
                width,
                height: 0.72 * size,
                bearing_x: 0.0,
                bearing_y: -0.72 * size,
                advance: width,
            })
        }
    }

    fn fitter(font: &FontSpec) -> TextFitter<'_, MockMeasurer> {
        TextFitter::new(&MockMeasurer, font, 12.0)
    }

    #[test]
    fn block_wraps_greedily() {
        let font = FontSpec::default();
        // "AAA BBB" at size 10 is 42 px; each word is 18 px
        let block =
            measure_text_block(&MockMeasurer, "AAA BBB CC", &font, 10.0, 30.0, 1.15).unwrap();
        assert_eq!(block.lines, vec!["AAA", "BBB", "CC"]);
        assert!((block.width - 18.0).abs() < 1e-9);
        assert!((block.height - 3.0 * 7.2 * 1.15).abs() < 1e-9);
    }

    #[test]
    fn long_word_keeps_its_own_line() {
        let font = FontSpec::default();
        let block = measure_text_block(&MockMeasurer, "ENORMOUS", &font, 10.0, 5.0, 1.0).unwrap();
        assert_eq!(block.lines, vec!["ENORMOUS"]);
    }

    #[test]
    fn fit_in_box_shrinks_until_both_axes_fit() {
        let font = FontSpec::default();
        let layout = fitter(&font).fit_in_box("HELLO", 100.0, 100.0, 40.0, 0.8).unwrap();
        // 5 chars * 0.6 * size <= 80 -> size <= 26.67
        assert!(layout.font_size <= 80.0 / 3.0);
        assert!(layout.font_size > 80.0 / 3.0 * 0.92);
        assert!(!layout.wrapped);
    }

    #[test]
    fn fit_in_box_falls_back_to_the_floor() {
        let font = FontSpec::default();
        let layout = fitter(&font).fit_in_box("HELLO", 10.0, 10.0, 40.0, 0.8).unwrap();
        assert_eq!(layout.font_size, 12.0);
        assert_eq!(layout.line_texts(), vec!["HELLO"]);
    }

    #[test]
    fn wrap_splits_into_two_lines() {
        let font = FontSpec::default();
        // At size 20 each char is 12 px: "HELLO" 60, "HELLO BIG" 108, "BIG WORLD" 108
        let layout = fitter(&font).wrap_two_lines("HELLO BIG WORLD", 110.0, 20.0).unwrap();
        assert!(layout.wrapped);
        assert_eq!(layout.line_texts(), vec!["HELLO BIG", "WORLD"]);
        assert_eq!(layout.font_size, 20.0);
        assert!((layout.total_height - (14.4 + 14.4 * 1.1)).abs() < 1e-9);
    }

    #[test]
    fn wrap_keeps_one_line_when_it_fits() {
        let font = FontSpec::default();
        let layout = fitter(&font).wrap_two_lines("HI YOU", 500.0, 20.0).unwrap();
        assert!(!layout.wrapped);
        assert_eq!(layout.line_texts(), vec!["HI YOU"]);
    }

    #[test]
    fn wrap_shrinks_when_the_tail_is_too_wide() {
        let font = FontSpec::default();
        // Second line "BBBBBBBBBB" needs size <= 100 / 6
        let layout = fitter(&font).wrap_two_lines("A BBBBBBBBBB", 100.0, 40.0).unwrap();
        assert!(layout.wrapped);
        assert!(layout.font_size <= 100.0 / 6.0);
        assert!(layout.font_size >= 12.0);
    }

    #[test]
    fn wrap_falls_back_to_floor_single_line() {
        let font = FontSpec::default();
        let layout = fitter(&font)
            .wrap_two_lines("WAY TOO MUCH TEXT FOR THIS", 10.0, 30.0)
            .unwrap();
        assert!(!layout.wrapped);
        assert_eq!(layout.font_size, 12.0);
        assert_eq!(layout.line_texts(), vec!["WAY TOO MUCH TEXT FOR THIS"]);
    }

    #[test]
    fn wrap_is_idempotent() {
        let font = FontSpec::default();
        let f = fitter(&font);
        let a = f.wrap_two_lines("SOME WORDS TO WRAP HERE", 150.0, 33.0).unwrap();
        let b = f.wrap_two_lines("SOME WORDS TO WRAP HERE", 150.0, 33.0).unwrap();
        assert_eq!(
            (a.font_size, a.line_texts(), a.wrapped),
            (b.font_size, b.line_texts(), b.wrapped)
        );
    }

    #[test]
    fn single_word_is_never_wrapped() {
        let font = FontSpec::default();
        let layout = fitter(&font).wrap_two_lines("SUPERCALIFRAGILISTIC", 10.0, 8.0).unwrap();
        assert!(!layout.wrapped);
        assert_eq!(layout.font_size, 12.0);
    }
}
