//! Module implementing the greedy word wrapping of captions.

use std::ops::Deref;
use std::slice;

use super::metrics::Measure;


/// Lines of a caption, as broken up by `wrap`.
///
/// There is always at least one line, although it may be empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedLines(Vec<String>);

impl WrappedLines {
    /// The first (topmost) line.
    #[inline]
    pub fn first_line(&self) -> &str {
        &self.0[0]
    }

    /// The last (bottommost) line.
    #[inline]
    pub fn last_line(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<String> {
        self.0.iter()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for WrappedLines {
    type Target = [String];
    fn deref(&self) -> &Self::Target {
        &self.0[..]
    }
}

impl<'l> IntoIterator for &'l WrappedLines {
    type Item = &'l String;
    type IntoIter = slice::Iter<'l, String>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


/// Width available for text on an image of given width,
/// after applying horizontal padding (in percent of that width).
pub fn available_width(image_width: f32, padding_percent: f32) -> f32 {
    if padding_percent != 0.0 {
        image_width - image_width * (padding_percent / 100.0)
    } else {
        image_width
    }
}


/// Break the caption into lines which fit within given width.
///
/// Words are separated by single spaces and are never broken up,
/// so a word wider than the available width ends up alone on its own line.
/// Consecutive spaces produce empty words which take up the width
/// of the separating space but nothing else.
pub fn wrap<M: Measure + ?Sized>(caption: &str, available_width: f32, measure: &M) -> WrappedLines {
    let space_width = measure.width(" ");
    trace!("Wrapping caption of length {} to width {} (space width: {})",
        caption.len(), available_width, space_width);

    let mut lines: Vec<String> = vec![];
    let mut current_width = 0.0;
    for word in caption.split(' ') {
        let word_width = measure.width(word);
        current_width += if current_width == 0.0 { word_width }
                         else { word_width + space_width };

        if current_width < available_width {
            match lines.last_mut() {
                Some(line) => {
                    line.push(' ');
                    line.push_str(word);
                }
                None => lines.push(word.to_owned()),
            }
        } else {
            current_width = word_width;
            lines.push(word.to_owned());
        }
    }

    trace!("Caption wrapped into {} line(s)", lines.len());
    // str::split always yields at least one item.
    debug_assert!(!lines.is_empty());
    WrappedLines(lines)
}
