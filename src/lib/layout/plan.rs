//! Module implementing the vertical placement of caption lines.

use super::metrics::Measure;
use super::wrap::WrappedLines;


/// Characters with glyphs that extend below the baseline.
pub const DESCENDERS: &'static [char] = &['g', 'j', 'p', 'q', 'y'];


/// Edge of the image that a caption is anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gravity {
    /// Caption is placed at the top, with y growing downwards.
    North,
    /// Caption is placed at the bottom, with y growing upwards
    /// (i.e. measured from the bottom edge of the image).
    South,
}


/// Result of vertical layout of a caption.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    /// Gravity the caption was laid out with.
    pub gravity: Gravity,
    /// Y coordinate of each line, in the order of `WrappedLines`.
    ///
    /// For `Gravity::North`, this is the distance from the top edge
    /// to the top of the line. For `Gravity::South`, it's the distance
    /// from the bottom edge to the bottom of the line.
    pub line_ys: Vec<f32>,
    /// Total vertical space taken by the caption, including padding.
    pub extent: f32,
}


/// Compute vertical positions of caption lines.
///
/// The first placed line is offset by `y_padding` from the anchoring edge,
/// each following one by its own text height plus `line_height`.
/// For `Gravity::South` the lines are placed bottom-up, so that the caption
/// still reads from top to bottom.
///
/// The extent is computed the same way for both gravities: the tail below
/// the last offset is the text height if the last line of the caption
/// has descenders, or the first line's ascent otherwise.
pub fn plan<M: Measure + ?Sized>(lines: &WrappedLines, measure: &M,
                                 y_padding: f32, line_height: f32,
                                 gravity: Gravity) -> LayoutResult {
    let first = measure.metrics(lines.first_line());
    let mut y = match gravity {
        Gravity::North => first.bounds.max_y - first.ascent + y_padding,
        Gravity::South => y_padding,
    };
    trace!("Laying out {} line(s) with {:?} gravity, starting at y={}",
        lines.len(), gravity, y);

    let count = lines.len();
    let mut line_ys = vec![0.0; count];
    let mut order: Vec<usize> = (0..count).collect();
    if gravity == Gravity::South {
        order.reverse();
    }
    for (n, &i) in order.iter().enumerate() {
        if n > 0 {
            y += measure.metrics(&lines[i]).height + line_height;
        }
        line_ys[i] = y;
    }

    let last = lines.last_line();
    let tail = if last.contains(DESCENDERS) {
        measure.metrics(last).height
    } else {
        first.ascent
    };
    let extent = y + tail + y_padding;
    debug!("Caption of {} line(s) takes up {}px ({:?})", count, extent, gravity);

    LayoutResult{gravity, line_ys, extent}
}
