use penmark_types::Rect;

pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Checks whether a block of `child_height` starting at `cursor_y` still fits inside
/// `bounds`. `cursor_y` is absolute, like `bounds.y`.
pub fn check_child_fit(cursor_y: f32, child_height: f32, bounds: Rect) -> BreakAnalysis {
    let available = (bounds.bottom() - cursor_y).max(0.0);
    // Small epsilon absorbs accumulated float error over many lines.
    const EPSILON: f32 = 0.01;
    BreakAnalysis {
        should_break: child_height > available + EPSILON,
        remaining_height: available,
    }
}
