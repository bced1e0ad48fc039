//! 2.5D lane positioning
//!
//! Maps a duck's race progress to where the shell should draw it. Lanes
//! near the top (low index) are the front of the pond: larger and drawn on
//! top. All values are percentages of the race area.

use serde::{Deserialize, Serialize};

/// Vertical position of the first lane (% from top)
const LANE_START_PERCENT: f64 = 28.0;
/// Vertical band shared by all lanes (%)
const LANE_TOTAL_HEIGHT_PERCENT: f64 = 58.0;
/// Scale of the nearest duck
const MAX_DEPTH_SCALE: f64 = 1.1;
/// Scale lost between the nearest and the farthest duck
const DEPTH_SCALE_REDUCTION: f64 = 0.35;
/// Stack order of the nearest duck
const BASE_STACK_ORDER: i32 = 50;
/// Progress -> horizontal offset compression
const PROGRESS_TO_VISUAL_RATIO: f64 = 0.72;
/// Horizontal offset of the finish line (%)
const MAX_VISUAL_POSITION: f64 = 70.0;

/// Ripple lanes use a wider, higher band than the ducks
const RIPPLE_LANE_START: f64 = 15.0;
const RIPPLE_LANE_HEIGHT: f64 = 70.0;
const RIPPLE_DROP: f64 = 8.0;
const RIPPLE_LEAD: f64 = 5.0;

/// Where and how to draw one duck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderPosition {
    /// Lane position (% from top)
    pub vertical_percent: f64,
    /// Distance along the course (% from the start line)
    pub horizontal_percent: f64,
    /// 1.1 for the front lane down to 0.75 for the back lane
    pub depth_scale: f64,
    /// Higher draws on top
    pub stack_order: i32,
    /// Wake ripple centre, horizontal (%)
    pub ripple_x: f64,
    /// Wake ripple centre, vertical (%)
    pub ripple_y: f64,
    /// Scale for the name tag, undoing `depth_scale`
    pub label_scale: f64,
}

/// Compute the render position of duck `index` out of `total` at `progress` (0-100).
pub fn compute_render_position(index: usize, total: usize, progress: f64) -> RenderPosition {
    let lane_spacing = LANE_TOTAL_HEIGHT_PERCENT / total.max(1) as f64;
    let vertical_percent = LANE_START_PERCENT + index as f64 * lane_spacing;

    let depth_ratio = if total > 1 {
        index as f64 / (total - 1) as f64
    } else {
        0.0
    };
    let depth_scale = MAX_DEPTH_SCALE - depth_ratio * DEPTH_SCALE_REDUCTION;

    let stack_order = BASE_STACK_ORDER - index.min(i32::MAX as usize) as i32;
    let (ripple_x, ripple_y) = compute_ripple_anchor(index, total, progress);

    RenderPosition {
        vertical_percent,
        horizontal_percent: visual_offset(progress),
        depth_scale,
        stack_order,
        ripple_x,
        ripple_y,
        label_scale: label_counter_scale(depth_scale),
    }
}

/// Horizontal offset for a progress value, pinned at the finish line.
pub fn visual_offset(progress: f64) -> f64 {
    (progress * PROGRESS_TO_VISUAL_RATIO).min(MAX_VISUAL_POSITION)
}

/// Centre of the wake ripple trailing a duck, as `(cx, cy)` percentages.
pub fn compute_ripple_anchor(index: usize, total: usize, progress: f64) -> (f64, f64) {
    let lane_spacing = RIPPLE_LANE_HEIGHT / total.max(1) as f64;
    let cy = RIPPLE_LANE_START + index as f64 * lane_spacing + RIPPLE_DROP;
    let cx = visual_offset(progress) + RIPPLE_LEAD;
    (cx, cy)
}

/// Scale that keeps a duck's label the same size whatever its depth.
pub fn label_counter_scale(depth_scale: f64) -> f64 {
    1.0 / depth_scale
}
