use std::collections::BTreeMap;

use glam::Vec2;
use log::{debug, trace};

use crate::detected_points::{Keypoint, KeypointMatch};
use crate::types::{BoundingBox, DataFrame};
use crate::util::{mean_stdev, most_frequent};

/// Matches farther than this many stdevs from the box mean are outliers.
pub const DEFAULT_OUTLIER_SIGMA: f64 = 3.0;

/// Ids of all boxes whose roi contains `pt`.
pub fn enclosing_box_ids(pt: Vec2, bounding_boxes: &[BoundingBox]) -> Vec<u32> {
    bounding_boxes
        .iter()
        .filter(|b| b.roi.contains(pt))
        .map(|b| b.box_id)
        .collect()
}

/// For every previous-frame box, the current-frame box that most keypoint
/// matches flow into.
pub fn match_bounding_boxes(
    matches: &[KeypointMatch],
    prev_frame: &DataFrame,
    curr_frame: &DataFrame,
) -> crate::Result<BTreeMap<u32, u32>> {
    // insertion order of the votes matters for the tie-break
    let mut votes: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for m in matches {
        let (p_prev, p_curr) = m.points(&prev_frame.keypoints, &curr_frame.keypoints)?;
        let ids_prev = enclosing_box_ids(p_prev, &prev_frame.bounding_boxes);
        let ids_curr = enclosing_box_ids(p_curr, &curr_frame.bounding_boxes);
        for &id_prev in &ids_prev {
            votes
                .entry(id_prev)
                .or_default()
                .extend(ids_curr.iter().copied());
        }
    }

    let bb_best_matches: BTreeMap<u32, u32> = votes
        .iter()
        .filter_map(|(&id_prev, v)| most_frequent(v).map(|id_curr| (id_prev, id_curr)))
        .collect();
    debug!(
        "matched {} of {} previous boxes",
        bb_best_matches.len(),
        prev_frame.bounding_boxes.len()
    );
    Ok(bb_best_matches)
}

/// Attach to `bounding_box` the matches with both endpoints inside its roi,
/// then drop the matches that are outliers in either frame.
pub fn cluster_kpt_matches_with_roi(
    bounding_box: &mut BoundingBox,
    kpts_prev: &[Keypoint],
    kpts_curr: &[Keypoint],
    kpt_matches: &[KeypointMatch],
) -> crate::Result<()> {
    cluster_kpt_matches_with_roi_sigma(
        bounding_box,
        kpts_prev,
        kpts_curr,
        kpt_matches,
        DEFAULT_OUTLIER_SIGMA,
    )
}

pub fn cluster_kpt_matches_with_roi_sigma(
    bounding_box: &mut BoundingBox,
    kpts_prev: &[Keypoint],
    kpts_curr: &[Keypoint],
    kpt_matches: &[KeypointMatch],
    sigma: f64,
) -> crate::Result<()> {
    for m in kpt_matches {
        let (p_prev, p_curr) = m.points(kpts_prev, kpts_curr)?;
        if bounding_box.roi.contains(p_curr) && bounding_box.roi.contains(p_prev) {
            bounding_box.kpt_matches.push(*m);
        }
    }
    let in_roi = bounding_box.kpt_matches.len();
    remove_kpt_match_outliers(bounding_box, kpts_prev, kpts_curr, sigma)?;
    trace!(
        "box {}: {} matches in roi, {} after outlier removal",
        bounding_box.box_id,
        in_roi,
        bounding_box.kpt_matches.len()
    );
    Ok(())
}

/// Per-axis `mean ± sigma * stdev` bounds.
#[derive(Debug, Clone, Copy)]
struct PixelWindow {
    x: (f64, f64),
    y: (f64, f64),
}

impl PixelWindow {
    fn from_points(points: &[Vec2], sigma: f64) -> PixelWindow {
        let xs: Vec<f64> = points.iter().map(|p| p.x as f64).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y as f64).collect();
        let (mx, sx) = mean_stdev(&xs);
        let (my, sy) = mean_stdev(&ys);
        PixelWindow {
            x: (mx - sigma * sx, mx + sigma * sx),
            y: (my - sigma * sy, my + sigma * sy),
        }
    }

    fn contains(&self, p: Vec2) -> bool {
        let (x, y) = (p.x as f64, p.y as f64);
        self.x.0 <= x && x <= self.x.1 && self.y.0 <= y && y <= self.y.1
    }
}

/// Drop the box's matches whose current pixel is outside the current-frame
/// window or whose previous pixel is outside the previous-frame window.
pub fn remove_kpt_match_outliers(
    bounding_box: &mut BoundingBox,
    kpts_prev: &[Keypoint],
    kpts_curr: &[Keypoint],
    sigma: f64,
) -> crate::Result<()> {
    if bounding_box.kpt_matches.is_empty() {
        return Ok(());
    }
    let (pts_prev, pts_curr): (Vec<Vec2>, Vec<Vec2>) = bounding_box
        .kpt_matches
        .iter()
        .map(|m| m.points(kpts_prev, kpts_curr))
        .collect::<crate::Result<Vec<_>>>()?
        .into_iter()
        .unzip();
    let window_prev = PixelWindow::from_points(&pts_prev, sigma);
    let window_curr = PixelWindow::from_points(&pts_curr, sigma);

    let mut idx = 0;
    bounding_box.kpt_matches.retain(|_| {
        let keep = window_curr.contains(pts_curr[idx]) && window_prev.contains(pts_prev[idx]);
        idx += 1;
        keep
    });
    Ok(())
}
