use log::{debug, info};
use serde::Serialize;

use crate::calibration::Calibration;
use crate::config::FusionConfig;
use crate::detected_points::KeypointMatch;
use crate::error::{Error, FrameSide};
use crate::lidar::{cluster_lidar_with_roi, crop_lidar_points};
use crate::matching::{cluster_kpt_matches_with_roi_sigma, match_bounding_boxes};
use crate::ttc::{compute_ttc_camera_with, compute_ttc_lidar_with};
use crate::types::DataFrame;

/// Both estimates for one object tracked from the previous into the current frame.
#[derive(Debug, Clone, Serialize)]
pub struct TtcEstimate {
    pub prev_box_id: u32,
    pub curr_box_id: u32,
    /// NaN when unavailable
    pub ttc_lidar: f64,
    /// NaN when unavailable
    pub ttc_camera: f64,
    pub lidar_points_prev: usize,
    pub lidar_points_curr: usize,
    pub kpt_matches: usize,
}

impl TtcEstimate {
    pub fn lidar(&self) -> Option<f64> {
        self.ttc_lidar.is_finite().then_some(self.ttc_lidar)
    }

    pub fn camera(&self) -> Option<f64> {
        self.ttc_camera.is_finite().then_some(self.ttc_camera)
    }
}

/// Runs clustering, association and both estimators over a frame pair.
pub struct FusionPipeline {
    pub calibration: Calibration,
    pub config: FusionConfig,
}

impl FusionPipeline {
    pub fn new(calibration: Calibration, config: FusionConfig) -> FusionPipeline {
        FusionPipeline {
            calibration,
            config,
        }
    }

    /// Crop the frame's lidar points and cluster them into its boxes.
    pub fn prepare_frame(&self, frame: &mut DataFrame) {
        let cropped = crop_lidar_points(&frame.lidar_points, &self.config.crop);
        for b in frame.bounding_boxes.iter_mut() {
            b.lidar_points.clear();
        }
        cluster_lidar_with_roi(
            &mut frame.bounding_boxes,
            &cropped,
            self.config.shrink_factor,
            &self.calibration,
        );
        frame.lidar_points = cropped;
    }

    /// Estimate TTC for every box pair linked by `matches`. Both frames are
    /// expected to have gone through [`FusionPipeline::prepare_frame`]. Only
    /// pairs with lidar support in both frames produce an estimate.
    pub fn process(
        &self,
        prev_frame: &DataFrame,
        curr_frame: &mut DataFrame,
        matches: &[KeypointMatch],
    ) -> crate::Result<Vec<TtcEstimate>> {
        curr_frame.kpt_matches = matches.to_vec();
        curr_frame.bb_matches = match_bounding_boxes(matches, prev_frame, curr_frame)?;

        let frame_rate = self.config.frame_rate;
        let mut estimates = Vec::new();
        let DataFrame {
            keypoints: ref kpts_curr,
            ref mut bounding_boxes,
            ref bb_matches,
            ..
        } = *curr_frame;

        for (&prev_id, &curr_id) in bb_matches.iter() {
            let prev_bb = prev_frame.find_box(prev_id).ok_or(Error::UnknownBoxId {
                side: FrameSide::Prev,
                box_id: prev_id,
            })?;
            let curr_bb = bounding_boxes
                .iter_mut()
                .find(|b| b.box_id == curr_id)
                .ok_or(Error::UnknownBoxId {
                    side: FrameSide::Curr,
                    box_id: curr_id,
                })?;
            if prev_bb.lidar_points.is_empty() || curr_bb.lidar_points.is_empty() {
                debug!("skip box {} -> {}: no lidar points", prev_id, curr_id);
                continue;
            }

            let ttc_lidar = compute_ttc_lidar_with(
                &prev_bb.lidar_points,
                &curr_bb.lidar_points,
                frame_rate,
                &self.config.lidar,
            );

            curr_bb.kpt_matches.clear();
            cluster_kpt_matches_with_roi_sigma(
                curr_bb,
                &prev_frame.keypoints,
                kpts_curr,
                matches,
                self.config.camera.outlier_sigma,
            )?;
            let ttc_camera = compute_ttc_camera_with(
                &prev_frame.keypoints,
                kpts_curr,
                &curr_bb.kpt_matches,
                frame_rate,
                &self.config.camera,
            )?;

            info!(
                "box {} -> {}: ttc lidar {:.3} s, ttc camera {:.3} s",
                prev_id, curr_id, ttc_lidar, ttc_camera
            );
            estimates.push(TtcEstimate {
                prev_box_id: prev_id,
                curr_box_id: curr_id,
                ttc_lidar,
                ttc_camera,
                lidar_points_prev: prev_bb.lidar_points.len(),
                lidar_points_curr: curr_bb.lidar_points.len(),
                kpt_matches: curr_bb.kpt_matches.len(),
            });
        }
        Ok(estimates)
    }
}
