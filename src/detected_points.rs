use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, FrameSide, Result};

/// Image feature as delivered by the vision front-end.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    pub pt: Vec2,
    #[serde(default)]
    pub size: f32,
    #[serde(default)]
    pub response: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32) -> Keypoint {
        Keypoint {
            pt: Vec2::new(x, y),
            ..Default::default()
        }
    }
}

/// Correspondence between a previous-frame keypoint (`query_idx`) and a
/// current-frame keypoint (`train_idx`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KeypointMatch {
    pub query_idx: usize,
    pub train_idx: usize,
    #[serde(default)]
    pub distance: f32,
}

impl KeypointMatch {
    pub fn new(query_idx: usize, train_idx: usize) -> KeypointMatch {
        KeypointMatch {
            query_idx,
            train_idx,
            distance: 0.0,
        }
    }

    /// Both pixel positions of the match, previous first.
    pub fn points(&self, kpts_prev: &[Keypoint], kpts_curr: &[Keypoint]) -> Result<(Vec2, Vec2)> {
        Ok((
            keypoint_at(kpts_prev, self.query_idx, FrameSide::Prev)?.pt,
            keypoint_at(kpts_curr, self.train_idx, FrameSide::Curr)?.pt,
        ))
    }
}

pub(crate) fn keypoint_at(kpts: &[Keypoint], index: usize, side: FrameSide) -> Result<&Keypoint> {
    kpts.get(index).ok_or(Error::KeypointIndexOutOfRange {
        side,
        index,
        len: kpts.len(),
    })
}
