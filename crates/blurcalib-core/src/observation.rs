//! Point observations and frame/cluster grouping.
//!
//! Observations come from an external feature-detection step; this module
//! only organizes them so the pairing stage can walk comparable groups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer index for frames, clusters and micro-lens lattice coordinates.
pub type Index = i32;

/// One point observation of a scene feature through a single micro-image.
///
/// `rho` is the signed geometric defocus-radius proxy computed by the
/// camera model, and `(k, l)` are the lattice coordinates of the
/// micro-lens that produced the observation. Observations of the same
/// feature within one frame share a `cluster` key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointObservation {
    /// Horizontal pixel coordinate.
    pub u: f64,
    /// Vertical pixel coordinate.
    pub v: f64,
    /// Signed defocus-radius proxy.
    pub rho: f64,
    /// Frame the observation was detected in.
    pub frame: Index,
    /// Grouping key for one scene feature within a frame.
    pub cluster: Index,
    /// Micro-lens lattice column.
    pub k: Index,
    /// Micro-lens lattice row.
    pub l: Index,
}

/// Observations of one frame, grouped by cluster.
pub type ClusterMap = BTreeMap<Index, Vec<PointObservation>>;

#[derive(Debug, Error)]
pub enum IndexError {
    /// The detection step provided nothing to calibrate on.
    #[error("no observations provided")]
    Empty,
}

/// Observations grouped by frame, then by cluster within each frame.
///
/// `BTreeMap` keys keep iteration order deterministic across runs. Every
/// input observation is kept exactly once; nothing is filtered or
/// deduplicated here.
#[derive(Debug, Clone)]
pub struct ObservationIndex {
    frames: BTreeMap<Index, ClusterMap>,
    num_observations: usize,
}

impl ObservationIndex {
    /// Group a flat observation list by frame and cluster.
    pub fn from_observations(observations: &[PointObservation]) -> Result<Self, IndexError> {
        if observations.is_empty() {
            return Err(IndexError::Empty);
        }
        let mut frames: BTreeMap<Index, ClusterMap> = BTreeMap::new();
        for ob in observations {
            frames
                .entry(ob.frame)
                .or_default()
                .entry(ob.cluster)
                .or_default()
                .push(*ob);
        }
        Ok(Self {
            frames,
            num_observations: observations.len(),
        })
    }

    /// Iterate frames in ascending index order.
    pub fn frames(&self) -> impl Iterator<Item = (Index, &ClusterMap)> {
        self.frames.iter().map(|(frame, clusters)| (*frame, clusters))
    }

    /// Iterate `(frame, cluster, observations)` triples in sorted order.
    pub fn clusters(&self) -> impl Iterator<Item = (Index, Index, &[PointObservation])> {
        self.frames.iter().flat_map(|(frame, clusters)| {
            clusters
                .iter()
                .map(move |(cluster, obs)| (*frame, *cluster, obs.as_slice()))
        })
    }

    /// Total number of indexed observations.
    pub fn num_observations(&self) -> usize {
        self.num_observations
    }

    /// Number of distinct frames.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ob(frame: Index, cluster: Index, k: Index) -> PointObservation {
        PointObservation {
            u: 1.0,
            v: 2.0,
            rho: 0.5,
            frame,
            cluster,
            k,
            l: 0,
        }
    }

    #[test]
    fn grouping_preserves_every_observation() {
        let observations = vec![ob(1, 0, 0), ob(0, 2, 1), ob(1, 0, 2), ob(0, 1, 3), ob(1, 5, 4)];
        let index = ObservationIndex::from_observations(&observations).unwrap();

        assert_eq!(index.num_observations(), 5);
        assert_eq!(index.num_frames(), 2);

        let total: usize = index.clusters().map(|(_, _, obs)| obs.len()).sum();
        assert_eq!(total, 5);

        let frame1_cluster0: Vec<_> = index
            .clusters()
            .filter(|(frame, cluster, _)| *frame == 1 && *cluster == 0)
            .flat_map(|(_, _, obs)| obs.iter().map(|o| o.k))
            .collect();
        assert_eq!(frame1_cluster0, vec![0, 2]);
    }

    #[test]
    fn iteration_order_is_sorted() {
        let observations = vec![ob(3, 7, 0), ob(1, 9, 0), ob(3, 2, 0), ob(1, 4, 0)];
        let index = ObservationIndex::from_observations(&observations).unwrap();

        let keys: Vec<_> = index
            .clusters()
            .map(|(frame, cluster, _)| (frame, cluster))
            .collect();
        assert_eq!(keys, vec![(1, 4), (1, 9), (3, 2), (3, 7)]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            ObservationIndex::from_observations(&[]),
            Err(IndexError::Empty)
        ));
    }

    #[test]
    fn observation_serde_roundtrip() {
        let observation = PointObservation {
            u: 12.5,
            v: 34.25,
            rho: -1.75,
            frame: 2,
            cluster: 8,
            k: 3,
            l: -1,
        };
        let json = serde_json::to_string(&observation).unwrap();
        let restored: PointObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, observation);
    }
}
