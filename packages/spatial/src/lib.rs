#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Nearest-center spatial search for zone formation.
//!
//! Centers are loaded once per formation run into an R-tree over unit-sphere
//! positions, then every candidate point is matched to its closest center
//! in one batch call. A brute-force search over all centers implements the
//! same contract and is used whenever the index cannot be built or queried.
//!
//! When two centers are exactly equidistant from a point, which one is
//! returned is unspecified. Callers may only rely on getting some center at
//! the minimum distance.

pub mod distance;

use rstar::RTree;
use rstar::primitives::GeomWithData;

pub use distance::{
    EARTH_RADIUS_KM, RadianPoint, angle_to_km, central_angle, haversine_km, km_to_angle,
};

/// Errors raised by the indexed search path.
#[derive(Debug, thiserror::Error)]
pub enum SpatialError {
    /// A center has a `NaN` or infinite coordinate and cannot be indexed.
    #[error("center {index} has a non-finite coordinate")]
    NonFiniteCenter {
        /// Position of the offending center in the input slice.
        index: usize,
    },

    /// The search radius is negative or `NaN`.
    #[error("invalid search radius: {radius} rad")]
    InvalidRadius {
        /// The rejected radius, as a central angle in radians.
        radius: f64,
    },
}

/// The center matched to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestCenter {
    /// Position of the center in the slice the search was built from.
    pub center: usize,
    /// Central angle between the query point and the center, in radians.
    pub angular_distance: f64,
}

impl NearestCenter {
    /// Distance to the center in kilometers.
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        angle_to_km(self.angular_distance)
    }
}

/// Which search implementation to try first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// R-tree index, degrading to brute force on failure.
    #[default]
    Indexed,
    /// Compare every point with every center.
    BruteForce,
}

/// Batch "closest center within radius" lookups.
pub trait NearestCenterSearch: Send + Sync {
    /// For every query point returns the nearest center whose central angle
    /// is at most `max_angle`, or `None` when no center is that close.
    ///
    /// The output has exactly one entry per query point, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError`] if the search itself cannot be performed.
    fn nearest_within(
        &self,
        queries: &[RadianPoint],
        max_angle: f64,
    ) -> Result<Vec<Option<NearestCenter>>, SpatialError>;

    /// Number of centers searched.
    fn len(&self) -> usize;

    /// Whether the search holds no centers.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the implementation, for logging.
    fn strategy(&self) -> &'static str;
}

type IndexedCenter = GeomWithData<[f64; 3], usize>;

/// R-tree over center positions on the unit sphere.
pub struct CenterIndex {
    tree: RTree<IndexedCenter>,
    centers: Vec<RadianPoint>,
}

impl CenterIndex {
    /// Bulk-loads the index.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::NonFiniteCenter`] if any center has a
    /// non-finite coordinate.
    pub fn build(centers: &[RadianPoint]) -> Result<Self, SpatialError> {
        if let Some(index) = centers.iter().position(|c| !c.is_finite()) {
            return Err(SpatialError::NonFiniteCenter { index });
        }

        let entries: Vec<IndexedCenter> = centers
            .iter()
            .enumerate()
            .map(|(i, c)| GeomWithData::new(c.to_unit_vector(), i))
            .collect();

        Ok(Self {
            tree: RTree::bulk_load(entries),
            centers: centers.to_vec(),
        })
    }
}

impl NearestCenterSearch for CenterIndex {
    fn nearest_within(
        &self,
        queries: &[RadianPoint],
        max_angle: f64,
    ) -> Result<Vec<Option<NearestCenter>>, SpatialError> {
        if max_angle.is_nan() || max_angle < 0.0 {
            return Err(SpatialError::InvalidRadius { radius: max_angle });
        }

        Ok(queries
            .iter()
            .map(|query| {
                if !query.is_finite() {
                    return None;
                }
                let hit = self.tree.nearest_neighbor(&query.to_unit_vector())?;
                let angular_distance = central_angle(*query, self.centers[hit.data]);
                (angular_distance <= max_angle).then_some(NearestCenter {
                    center: hit.data,
                    angular_distance,
                })
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.centers.len()
    }

    fn strategy(&self) -> &'static str {
        "rtree"
    }
}

/// Exhaustive haversine search, `O(centers × queries)`.
///
/// Never fails: centers with non-finite coordinates can never be the
/// closest match, and an invalid radius matches nothing.
pub struct BruteForceSearch {
    centers: Vec<RadianPoint>,
}

impl BruteForceSearch {
    /// Wraps the centers without any preprocessing.
    #[must_use]
    pub fn new(centers: &[RadianPoint]) -> Self {
        Self {
            centers: centers.to_vec(),
        }
    }

    fn nearest(&self, query: RadianPoint) -> Option<NearestCenter> {
        let mut best: Option<NearestCenter> = None;

        for (center, point) in self.centers.iter().enumerate() {
            let angular_distance = central_angle(query, *point);
            match best {
                Some(current) if angular_distance >= current.angular_distance => {}
                _ if angular_distance.is_nan() => {}
                _ => {
                    best = Some(NearestCenter {
                        center,
                        angular_distance,
                    });
                }
            }
        }

        best
    }
}

impl NearestCenterSearch for BruteForceSearch {
    fn nearest_within(
        &self,
        queries: &[RadianPoint],
        max_angle: f64,
    ) -> Result<Vec<Option<NearestCenter>>, SpatialError> {
        Ok(queries
            .iter()
            .map(|query| {
                self.nearest(*query)
                    .filter(|hit| hit.angular_distance <= max_angle)
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.centers.len()
    }

    fn strategy(&self) -> &'static str {
        "brute_force"
    }
}

/// Builds the search for `strategy`, degrading to [`BruteForceSearch`] if
/// the index cannot be built.
#[must_use]
pub fn build_search(
    centers: &[RadianPoint],
    strategy: SearchStrategy,
) -> Box<dyn NearestCenterSearch> {
    match strategy {
        SearchStrategy::BruteForce => Box::new(BruteForceSearch::new(centers)),
        SearchStrategy::Indexed => match CenterIndex::build(centers) {
            Ok(index) => Box::new(index),
            Err(e) => {
                log::warn!("Spatial index construction failed, using brute-force search: {e}");
                Box::new(BruteForceSearch::new(centers))
            }
        },
    }
}

/// Matches every query point to its nearest center within `max_angle`.
///
/// Index failures are never fatal: if the preferred search errors, the
/// batch is recomputed with [`BruteForceSearch`].
#[must_use]
pub fn nearest_centers(
    centers: &[RadianPoint],
    queries: &[RadianPoint],
    max_angle: f64,
    strategy: SearchStrategy,
) -> Vec<Option<NearestCenter>> {
    let search = build_search(centers, strategy);
    log::debug!(
        "Matching {} points against {} centers ({})",
        queries.len(),
        search.len(),
        search.strategy()
    );

    match search.nearest_within(queries, max_angle) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("Spatial index query failed, using brute-force search: {e}");
            BruteForceSearch::new(centers)
                .nearest_within(queries, max_angle)
                .unwrap_or_else(|_| vec![None; queries.len()])
        }
    }
}
