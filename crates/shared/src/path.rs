use thiserror::Error;

use crate::models::Point;
use crate::space;

/// A finished route must have at least one segment.
pub const MIN_PATH_POINTS: usize = 2;

/// Past this many points the route is probably over-traced.
pub const DEFAULT_SOFT_POINT_LIMIT: usize = 15;

/// Consecutive points closer than this (map units) make near-degenerate segments.
pub const DEFAULT_MIN_SPACING: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracerConfig {
    pub soft_point_limit: usize,
    pub min_spacing: f64,
}

impl Default for TracerConfig {
    fn default() -> Self {
        TracerConfig {
            soft_point_limit: DEFAULT_SOFT_POINT_LIMIT,
            min_spacing: DEFAULT_MIN_SPACING,
        }
    }
}

/// A single finding about a traced route. Indices are 0-based.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathIssue {
    #[error("point #{} ({x:.1}, {y:.1}) is outside the map", .index + 1)]
    OutOfBounds { index: usize, x: f64, y: f64 },

    #[error("point #{} has a non-numeric coordinate", .index + 1)]
    NonFinite { index: usize },

    #[error("a path needs at least {min} points, got {count}")]
    TooFewPoints { count: usize, min: usize },

    #[error("point #{} is only {distance:.1} units from the previous one", .index + 1)]
    TooClose { index: usize, distance: f64 },

    #[error("path has {count} points (more than {soft_limit}); consider simplifying it")]
    TooLong { count: usize, soft_limit: usize },
}

impl PathIssue {
    /// Blocking issues prevent a path from being finished; the rest are advisory.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            PathIssue::OutOfBounds { .. } | PathIssue::NonFinite { .. } | PathIssue::TooFewPoints { .. }
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathValidation {
    pub warnings: Vec<PathIssue>,
    pub errors: Vec<PathIssue>,
}

impl PathValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, issue: PathIssue) {
        if issue.is_blocking() {
            self.errors.push(issue);
        } else {
            self.warnings.push(issue);
        }
    }
}

/// Check a point sequence as a finished route.
pub fn validate(points: &[Point], config: &TracerConfig) -> PathValidation {
    let mut report = PathValidation::default();

    for (index, p) in points.iter().enumerate() {
        if !p.x.is_finite() || !p.y.is_finite() {
            report.push(PathIssue::NonFinite { index });
        } else if !p.in_bounds() {
            report.push(PathIssue::OutOfBounds {
                index,
                x: p.x,
                y: p.y,
            });
        }
    }

    if points.len() < MIN_PATH_POINTS {
        report.push(PathIssue::TooFewPoints {
            count: points.len(),
            min: MIN_PATH_POINTS,
        });
    }

    for (i, w) in points.windows(2).enumerate() {
        if let Some(issue) = spacing_issue(w[0], w[1], i + 1, config) {
            report.push(issue);
        }
    }

    if points.len() > config.soft_point_limit {
        report.push(PathIssue::TooLong {
            count: points.len(),
            soft_limit: config.soft_point_limit,
        });
    }

    report
}

fn spacing_issue(prev: Point, next: Point, index: usize, config: &TracerConfig) -> Option<PathIssue> {
    let d = space::distance(prev, next);
    (d.is_finite() && d < config.min_spacing).then_some(PathIssue::TooClose { index, distance: d })
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("path tracing is not active")]
    NotTracing,

    #[error("a path needs at least {min} points, got {0}", min = MIN_PATH_POINTS)]
    TooFewPoints(usize),

    #[error("path has {} blocking problem(s)", .0.len())]
    Invalid(Vec<PathIssue>),
}

/// A route that passed validation. Always holds at least [`MIN_PATH_POINTS`] points;
/// the last one is where the room sits.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedPath {
    points: Vec<Point>,
    destination: Point,
    warnings: Vec<PathIssue>,
}

impl FinishedPath {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn destination(&self) -> Point {
        self.destination
    }

    /// Advisory findings that were present when the path was finished.
    pub fn warnings(&self) -> &[PathIssue] {
        &self.warnings
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Accumulates clicked points into a navigation route.
#[derive(Debug, Clone, Default)]
pub struct PathTracer {
    config: TracerConfig,
    points: Vec<Point>,
    active: bool,
}

impl PathTracer {
    pub fn new(config: TracerConfig) -> Self {
        PathTracer {
            config,
            points: Vec::new(),
            active: false,
        }
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Start a fresh route, discarding anything in progress.
    pub fn start(&mut self) {
        self.points.clear();
        self.active = true;
        tracing::debug!("path tracing started");
    }

    /// Start from an existing route, e.g. when editing a room's stored path.
    pub fn start_from(&mut self, points: &[Point]) {
        self.points = points.to_vec();
        self.active = true;
        tracing::debug!(points = points.len(), "path tracing resumed");
    }

    /// Append a point. Returns the advisory warnings the new point triggered;
    /// they never prevent the point from being added.
    pub fn add_point(&mut self, p: Point) -> Result<Vec<PathIssue>, PathError> {
        if !self.active {
            return Err(PathError::NotTracing);
        }

        let index = self.points.len();
        let mut warnings = Vec::new();
        if let Some(prev) = self.points.last().copied() {
            if let Some(issue) = spacing_issue(prev, p, index, &self.config) {
                warnings.push(issue);
            }
        }
        self.points.push(p);
        if self.points.len() > self.config.soft_point_limit {
            warnings.push(PathIssue::TooLong {
                count: self.points.len(),
                soft_limit: self.config.soft_point_limit,
            });
        }

        for w in &warnings {
            tracing::warn!(%w, "path warning");
        }
        tracing::debug!(x = p.x, y = p.y, count = self.points.len(), "path point added");
        Ok(warnings)
    }

    /// Drop the most recent point. No-op on an empty path.
    pub fn remove_last(&mut self) -> Option<Point> {
        let removed = self.points.pop();
        if removed.is_some() {
            tracing::debug!(count = self.points.len(), "path point removed");
        }
        removed
    }

    /// Validate the in-progress route against the finishing rules.
    pub fn validate(&self) -> PathValidation {
        validate(&self.points, &self.config)
    }

    /// Freeze the route. On error nothing changes, so the user can keep editing.
    pub fn finish(&mut self) -> Result<FinishedPath, PathError> {
        if !self.active {
            return Err(PathError::NotTracing);
        }
        if self.points.len() < MIN_PATH_POINTS {
            return Err(PathError::TooFewPoints(self.points.len()));
        }
        let report = self.validate();
        if !report.is_valid() {
            return Err(PathError::Invalid(report.errors));
        }
        let Some(&destination) = self.points.last() else {
            return Err(PathError::TooFewPoints(0));
        };

        self.active = false;
        let points = std::mem::take(&mut self.points);
        tracing::info!(points = points.len(), "path finished");
        Ok(FinishedPath {
            points,
            destination,
            warnings: report.warnings,
        })
    }

    /// Discard the route and leave tracing.
    pub fn cancel(&mut self) {
        self.points.clear();
        self.active = false;
        tracing::debug!("path tracing cancelled");
    }
}
