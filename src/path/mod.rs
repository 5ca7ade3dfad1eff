mod command;
mod config;
mod ingest;
mod vertices;

pub use command::{Command, PathElement};
pub use config::{PathConfig, BULGE_TOLERANCE, SPAN_TOLERANCE};
pub use vertices::{ControlVertices, Vertices};

use std::ops::Index;
use std::sync::Arc;

use crate::error::{PathError, Result};
use crate::math::polygon_2d::has_clockwise_orientation;
use crate::math::{is_close, transform_point, Matrix4, Point3};
use crate::tessellation::TessellationParams;

use vertices::Sampling;

/// A single contiguous 2D/3D curve made of line and Bézier segments.
///
/// The command list is shared between clones and copied on the first
/// mutation of either side, so cloning a path never copies point data.
#[derive(Debug, Clone)]
pub struct Path {
    start: Point3,
    commands: Arc<Vec<PathElement>>,
    config: PathConfig,
}

impl Default for Path {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

impl Path {
    /// Creates an empty path starting at `start`.
    #[must_use]
    pub fn new(start: Point3) -> Self {
        Self::with_config(start, PathConfig::default())
    }

    /// Creates an empty path with custom tolerances.
    #[must_use]
    pub fn with_config(start: Point3, config: PathConfig) -> Self {
        Self {
            start,
            commands: Arc::new(Vec::new()),
            config,
        }
    }

    /// Builds a polyline path through `vertices`.
    ///
    /// Fewer than two vertices give an empty path at the origin.
    #[must_use]
    pub fn from_vertices<I>(vertices: I, close: bool) -> Self
    where
        I: IntoIterator<Item = Point3>,
    {
        let vertices: Vec<Point3> = vertices.into_iter().collect();
        if vertices.len() < 2 {
            return Self::default();
        }
        let mut path = Self::new(vertices[0]);
        for &vertex in &vertices[1..] {
            path.line_to(vertex);
        }
        if close {
            path.close();
        }
        path
    }

    /// Returns the tolerances of this path.
    #[must_use]
    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> Point3 {
        self.start
    }

    /// Moves the start point of an empty path.
    ///
    /// # Errors
    ///
    /// Returns `PathError::InvalidState` if the path already has commands.
    pub fn set_start(&mut self, location: Point3) -> Result<()> {
        if !self.is_empty() {
            return Err(PathError::InvalidState("start point of a non-empty path is fixed").into());
        }
        self.start = location;
        Ok(())
    }

    /// Returns the end point, the start point for an empty path.
    #[must_use]
    pub fn end(&self) -> Point3 {
        self.commands.last().map_or(self.start, PathElement::end)
    }

    /// Returns the number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if the path has no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the command at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PathElement> {
        self.commands.get(index)
    }

    /// Returns all commands in order.
    #[must_use]
    pub fn commands(&self) -> &[PathElement] {
        &self.commands
    }

    /// Iterates over the commands.
    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.commands.iter()
    }

    /// Returns `true` if the start point is close to the end point.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        is_close(&self.start, &self.end(), self.config.point_tolerance)
    }

    /// Returns `true` if the path has any line segments.
    #[must_use]
    pub fn has_lines(&self) -> bool {
        self.commands.iter().any(|c| c.kind() == Command::LineTo)
    }

    /// Returns `true` if the path has any curve segments.
    #[must_use]
    pub fn has_curves(&self) -> bool {
        self.commands.iter().any(|c| c.kind().is_curve())
    }

    /// Iterates over all vertices defining the path shape: the start point,
    /// then the control points and end point of each command. Yields nothing
    /// for an empty path.
    #[must_use]
    pub fn control_vertices(&self) -> ControlVertices<'_> {
        ControlVertices::new(self)
    }

    /// Returns `true` if the control polygon winds clockwise in the XY plane.
    ///
    /// Degenerate paths without area report `false`.
    #[must_use]
    pub fn has_clockwise_orientation(&self) -> bool {
        has_clockwise_orientation(self.control_vertices())
    }

    /// Appends a command.
    pub fn push(&mut self, element: PathElement) {
        Arc::make_mut(&mut self.commands).push(element);
    }

    /// Appends a command of the given kind from `[end, ctrl...]`.
    ///
    /// # Errors
    ///
    /// See [`PathElement::new`].
    pub fn append(&mut self, kind: Command, points: &[Point3]) -> Result<()> {
        self.push(PathElement::new(kind, points)?);
        Ok(())
    }

    /// Adds a line from the current end point to `location`.
    pub fn line_to(&mut self, location: Point3) {
        self.push(PathElement::LineTo { end: location });
    }

    /// Adds a quadratic Bézier curve from the current end point to
    /// `location`.
    pub fn curve3_to(&mut self, location: Point3, ctrl: Point3) {
        self.push(PathElement::Curve3To { end: location, ctrl });
    }

    /// Adds a cubic Bézier curve from the current end point to `location`.
    pub fn curve4_to(&mut self, location: Point3, ctrl1: Point3, ctrl2: Point3) {
        self.push(PathElement::Curve4To {
            end: location,
            ctrl1,
            ctrl2,
        });
    }

    /// Closes the path with a line back to the start point, unless it is
    /// already closed.
    pub fn close(&mut self) {
        if !self.is_closed() {
            self.line_to(self.start);
        }
    }

    /// Returns a new path tracing the same geometry from end to start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        if self.is_empty() {
            return Self::with_config(Point3::origin(), self.config);
        }
        let mut path = Self::with_config(self.end(), self.config);
        let commands = Arc::make_mut(&mut path.commands);
        commands.reserve(self.len());
        for (index, element) in self.commands.iter().enumerate().rev() {
            let prev_end = if index > 0 {
                self.commands[index - 1].end()
            } else {
                self.start
            };
            commands.push(match *element {
                PathElement::LineTo { .. } => PathElement::LineTo { end: prev_end },
                PathElement::Curve3To { ctrl, .. } => PathElement::Curve3To {
                    end: prev_end,
                    ctrl,
                },
                PathElement::Curve4To { ctrl1, ctrl2, .. } => PathElement::Curve4To {
                    end: prev_end,
                    ctrl1: ctrl2,
                    ctrl2: ctrl1,
                },
            });
        }
        path
    }

    /// Returns the path in clockwise orientation.
    #[must_use]
    pub fn clockwise(&self) -> Self {
        if self.has_clockwise_orientation() {
            self.clone()
        } else {
            self.reversed()
        }
    }

    /// Returns the path in counter-clockwise orientation.
    #[must_use]
    pub fn counter_clockwise(&self) -> Self {
        if self.has_clockwise_orientation() {
            self.reversed()
        } else {
            self.clone()
        }
    }

    /// Returns a new path with every point transformed by `matrix`.
    #[must_use]
    pub fn transform(&self, matrix: &Matrix4) -> Self {
        Self {
            start: transform_point(matrix, &self.start),
            commands: Arc::new(self.commands.iter().map(|c| c.transform(matrix)).collect()),
            config: self.config,
        }
    }

    /// Samples the path with `segments` uniform steps per curve.
    ///
    /// Lines yield their end point only. Yields nothing for an empty path.
    #[must_use]
    pub fn approximate(&self, segments: usize) -> Vertices<'_> {
        Vertices::new(self, Sampling::Uniform(segments))
    }

    /// Samples the path with adaptive flattening: every curve is split into at
    /// least `segments` chords, and chords are bisected until their midpoint
    /// is within `distance` of the curve. Yields nothing for an empty path.
    #[must_use]
    pub fn flattening(&self, distance: f64, segments: usize) -> Vertices<'_> {
        self.flattening_with(&TessellationParams::new(distance, segments))
    }

    /// Adaptive flattening with explicit parameters.
    #[must_use]
    pub fn flattening_with(&self, params: &TessellationParams) -> Vertices<'_> {
        Vertices::new(self, Sampling::Adaptive(*params))
    }
}

impl Index<usize> for Path {
    type Output = PathElement;

    fn index(&self, index: usize) -> &PathElement {
        &self.commands[index]
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
