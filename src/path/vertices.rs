use std::iter::FusedIterator;
use std::vec;

use crate::geometry::{Bezier3, Bezier4};
use crate::math::Point3;
use crate::tessellation::{approximate_curve, flatten_curve, TessellationParams};

use super::{Path, PathElement};

/// Iterator over the shape-defining vertices of a [`Path`].
///
/// Created by [`Path::control_vertices`].
#[derive(Debug, Clone)]
pub struct ControlVertices<'a> {
    path: &'a Path,
    started: bool,
    command: usize,
    vertex: usize,
}

impl<'a> ControlVertices<'a> {
    pub(super) fn new(path: &'a Path) -> Self {
        Self {
            path,
            started: false,
            command: 0,
            vertex: 0,
        }
    }
}

impl Iterator for ControlVertices<'_> {
    type Item = Point3;

    fn next(&mut self) -> Option<Point3> {
        if !self.started {
            self.started = true;
            return (!self.path.is_empty()).then(|| self.path.start());
        }
        loop {
            let element = self.path.get(self.command)?;
            if let Some(p) = element.vertex(self.vertex) {
                self.vertex += 1;
                return Some(p);
            }
            self.command += 1;
            self.vertex = 0;
        }
    }
}

impl FusedIterator for ControlVertices<'_> {}

/// How curve segments are sampled.
#[derive(Debug, Clone, Copy)]
pub(super) enum Sampling {
    Uniform(usize),
    Adaptive(TessellationParams),
}

impl Sampling {
    fn sample3(&self, curve: &Bezier3) -> Vec<Point3> {
        match self {
            Self::Uniform(segments) => approximate_curve(curve, *segments),
            Self::Adaptive(params) => flatten_curve(curve, params),
        }
    }

    fn sample4(&self, curve: &Bezier4) -> Vec<Point3> {
        match self {
            Self::Uniform(segments) => approximate_curve(curve, *segments),
            Self::Adaptive(params) => flatten_curve(curve, params),
        }
    }
}

/// Iterator over the sampled vertices of a [`Path`].
///
/// Created by [`Path::approximate`] and [`Path::flattening`]. Curves are
/// sampled one command at a time as the iterator advances; joint vertices
/// are yielded once.
#[derive(Debug, Clone)]
pub struct Vertices<'a> {
    path: &'a Path,
    sampling: Sampling,
    started: bool,
    command: usize,
    segment_start: Point3,
    pending: vec::IntoIter<Point3>,
}

impl<'a> Vertices<'a> {
    pub(super) fn new(path: &'a Path, sampling: Sampling) -> Self {
        Self {
            path,
            sampling,
            started: false,
            command: 0,
            segment_start: path.start(),
            pending: Vec::new().into_iter(),
        }
    }
}

impl Iterator for Vertices<'_> {
    type Item = Point3;

    fn next(&mut self) -> Option<Point3> {
        if !self.started {
            self.started = true;
            return (!self.path.is_empty()).then_some(self.segment_start);
        }
        loop {
            if let Some(p) = self.pending.next() {
                return Some(p);
            }
            let element = *self.path.get(self.command)?;
            self.command += 1;
            let start = self.segment_start;
            self.segment_start = element.end();
            let samples = match element {
                PathElement::LineTo { end } => return Some(end),
                PathElement::Curve3To { end, ctrl } => {
                    self.sampling.sample3(&Bezier3::new([start, ctrl, end]))
                }
                PathElement::Curve4To { end, ctrl1, ctrl2 } => {
                    self.sampling.sample4(&Bezier4::new([start, ctrl1, ctrl2, end]))
                }
            };
            // The first sample is the previous segment's end point.
            let mut samples = samples.into_iter();
            samples.next();
            self.pending = samples;
        }
    }
}

impl FusedIterator for Vertices<'_> {}
