//! Sliding window of generation vs demand points.

use std::collections::VecDeque;

use serde::Serialize;

/// One chart sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// `HH:MM` label of the tick.
    pub label: String,
    /// Total generation in kW.
    pub generation: f64,
    /// Total demand in kW.
    pub demand: f64,
}

/// Bounded FIFO of chart points, oldest first.
#[derive(Debug, Clone)]
pub struct ChartWindow {
    points: VecDeque<ChartPoint>,
    capacity: usize,
}

impl ChartWindow {
    /// Creates an empty window holding at most `capacity` points.
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a point, evicting the oldest when full.
    pub fn push(&mut self, point: ChartPoint) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    /// Most recent point, if any.
    pub fn latest(&self) -> Option<&ChartPoint> {
        self.points.back()
    }

    /// The buffered points, oldest first.
    pub fn points(&self) -> &VecDeque<ChartPoint> {
        &self.points
    }
}
