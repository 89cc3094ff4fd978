//! Body and heading font size analysis.

use indexmap::IndexMap;

use crate::model::{size_key, TextLine};

/// Font statistics for heading detection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontStatistics {
    /// Body text font size (most common)
    pub body_size: f32,
    /// Sizes strictly larger than body, largest first
    pub heading_sizes: Vec<f32>,
    /// Line count per size (0.1pt key), in first-seen order
    pub size_histogram: IndexMap<i32, usize>,
}

impl FontStatistics {
    /// Analyze the cleaned line sequence.
    ///
    /// With no lines the body size is `default_body_size` and there are no
    /// heading sizes. Ties for the most common size go to the size seen first.
    pub fn analyze(lines: &[TextLine], default_body_size: f32) -> Self {
        let mut stats = Self {
            body_size: default_body_size,
            ..Self::default()
        };
        for line in lines {
            stats.add_size(line.font_size);
        }

        let mut best: Option<(i32, usize)> = None;
        for (&key, &count) in &stats.size_histogram {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((key, count));
            }
        }

        if let Some((body_key, _)) = best {
            stats.body_size = body_key as f32 / 10.0;
            stats.heading_sizes = stats.sizes_above(body_key);
        }

        stats
    }

    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        *self.size_histogram.entry(size_key(size)).or_insert(0) += 1;
    }

    /// Distinct sizes above a key, largest first.
    fn sizes_above(&self, key: i32) -> Vec<f32> {
        let mut keys: Vec<i32> = self
            .size_histogram
            .keys()
            .copied()
            .filter(|k| *k > key)
            .collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys.into_iter().map(|k| k as f32 / 10.0).collect()
    }

    /// Whether at least one heading size was found.
    pub fn has_heading_sizes(&self) -> bool {
        !self.heading_sizes.is_empty()
    }

    /// Fall back to "smallest size is body" when no size exceeds the body size.
    ///
    /// Leaves the statistics untouched when the document has a single size.
    pub fn apply_fallback(&mut self) {
        if self.has_heading_sizes() || self.size_histogram.len() < 2 {
            return;
        }

        log::warn!("Could not identify any heading styles. Falling back to basic size check.");

        if let Some(&smallest) = self.size_histogram.keys().min() {
            self.body_size = smallest as f32 / 10.0;
            self.heading_sizes = self.sizes_above(smallest);
        }
    }

    /// Zero-based rank of a size among the heading sizes.
    pub fn heading_rank(&self, font_size: f32) -> Option<usize> {
        let key = size_key(font_size);
        self.heading_sizes.iter().position(|s| size_key(*s) == key)
    }

    /// Whether a size is strictly larger than the body size.
    pub fn is_above_body(&self, font_size: f32) -> bool {
        size_key(font_size) > size_key(self.body_size)
    }
}
