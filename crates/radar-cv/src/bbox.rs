//! Candidate blobs and per-blob match results
//!
//! Scratch values of a single frame: produced by the blob detector and the
//! template matcher, consumed by the annotator and the report writer.

use radar_core::{Circle, Rectangle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Connected mask region approximated by its minimal enclosing circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateBlob {
    pub circle: Circle,
    pub bbox: Rectangle,
}

impl CandidateBlob {
    pub fn from_circle(circle: Circle) -> Self {
        Self {
            bbox: Rectangle::around_circle(&circle),
            circle,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        self.circle.center()
    }

    pub fn radius(&self) -> f64 {
        self.circle.radius
    }
}

/// Outcome of classifying one blob against the icon catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub blob: CandidateBlob,
    /// Absent when no icon reached the match threshold.
    pub label: Option<String>,
    /// Best correlation seen for the blob, labeled or not.
    pub score: f64,
    /// Placement of the best icon inside the minimap.
    pub draw_box: Rectangle,
}

impl MatchResult {
    pub fn unmatched(blob: CandidateBlob) -> Self {
        Self {
            blob,
            label: None,
            score: 0.0,
            draw_box: blob.bbox,
        }
    }

    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }
}

/// Match results of one color class
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchCollection {
    matches: Vec<MatchResult>,
}

impl MatchCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(matches: Vec<MatchResult>) -> Self {
        Self { matches }
    }

    pub fn push(&mut self, result: MatchResult) {
        self.matches.push(result);
    }

    pub fn as_slice(&self) -> &[MatchResult] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchResult> {
        self.matches.iter()
    }

    /// Results that carry a label, in detection order.
    pub fn labeled(&self) -> impl Iterator<Item = &MatchResult> {
        self.matches.iter().filter(|m| m.is_labeled())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.labeled().filter_map(|m| m.label.as_deref()).collect()
    }

    pub fn stats(&self) -> MatchStats {
        let mut label_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_score = 0.0;
        let mut max_score: f64 = 0.0;
        let mut labeled = 0;

        for result in self.labeled() {
            if let Some(label) = &result.label {
                *label_counts.entry(label.clone()).or_insert(0) += 1;
            }
            total_score += result.score;
            max_score = if labeled == 0 {
                result.score
            } else {
                max_score.max(result.score)
            };
            labeled += 1;
        }

        MatchStats {
            total_blobs: self.matches.len(),
            labeled,
            avg_score: if labeled == 0 {
                0.0
            } else {
                total_score / labeled as f64
            },
            max_score,
            label_counts,
        }
    }
}

impl IntoIterator for MatchCollection {
    type Item = MatchResult;
    type IntoIter = std::vec::IntoIter<MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatchCollection {
    type Item = &'a MatchResult;
    type IntoIter = std::slice::Iter<'a, MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

impl FromIterator<MatchResult> for MatchCollection {
    fn from_iter<T: IntoIterator<Item = MatchResult>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// Summary of a collection's labeled matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub total_blobs: usize,
    pub labeled: usize,
    pub avg_score: f64,
    pub max_score: f64,
    pub label_counts: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(label: &str, score: f64) -> MatchResult {
        let blob = CandidateBlob::from_circle(Circle::new(50.0, 50.0, 20.0));
        MatchResult {
            label: Some(label.to_string()),
            score,
            ..MatchResult::unmatched(blob)
        }
    }

    #[test]
    fn unmatched_falls_back_to_blob_box() {
        let blob = CandidateBlob::from_circle(Circle::new(30.5, 40.9, 15.2));
        let result = MatchResult::unmatched(blob);
        assert_eq!(result.draw_box, Rectangle::new(15, 25, 30, 30));
        assert!(!result.is_labeled());
    }

    #[test]
    fn stats_count_only_labeled() {
        let blob = CandidateBlob::from_circle(Circle::new(20.0, 20.0, 14.0));
        let collection: MatchCollection = vec![
            labeled("Ashe", 0.9),
            MatchResult::unmatched(blob),
            labeled("Ashe", 0.7),
            labeled("Garen", 0.8),
        ]
        .into_iter()
        .collect();

        let stats = collection.stats();
        assert_eq!(stats.total_blobs, 4);
        assert_eq!(stats.labeled, 3);
        assert!((stats.avg_score - 0.8).abs() < 1e-9);
        assert_eq!(stats.max_score, 0.9);
        assert_eq!(stats.label_counts.get("Ashe"), Some(&2));
        assert_eq!(collection.labels(), vec!["Ashe", "Ashe", "Garen"]);
    }

    #[test]
    fn empty_stats_are_zero() {
        let stats = MatchCollection::new().stats();
        assert_eq!(stats.labeled, 0);
        assert_eq!(stats.avg_score, 0.0);
        assert_eq!(stats.max_score, 0.0);
    }
}
