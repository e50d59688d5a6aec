use crate::normalizer::normalize_links_with_stats;
use crate::stats::NormalizeStats;
use samewindow_dom::{Document, NodeId};

/// Applies the link rule to anchors inserted after the initial scan.
///
/// Opt-in companion to [`normalize_links`](crate::normalize_links): it never
/// scans what is already in the document. While observing, the document
/// records child-list mutations; [`process`](Self::process) drains them and
/// retargets every inserted anchor plus every anchor nested inside an
/// inserted subtree.
#[derive(Debug)]
pub struct LinkObserver {
    root: NodeId,
    stats: NormalizeStats,
}

impl LinkObserver {
    /// Start recording mutations for the subtree rooted at `root`
    pub fn observe(doc: &mut Document, root: NodeId) -> Self {
        doc.start_recording();
        log::debug!("observing link insertions under {root}");
        Self {
            root,
            stats: NormalizeStats::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Running total across every [`process`](Self::process) call
    pub fn stats(&self) -> NormalizeStats {
        self.stats
    }

    /// Handle pending mutation records; returns what this batch did
    pub fn process(&mut self, doc: &mut Document) -> NormalizeStats {
        let records = doc.take_records();
        let mut inserted: Vec<NodeId> = Vec::new();

        for record in &records {
            if !doc.contains(self.root, record.target()) {
                continue;
            }
            for &added in record.added_nodes() {
                // may have been moved out or removed again since it was recorded
                if doc.element(added).is_none() || !doc.contains(self.root, added) {
                    continue;
                }
                if !inserted.contains(&added) {
                    inserted.push(added);
                }
            }
        }

        // a node inside another inserted subtree is covered by that subtree's scan
        let subtree_roots: Vec<NodeId> = inserted
            .iter()
            .copied()
            .filter(|&node| {
                !inserted
                    .iter()
                    .any(|&other| other != node && doc.contains(other, node))
            })
            .collect();

        let mut batch = NormalizeStats::default();
        for root in subtree_roots {
            batch += normalize_links_with_stats(&mut doc.subtree(root));
        }

        if !records.is_empty() {
            log::debug!(
                "processed {} mutation records: {} anchors scanned, {} rewritten",
                records.len(),
                batch.scanned,
                batch.rewritten
            );
        }
        self.stats += batch;
        batch
    }

    /// Stop observing; pending records are dropped. Returns the running total.
    pub fn disconnect(self, doc: &mut Document) -> NormalizeStats {
        doc.stop_recording();
        self.stats
    }
}
