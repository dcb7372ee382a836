//! Knowledge base of the Minesweeper agent.
//!
//! Holds the cells already probed, the cells proven safe or mined, and the
//! still-unresolved sentences. `observe` ingests one probe result and runs
//! inference to a fixed point:
//! - Mark propagation: sentences whose count is 0 or equal to their size
//!   classify all their cells, and every classification simplifies every
//!   sentence
//! - Pruning: resolved sentences and duplicates are dropped
//! - Subset inference: `A ⊂ B` yields `B − A` with `B.count − A.count` mines
//!
//! The three steps alternate inside one loop until a whole round changes
//! nothing.

use crate::error::{AiError, AiResult};
use crate::sentence::Sentence;
use crate::types::{Cell, Dimensions, NeighborCache};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// What a single update taught the knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inference {
    /// Cells newly proven safe, in the order they were classified.
    pub new_safes: Vec<Cell>,
    /// Cells newly proven to be mines, in the order they were classified.
    pub new_mines: Vec<Cell>,
    /// Sentences added by subset inference.
    pub derived: usize,
    /// Fixed-point rounds executed (the last one made no change).
    pub rounds: usize,
}

impl Inference {
    pub fn progress(&self) -> bool {
        !self.new_safes.is_empty() || !self.new_mines.is_empty()
    }
}

/// Serializable copy of the knowledge base, for rendering and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeSnapshot {
    pub moves_made: Vec<Cell>,
    pub safes: Vec<Cell>,
    pub mines: Vec<Cell>,
    pub sentences: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    neighbors: Arc<NeighborCache>,
    moves_made: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    sentences: Vec<Sentence>,
}

impl KnowledgeBase {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            neighbors: Arc::new(NeighborCache::new(dimensions)),
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            sentences: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.neighbors.dimensions()
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn snapshot(&self) -> KnowledgeSnapshot {
        KnowledgeSnapshot {
            moves_made: self.moves_made.iter().copied().collect(),
            safes: self.safes.iter().copied().collect(),
            mines: self.mines.iter().copied().collect(),
            sentences: self.sentences.iter().map(ToString::to_string).collect(),
        }
    }

    /// Ingest the result of probing `cell`: `count` of its neighbours are mines.
    ///
    /// The update is atomic. It runs on a working copy that replaces `self`
    /// only once the fixed point is reached, so on error the knowledge base is
    /// unchanged.
    pub fn observe(&mut self, cell: Cell, count: usize) -> AiResult<Inference> {
        self.check_cell(cell)?;
        if self.mines.contains(&cell) {
            warn!(%cell, count, "observation for a known mine");
            return Err(AiError::observation(cell, "cell is a known mine"));
        }

        let mut next = self.clone();
        let mut report = Inference::default();

        next.moves_made.insert(cell);
        next.mark_safe(cell, &mut report)?;
        if let Some(sentence) = next.sentence_for(cell, count)? {
            trace!(%sentence, "new observation sentence");
            next.sentences.push(sentence);
        }
        next.propagate(&mut report)?;

        debug!(
            %cell,
            count,
            new_safes = report.new_safes.len(),
            new_mines = report.new_mines.len(),
            derived = report.derived,
            rounds = report.rounds,
            sentences = next.sentences.len(),
            "observation processed"
        );
        *self = next;
        Ok(report)
    }

    /// Add a constraint learned some other way than probing, e.g. a
    /// remaining-mines hint, and run inference to a fixed point.
    ///
    /// Cells already classified are folded into the sentence first.
    pub fn learn(&mut self, sentence: Sentence) -> AiResult<Inference> {
        for &cell in sentence.cells() {
            self.check_cell(cell)?;
        }

        let mut next = self.clone();
        let mut report = Inference::default();

        let mut reduced = sentence.clone();
        for &cell in sentence.cells() {
            if next.mines.contains(&cell) {
                reduced.mark_mine(cell)?;
            } else if next.safes.contains(&cell) {
                reduced.mark_safe(cell);
            }
        }
        if !reduced.is_consistent() {
            return Err(AiError::contradiction(reduced));
        }
        next.sentences.push(reduced);
        next.propagate(&mut report)?;

        *self = next;
        Ok(report)
    }

    fn check_cell(&self, cell: Cell) -> AiResult<()> {
        let dims = self.dimensions();
        if dims.contains(cell) {
            Ok(())
        } else {
            Err(AiError::InvalidCell {
                cell,
                height: dims.height,
                width: dims.width,
            })
        }
    }

    /// Sentence over the unclassified neighbours of `cell`. Known mines are
    /// dropped from the cell set and taken off the count.
    fn sentence_for(&self, cell: Cell, count: usize) -> AiResult<Option<Sentence>> {
        let mut unknown = Vec::new();
        let mut known_mines = 0usize;

        for &neighbor in self.neighbors.get(cell) {
            if self.safes.contains(&neighbor) {
                continue;
            }
            if self.mines.contains(&neighbor) {
                known_mines += 1;
                continue;
            }
            unknown.push(neighbor);
        }

        let remaining = count.checked_sub(known_mines).ok_or_else(|| {
            warn!(%cell, count, known_mines, "count below known mines");
            AiError::observation(
                cell,
                format!("count {count} is below the {known_mines} known mines around it"),
            )
        })?;
        if remaining > unknown.len() {
            warn!(%cell, count, unknown = unknown.len(), "count above unknown neighbours");
            return Err(AiError::observation(
                cell,
                format!(
                    "count {count} leaves {remaining} mines for {} unknown neighbours",
                    unknown.len()
                ),
            ));
        }

        if unknown.is_empty() {
            return Ok(None);
        }
        Ok(Some(Sentence::new(unknown, remaining)))
    }

    fn mark_mine(&mut self, cell: Cell, report: &mut Inference) -> AiResult<bool> {
        if self.safes.contains(&cell) {
            warn!(%cell, "cell proven both safe and mine");
            return Err(AiError::contradiction(format!("{cell} is known safe")));
        }
        let mut changed = self.mines.insert(cell);
        if changed {
            trace!(%cell, "mine");
            report.new_mines.push(cell);
        }
        for sentence in &mut self.sentences {
            changed |= sentence.mark_mine(cell)?;
        }
        Ok(changed)
    }

    fn mark_safe(&mut self, cell: Cell, report: &mut Inference) -> AiResult<bool> {
        if self.mines.contains(&cell) {
            warn!(%cell, "cell proven both mine and safe");
            return Err(AiError::contradiction(format!("{cell} is a known mine")));
        }
        let mut changed = self.safes.insert(cell);
        if changed {
            trace!(%cell, "safe");
            report.new_safes.push(cell);
        }
        for sentence in &mut self.sentences {
            changed |= sentence.mark_safe(cell);
        }
        Ok(changed)
    }

    /// Run all rules until a full round makes no change.
    fn propagate(&mut self, report: &mut Inference) -> AiResult<()> {
        loop {
            report.rounds += 1;
            let mut changed = self.apply_known_cells(report)?;
            changed |= self.prune()?;
            changed |= self.infer_subsets(report)?;
            if !changed {
                return Ok(());
            }
        }
    }

    /// Classify every cell some sentence pins down, until a scan finds none.
    fn apply_known_cells(&mut self, report: &mut Inference) -> AiResult<bool> {
        let mut changed = false;
        loop {
            let mut mines = BTreeSet::new();
            let mut safes = BTreeSet::new();
            for sentence in &self.sentences {
                mines.extend(sentence.known_mines());
                safes.extend(sentence.known_safes());
            }
            if mines.is_empty() && safes.is_empty() {
                return Ok(changed);
            }

            for cell in mines {
                self.mark_mine(cell, report)?;
            }
            for cell in safes {
                self.mark_safe(cell, report)?;
            }
            changed = true;
        }
    }

    /// Drop resolved sentences and keep one copy of each duplicate.
    fn prune(&mut self) -> AiResult<bool> {
        let before = self.sentences.len();
        let mut seen = HashSet::with_capacity(before);
        let mut kept = Vec::with_capacity(before);

        for sentence in self.sentences.drain(..) {
            if !sentence.is_consistent() {
                warn!(%sentence, "inconsistent sentence");
                return Err(AiError::contradiction(sentence));
            }
            if sentence.is_resolved() {
                continue;
            }
            if seen.insert(sentence.clone()) {
                kept.push(sentence);
            }
        }

        self.sentences = kept;
        Ok(self.sentences.len() != before)
    }

    /// Derive `B − A` for every pair with `A ⊂ B`, adding the ones not known yet.
    fn infer_subsets(&mut self, report: &mut Inference) -> AiResult<bool> {
        let snapshot = self.sentences.clone();
        let mut known: HashSet<Sentence> = snapshot.iter().cloned().collect();
        let mut added = 0usize;

        for subset in &snapshot {
            for superset in &snapshot {
                if let Some(derived) = superset.difference(subset)? {
                    if known.insert(derived.clone()) {
                        trace!(%derived, from = %superset, minus = %subset, "derived sentence");
                        self.sentences.push(derived);
                        added += 1;
                    }
                }
            }
        }

        report.derived += added;
        Ok(added > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    fn sentence_set(kb: &KnowledgeBase) -> BTreeSet<Sentence> {
        kb.sentences().iter().cloned().collect()
    }

    #[test]
    fn test_zero_count_marks_all_neighbors_safe() {
        let mut kb = KnowledgeBase::new(Dimensions::new(3, 3));
        let report = kb.observe(c(1, 1), 0).unwrap();

        assert_eq!(kb.safes().len(), 9);
        assert!(kb.mines().is_empty());
        assert!(kb.sentences().is_empty());
        assert_eq!(report.new_safes.len(), 9);
        assert!(kb.moves_made().contains(&c(1, 1)));
    }

    #[test]
    fn test_single_unknown_neighbor_becomes_mine() {
        // 2x2 board, mine at (0,0)
        let mut kb = KnowledgeBase::new(Dimensions::new(2, 2));
        kb.observe(c(0, 1), 1).unwrap();
        kb.observe(c(1, 0), 1).unwrap();
        assert!(kb.mines().is_empty());

        let report = kb.observe(c(1, 1), 1).unwrap();
        assert_eq!(kb.mines(), &BTreeSet::from([c(0, 0)]));
        assert!(kb.safes().contains(&c(1, 1)));
        assert_eq!(report.new_mines, vec![c(0, 0)]);
        assert!(kb.sentences().is_empty());
    }

    #[test]
    fn test_subset_inference_finds_mine() {
        let mut kb = KnowledgeBase::new(Dimensions::new(3, 3));
        let a = Sentence::new([c(0, 0), c(0, 1)], 1);
        let b = Sentence::new([c(0, 0), c(0, 1), c(0, 2)], 2);

        kb.learn(a.clone()).unwrap();
        let report = kb.learn(b).unwrap();

        assert!(report.derived >= 1);
        assert_eq!(kb.mines(), &BTreeSet::from([c(0, 2)]));
        // B collapses onto A once (0,2) is marked
        assert_eq!(kb.sentences(), &[a]);
    }

    #[test]
    fn test_subset_inference_finds_safes() {
        let mut kb = KnowledgeBase::new(Dimensions::new(3, 3));
        kb.learn(Sentence::new([c(0, 0), c(0, 1)], 1)).unwrap();
        kb.learn(Sentence::new([c(0, 0), c(0, 1), c(0, 2), c(1, 2)], 1))
            .unwrap();

        assert!(kb.safes().contains(&c(0, 2)));
        assert!(kb.safes().contains(&c(1, 2)));
        assert!(kb.mines().is_empty());
    }

    #[test]
    fn test_observe_is_idempotent() {
        let mut kb = KnowledgeBase::new(Dimensions::new(4, 4));
        kb.observe(c(0, 0), 1).unwrap();
        kb.observe(c(2, 2), 2).unwrap();

        let mines = kb.mines().clone();
        let safes = kb.safes().clone();
        let sentences = sentence_set(&kb);

        let report = kb.observe(c(2, 2), 2).unwrap();
        assert!(!report.progress());
        assert_eq!(kb.mines(), &mines);
        assert_eq!(kb.safes(), &safes);
        assert_eq!(sentence_set(&kb), sentences);
    }

    #[test]
    fn test_count_above_unknown_neighbors_rejected() {
        let mut kb = KnowledgeBase::new(Dimensions::new(3, 3));
        let err = kb.observe(c(0, 0), 4).unwrap_err();
        assert!(matches!(err, AiError::InvalidObservation { .. }));
        // Nothing recorded on failure
        assert!(kb.moves_made().is_empty());
        assert!(kb.safes().is_empty());
    }

    #[test]
    fn test_count_below_known_mines_rejected() {
        let mut kb = KnowledgeBase::new(Dimensions::new(1, 3));
        kb.observe(c(0, 0), 1).unwrap();
        assert!(kb.mines().contains(&c(0, 1)));

        let err = kb.observe(c(0, 2), 0).unwrap_err();
        assert!(matches!(err, AiError::InvalidObservation { .. }));
        assert!(!kb.moves_made().contains(&c(0, 2)));
    }

    #[test]
    fn test_observing_known_mine_rejected() {
        let mut kb = KnowledgeBase::new(Dimensions::new(1, 3));
        kb.observe(c(0, 0), 1).unwrap();
        let err = kb.observe(c(0, 1), 0).unwrap_err();
        assert!(matches!(err, AiError::InvalidObservation { .. }));
    }

    #[test]
    fn test_out_of_bounds_cell_rejected() {
        let mut kb = KnowledgeBase::new(Dimensions::new(3, 3));
        let err = kb.observe(c(3, 0), 0).unwrap_err();
        assert_eq!(
            err,
            AiError::InvalidCell {
                cell: c(3, 0),
                height: 3,
                width: 3
            }
        );
    }

    #[test]
    fn test_contradictory_constraint_leaves_state_untouched() {
        let mut kb = KnowledgeBase::new(Dimensions::new(1, 4));
        kb.learn(Sentence::new([c(0, 0), c(0, 1)], 2)).unwrap();
        let before = kb.snapshot();

        let err = kb
            .learn(Sentence::new([c(0, 0), c(0, 1), c(0, 2)], 1))
            .unwrap_err();
        assert!(matches!(err, AiError::Contradiction { .. }));
        assert_eq!(kb.snapshot(), before);
    }

    #[test]
    fn test_sentence_cells_never_classified() {
        let mut kb = KnowledgeBase::new(Dimensions::new(4, 4));
        // Mines at (0,3) and (3,0)
        kb.observe(c(0, 0), 0).unwrap();
        kb.observe(c(1, 2), 1).unwrap();
        kb.observe(c(2, 1), 1).unwrap();

        assert!(kb.safes().is_disjoint(kb.mines()));
        for sentence in kb.sentences() {
            assert!(!sentence.is_resolved());
            for cell in sentence.cells() {
                assert!(!kb.safes().contains(cell));
                assert!(!kb.mines().contains(cell));
            }
        }
    }

    #[test]
    fn test_snapshot_lists_sentences() {
        let mut kb = KnowledgeBase::new(Dimensions::new(3, 3));
        kb.observe(c(0, 0), 1).unwrap();
        let snap = kb.snapshot();
        assert_eq!(snap.moves_made, vec![c(0, 0)]);
        assert_eq!(snap.sentences, vec!["{(0, 1), (1, 0), (1, 1)} = 1".to_string()]);
    }
}
