//! C2: the partition-refinement engine backing Hopcroft minimization (C3)
//! and the stack-symbol/state-equivalence refinements used by the pushdown
//! bridge (C8) and Turing conversions (C10).
//!
//! Blocks are stored in a `BTreeMap` keyed by a monotonically increasing
//! [`BlockId`] (our self-balancing search tree), with a companion
//! `BTreeMap<StateId, BlockId>` for `O(log n)` membership lookup.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::ids::StateId;

/// Stable identity of a partition block. Identity survives as long as the
/// block is not itself split; a split yields fresh identities for both
/// sides unless one side is empty, in which case the surviving side keeps
/// the original identity (§4.1 Hopcroft driver).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(u64);

/// Result of [`Partition::split`]. At most one side is `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitResult {
    pub in_block: Option<BlockId>,
    pub out_block: Option<BlockId>,
}

impl SplitResult {
    /// `true` when the block was genuinely divided into two fresh blocks,
    /// as opposed to surviving unchanged under its original identity.
    pub fn did_split(&self) -> bool {
        self.in_block.is_some() && self.out_block.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Partition {
    blocks: std::collections::BTreeMap<BlockId, BTreeSet<StateId>>,
    owner: std::collections::BTreeMap<StateId, BlockId>,
    next_id: u64,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    /// `O(|block|·log n)`. Precondition: `block` is disjoint from every
    /// block already present; violation is a [`Error::PartitionContract`]
    /// bug, not a recoverable caller error.
    pub fn insert(&mut self, block: BTreeSet<StateId>) -> Result<BlockId> {
        if block.is_empty() {
            return Err(Error::PartitionContract {
                detail: "insert of an empty block".into(),
            });
        }
        for q in &block {
            if self.owner.contains_key(q) {
                return Err(Error::PartitionContract {
                    detail: format!("state {q:?} already belongs to a block"),
                });
            }
        }
        let id = self.fresh_id();
        for &q in &block {
            self.owner.insert(q, id);
        }
        self.blocks.insert(id, block);
        Ok(id)
    }

    /// `O(log n)`.
    pub fn find(&self, q: StateId) -> Option<BlockId> {
        self.owner.get(&q).copied()
    }

    pub fn block(&self, id: BlockId) -> Option<&BTreeSet<StateId>> {
        self.blocks.get(&id)
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.keys().copied()
    }

    /// `O((|block| + |splitter|)·log n)`. Partitions `block` into the
    /// elements present in `splitter` and the elements absent from it.
    pub fn split(&mut self, block: BlockId, splitter: &BTreeSet<StateId>) -> Result<SplitResult> {
        let members = self.blocks.remove(&block).ok_or_else(|| Error::PartitionContract {
            detail: format!("split of unknown block {block:?}"),
        })?;
        for &q in &members {
            self.owner.remove(&q);
        }
        let (in_set, out_set): (BTreeSet<StateId>, BTreeSet<StateId>) =
            members.iter().partition(|q| splitter.contains(q));

        let result = match (in_set.is_empty(), out_set.is_empty()) {
            (true, true) => unreachable!("block was non-empty before partitioning"),
            (false, true) => {
                // Nothing moved out: the block survives under its original id.
                for &q in &in_set {
                    self.owner.insert(q, block);
                }
                self.blocks.insert(block, in_set);
                SplitResult { in_block: Some(block), out_block: None }
            }
            (true, false) => {
                for &q in &out_set {
                    self.owner.insert(q, block);
                }
                self.blocks.insert(block, out_set);
                SplitResult { in_block: None, out_block: Some(block) }
            }
            (false, false) => {
                let in_id = self.fresh_id();
                let out_id = self.fresh_id();
                for &q in &in_set {
                    self.owner.insert(q, in_id);
                }
                for &q in &out_set {
                    self.owner.insert(q, out_id);
                }
                self.blocks.insert(in_id, in_set);
                self.blocks.insert(out_id, out_set);
                SplitResult { in_block: Some(in_id), out_block: Some(out_id) }
            }
        };
        Ok(result)
    }

    /// `O(|block|)`.
    pub fn remove(&mut self, block: BlockId) -> Result<()> {
        let members = self.blocks.remove(&block).ok_or_else(|| Error::PartitionContract {
            detail: format!("remove of unknown block {block:?}"),
        })?;
        for q in members {
            self.owner.remove(&q);
        }
        Ok(())
    }

    /// Snapshot of all blocks, smallest block first — callers that need to
    /// push "the smaller side of a split" onto a worklist use this.
    pub fn blocks_by_size(&self) -> Vec<BlockId> {
        let mut ids: Vec<BlockId> = self.blocks.keys().copied().collect();
        ids.sort_by_key(|id| self.blocks[id].len());
        ids
    }
}
