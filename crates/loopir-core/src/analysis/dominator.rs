use super::cfg::ControlFlowGraph;
use crate::block::BlockId;
use std::collections::HashMap;

/// Immediate dominators of the reachable blocks, computed with the iterative
/// Cooper-Harvey-Kennedy scheme over reverse postorder. Unreachable blocks have no entry.
#[derive(Debug, Clone)]
pub struct DominatorTree {
    entry: BlockId,
    idom: HashMap<BlockId, BlockId>,
}

impl DominatorTree {
    pub fn build(cfg: &ControlFlowGraph) -> Self {
        let order = cfg.reverse_postorder();
        let rank: HashMap<BlockId, usize> =
            order.iter().enumerate().map(|(i, block)| (*block, i)).collect();

        let mut idom = HashMap::from([(cfg.entry, cfg.entry)]);
        let mut changed = true;
        while changed {
            changed = false;

            for &block in order.iter().skip(1) {
                let mut new_idom = None;
                for &pred in cfg.predecessors(block) {
                    if !idom.contains_key(&pred) {
                        continue;
                    }
                    new_idom = Some(match new_idom {
                        Some(current) => Self::intersect(&idom, &rank, pred, current),
                        None => pred,
                    });
                }

                if let Some(new_idom) = new_idom {
                    if idom.insert(block, new_idom) != Some(new_idom) {
                        changed = true;
                    }
                }
            }
        }

        Self {
            entry: cfg.entry,
            idom,
        }
    }

    fn intersect(
        idom: &HashMap<BlockId, BlockId>,
        rank: &HashMap<BlockId, usize>,
        mut a: BlockId,
        mut b: BlockId,
    ) -> BlockId {
        while a != b {
            while rank[&a] > rank[&b] {
                a = idom[&a];
            }
            while rank[&b] > rank[&a] {
                b = idom[&b];
            }
        }
        a
    }

    pub fn is_reachable(&self, block: BlockId) -> bool {
        self.idom.contains_key(&block)
    }

    pub fn idom(&self, block: BlockId) -> Option<BlockId> {
        if block == self.entry {
            return None;
        }
        self.idom.get(&block).copied()
    }

    /// Every block dominates itself. Nothing dominates an unreachable block.
    pub fn dominates(&self, dominator: BlockId, dominated: BlockId) -> bool {
        if !self.is_reachable(dominated) {
            return false;
        }

        let mut current = dominated;
        loop {
            if current == dominator {
                return true;
            }
            match self.idom(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}
