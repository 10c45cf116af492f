use crate::block::BlockId;
use crate::function::FunctionBody;
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    pub edges: HashMap<BlockId, Vec<BlockId>>,
    pub reverse_edges: HashMap<BlockId, Vec<BlockId>>,
    pub entry: BlockId,
}

impl ControlFlowGraph {
    pub fn from_function(body: &FunctionBody) -> Self {
        let mut edges = HashMap::new();
        let mut reverse_edges: HashMap<BlockId, Vec<BlockId>> = HashMap::new();

        for (block_id, block) in &body.blocks {
            let successors = block.terminator.successors();
            for succ in &successors {
                reverse_edges.entry(*succ).or_default().push(*block_id);
            }
            edges.insert(*block_id, successors);
        }

        Self {
            edges,
            reverse_edges,
            entry: body.entry_block,
        }
    }

    pub fn predecessors(&self, block: BlockId) -> &[BlockId] {
        self.reverse_edges
            .get(&block)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn successors(&self, block: BlockId) -> &[BlockId] {
        self.edges.get(&block).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn is_reachable(&self, block: BlockId) -> bool {
        self.reachable_blocks().contains(&block)
    }

    pub fn reachable_blocks(&self) -> HashSet<BlockId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(self.entry);

        while let Some(current) = queue.pop_front() {
            if visited.insert(current) {
                for &succ in self.successors(current) {
                    queue.push_back(succ);
                }
            }
        }

        visited
    }

    /// Edges whose target was already visited on the current DFS path from the entry.
    pub fn back_edges(&self) -> Vec<(BlockId, BlockId)> {
        self.depth_first().1
    }

    /// Reachable blocks, each after all of its non-back-edge predecessors.
    pub fn reverse_postorder(&self) -> Vec<BlockId> {
        let mut order = self.depth_first().0;
        order.reverse();
        order
    }

    /// Walks the graph from the entry with an explicit stack. Returns the postorder and the back
    /// edges in discovery order.
    fn depth_first(&self) -> (Vec<BlockId>, Vec<(BlockId, BlockId)>) {
        let mut postorder = Vec::new();
        let mut back_edges = Vec::new();
        let mut visited = HashSet::from([self.entry]);
        let mut on_path = HashSet::from([self.entry]);
        let mut stack = vec![(self.entry, 0usize)];

        while let Some((block, next)) = stack.last_mut() {
            let block = *block;
            match self.successors(block).get(*next).copied() {
                Some(succ) => {
                    *next += 1;
                    if on_path.contains(&succ) {
                        back_edges.push((block, succ));
                    } else if visited.insert(succ) {
                        on_path.insert(succ);
                        stack.push((succ, 0));
                    }
                }
                None => {
                    on_path.remove(&block);
                    postorder.push(block);
                    stack.pop();
                }
            }
        }

        (postorder, back_edges)
    }
}
