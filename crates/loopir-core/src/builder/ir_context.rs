use crate::{block::BlockId, values::TempId};

#[derive(Debug, Default)]
pub struct SSATracker {
    next_temp_id: u32,
}

impl SSATracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart numbering for a new function whose first `reserved` ids belong to parameters.
    pub fn reset(&mut self, reserved: u32) {
        self.next_temp_id = reserved;
    }

    pub fn new_temp(&mut self) -> TempId {
        let id = TempId(self.next_temp_id);
        self.next_temp_id += 1;
        id
    }

    pub fn next_temp_id(&self) -> u32 {
        self.next_temp_id
    }
}

/// State shared by the builders of one function under construction.
#[derive(Debug, Default)]
pub struct IRContext {
    ssa_tracker: SSATracker,
    current_function: Option<String>,
    current_block: Option<BlockId>,
}

impl IRContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current_function(&mut self, name: String) {
        self.current_function = Some(name);
    }

    pub fn current_function(&self) -> Option<&str> {
        self.current_function.as_deref()
    }

    pub fn set_current_block(&mut self, block: BlockId) {
        self.current_block = Some(block);
    }

    pub fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    pub fn ssa(&mut self) -> &mut SSATracker {
        &mut self.ssa_tracker
    }

    pub fn clear(&mut self) {
        self.ssa_tracker = SSATracker::new();
        self.current_function = None;
        self.current_block = None;
    }
}
