use crate::error::CanvasError;
use crate::ops::DrawOperation;
use figura_types::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a content pass relates to what is already visible on the page.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PassMode {
    /// Replace the visible canvas. Only allowed before any append pass.
    Overwrite,
    /// Layer on top of earlier passes.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassId(u32);

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Proof that a pass was begun. Consumed by [`LayerCompositor::end_pass`].
#[derive(Debug, PartialEq, Eq)]
pub struct PassHandle {
    id: PassId,
    mode: PassMode,
}

impl PassHandle {
    pub fn id(&self) -> PassId {
        self.id
    }

    pub fn mode(&self) -> PassMode {
        self.mode
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentPass {
    pub mode: PassMode,
    pub operations: Vec<DrawOperation>,
}

impl ContentPass {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub size: Size,
    pub passes: Vec<ContentPass>,
}

impl Page {
    pub fn operation_count(&self) -> usize {
        self.passes.iter().map(ContentPass::len).sum()
    }
}

/// Sequences content passes onto one page.
///
/// One pass is open at a time. Operations emitted into it keep their order,
/// and ended passes are stacked in the order they were ended.
#[derive(Debug, Default)]
pub struct LayerCompositor {
    next_id: u32,
    open: Option<(PassId, ContentPass)>,
    seen_append: bool,
    finished: Vec<ContentPass>,
}

impl LayerCompositor {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn begin_pass(&mut self, mode: PassMode) -> Result<PassHandle, CanvasError> {
        if let Some((open_id, _)) = &self.open {
            return Err(CanvasError::PassAlreadyOpen(*open_id));
        }
        match mode {
            PassMode::Overwrite if self.seen_append => return Err(CanvasError::InvalidPassOrder),
            PassMode::Overwrite => {}
            PassMode::Append => self.seen_append = true,
        }

        let id = PassId(self.next_id);
        self.next_id += 1;
        self.open = Some((
            id,
            ContentPass {
                mode,
                operations: Vec::new(),
            },
        ));
        log::debug!("Began {:?} pass {}", mode, id);
        Ok(PassHandle { id, mode })
    }

    /// Appends `operation` to the open pass. Invalid geometry is rejected here,
    /// before anything reaches a page.
    pub fn emit(&mut self, handle: &PassHandle, operation: DrawOperation) -> Result<(), CanvasError> {
        operation.validate()?;
        match &mut self.open {
            Some((id, pass)) if *id == handle.id => {
                pass.operations.push(operation);
                Ok(())
            }
            _ => Err(CanvasError::PassNotOpen(handle.id)),
        }
    }

    pub fn end_pass(&mut self, handle: PassHandle) -> Result<ContentPass, CanvasError> {
        match self.open.take() {
            Some((id, pass)) if id == handle.id => {
                log::debug!("Ended pass {} with {} operation(s)", id, pass.len());
                self.finished.push(pass.clone());
                Ok(pass)
            }
            other => {
                self.open = other;
                Err(CanvasError::PassNotOpen(handle.id))
            }
        }
    }

    pub fn passes(&self) -> &[ContentPass] {
        &self.finished
    }

    /// Assembles the page from every ended pass. A pass still open is dropped.
    pub fn finish(self, size: Size) -> Page {
        if let Some((id, pass)) = &self.open {
            log::warn!("Discarding pass {} that was never ended ({} operation(s))", id, pass.len());
        }
        Page {
            size,
            passes: self.finished,
        }
    }
}
