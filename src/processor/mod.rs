//! The functional core: turn raw blocks into structured content.
pub mod function;
pub mod generic;

use crate::model::{Block, BlockKind, Content, Diagnostics};

/// Parse `block` according to its kind.
///
/// `None` means the block is dropped from the output; `diagnostics` says why.
pub fn content(block: &Block, diagnostics: &mut Diagnostics) -> Option<Content> {
    match block.kind {
        BlockKind::Function => function::parse(block, diagnostics).map(Content::Function),
        BlockKind::Generic => Some(Content::Generic(generic::parse(block))),
    }
}
