//! Generic blocks carry their captured lines through untouched.

use crate::model::Block;

pub fn parse(block: &Block) -> Vec<String> {
    block.lines.clone()
}
