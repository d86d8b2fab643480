mod arena;
mod handle;
mod node;
mod tree;

pub(crate) use handle::Handle;
pub(crate) use node::Dir;
pub(crate) use tree::{Placement, RawTree};
