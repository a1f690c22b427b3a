pub mod ring_node;

pub use ring_node::{Iter, RingNode};
