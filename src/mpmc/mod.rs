pub mod ring_queue;

pub use ring_queue::RingQueue;
