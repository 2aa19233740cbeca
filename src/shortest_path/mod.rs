//! Priority-queue Dijkstra over the directed multi-distance graph (§4.F).

pub mod dijkstra;

pub use dijkstra::{run, Mode, SearchResult};
