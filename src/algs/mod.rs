//! Halo algorithms: peeling, matching, link building, interface ids,
//! hidden-ghost marking, and the exchange orchestration, plus the transport
//! abstraction and wire codec they run over.

pub mod communicator;
pub mod exchange;
pub mod hidden;
pub mod interface;
pub mod link;
pub mod matching;
pub mod peel;
pub mod wire;
