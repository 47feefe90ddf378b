//! Domain clients: typed wrappers over the generic [`ResourceClient`](resource_actor::ResourceClient).

pub mod order_client;

pub use order_client::OrderClient;
