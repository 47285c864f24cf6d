pub mod entity;
pub mod plugin;
pub mod server;
pub mod world;

pub use server::Server;

#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A server with a small simulation distance and an in-memory default world
#[cfg(test)]
pub(crate) fn test_server() -> std::sync::Arc<Server> {
    init_test_logger();
    Server::new(gourd_config::BasicConfiguration {
        simulation_distance: std::num::NonZeroU8::new(2).unwrap(),
        ..Default::default()
    })
}
