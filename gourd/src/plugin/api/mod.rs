pub mod chunk;
pub mod context;
pub mod events;

use async_trait::async_trait;
pub use chunk::*;
pub use context::*;
pub use events::*;

/// Struct representing metadata for a plugin.
///
/// This struct contains essential information about a plugin, including its name,
/// version, authors, and a description. It is generic over a lifetime `'s` to allow
/// for string slices that are valid for the lifetime of the plugin metadata.
#[derive(Debug, Clone)]
pub struct PluginMetadata<'s> {
    /// The name of the plugin.
    pub name: &'s str,
    /// The version of the plugin.
    pub version: &'s str,
    /// The authors of the plugin.
    pub authors: &'s str,
    /// A description of the plugin.
    pub description: &'s str,
}

/// Trait representing a plugin with asynchronous lifecycle methods.
#[async_trait]
pub trait Plugin: Send + Sync + 'static {
    /// Called when the plugin is registered. Event handlers are usually registered here.
    ///
    /// # Returns
    /// - `Ok(())` on success, or `Err(String)` on failure.
    async fn on_load(&mut self, _server: &Context) -> Result<(), String> {
        Ok(())
    }

    /// Called when the plugin is removed from the server.
    async fn on_unload(&mut self, _server: &Context) -> Result<(), String> {
        Ok(())
    }
}
