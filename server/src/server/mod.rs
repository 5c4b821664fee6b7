mod gui_server;
pub use gui_server::GuiServer;

mod server_config;
pub use server_config::ServerConfig;

mod lifecycle;
pub use lifecycle::ServingState;

mod inbound;
