// SearchLink HTTP adapter
// Implements core::port::Transport with reqwest

pub mod reqwest_transport;

pub use reqwest_transport::{HttpConfig, ReqwestTransport, DEFAULT_REQUEST_TIMEOUT};
