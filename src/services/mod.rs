#[cfg(target_os = "linux")]
pub mod detection;
#[cfg(target_os = "linux")]
pub mod display_session;
pub mod injector;
pub mod terminal_classifier;
#[cfg(target_os = "linux")]
pub mod window_activator;
pub mod window_resolver;

#[cfg(target_os = "linux")]
pub use detection::{detect_target, Detection};
#[cfg(target_os = "linux")]
pub use display_session::DisplaySession;
pub use injector::{Backend, KeyInjector};
#[cfg(target_os = "linux")]
pub use window_activator::WindowActivator;
