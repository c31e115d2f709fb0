//! Host environment probe.
//!
//! Declarations made before the resource environment exists (for example
//! while rendering on a server) are queued straight into the registry instead
//! of waiting for a mount. The probe tells scopes which situation they are in.

/// Reports whether the live resource environment is available.
pub trait EnvironmentProbe {
    fn is_available(&self) -> bool;
}

/// Environment that never becomes available, used for server rendering.
#[derive(Clone, Copy, Debug, Default)]
pub struct Server;

impl EnvironmentProbe for Server {
    fn is_available(&self) -> bool {
        false
    }
}

/// Environment that is always available.
#[derive(Clone, Copy, Debug, Default)]
pub struct Client;

impl EnvironmentProbe for Client {
    fn is_available(&self) -> bool {
        true
    }
}

impl<F> EnvironmentProbe for F
where
    F: Fn() -> bool,
{
    fn is_available(&self) -> bool {
        self()
    }
}
