//! Environment isolation for tests that touch `GPUPROV_*` variables.

use std::env;
use std::sync::Mutex;

/// Serializes tests that read or write environment variables.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Sets a variable and restores the previous value on drop.
///
/// ```ignore
/// let _guard = ENV_LOCK.lock().unwrap();
/// let _env = EnvVarGuard::set("GPUPROV_DATA_DIR", "/tmp/test");
/// ```
pub struct EnvVarGuard {
    key: String,
    previous: Option<String>,
}

impl EnvVarGuard {
    #[allow(unsafe_code)]
    pub fn set(key: &str, value: &str) -> Self {
        let previous = env::var(key).ok();
        unsafe {
            env::set_var(key, value);
        }
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvVarGuard {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { env::set_var(&self.key, value) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}
