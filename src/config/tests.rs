use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe { std::env::set_var(key, val) };
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe { std::env::remove_var(key) };
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe { std::env::set_var(self.key, v) },
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}

#[test]
fn resolve_config_path_prefers_brio_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("BRIO_CONFIG_PATH", "/tmp/brio-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/brio-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("brio")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("brio")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = 0.5

[ui]
header_text = "hello"
scrub_seconds = 9

[library]
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false

[insight]
enabled = false
url = "http://insight.local:9000"
timeout_secs = 3
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("BRIO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("BRIO__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 0.5);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.scrub_seconds, 9);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert!(!s.insight.enabled);
    assert_eq!(s.insight.url, "http://insight.local:9000");
    assert_eq!(s.insight.timeout_secs, 3);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[insight]
timeout_secs = 30
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("BRIO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("BRIO__INSIGHT__TIMEOUT_SECS", "5");

    let s = Settings::load().unwrap();
    assert_eq!(s.insight.timeout_secs, 5);
}

#[test]
fn settings_default_without_file_or_env() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("BRIO_CONFIG_PATH", "/nonexistent/brio-config.toml");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 1.0);
    assert!(s.insight.enabled);
    assert_eq!(s.insight.timeout_secs, 10);
}

#[test]
fn validate_rejects_out_of_range_volume_and_zero_timeout() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());

    s.audio.initial_volume = 0.5;
    s.insight.timeout_secs = 0;
    assert!(s.validate().is_err());
}
