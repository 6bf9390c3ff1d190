use moviedex_models::{Palette, ThemeMode};
use std::sync::Arc;
use tracing::{debug, info};

use crate::events::{EventBus, StateEvent};
use crate::store::{keys, Namespace, PreferenceStore};

/// Where the initial mode came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Persisted,
    System,
    Default,
}

pub struct ThemeState {
    store: Arc<PreferenceStore>,
    events: EventBus,
    mode: ThemeMode,
    source: ThemeSource,
}

impl ThemeState {
    /// Persisted choice first, then the environment's hint, then `default`.
    pub fn resolve(
        store: Arc<PreferenceStore>,
        events: EventBus,
        system: Option<ThemeMode>,
        default: ThemeMode,
    ) -> Self {
        let (mode, source) = match store.get::<ThemeMode>(&Namespace::Global, keys::THEME_MODE) {
            Some(mode) => (mode, ThemeSource::Persisted),
            None => match system {
                Some(mode) => (mode, ThemeSource::System),
                None => (default, ThemeSource::Default),
            },
        };
        debug!("Theme resolved to {} ({:?})", mode, source);

        Self {
            store,
            events,
            mode,
            source,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn source(&self) -> ThemeSource {
        self.source
    }

    pub fn palette(&self) -> &'static Palette {
        self.mode.palette()
    }

    pub fn toggle(&mut self) -> ThemeMode {
        self.set(self.mode.toggled());
        self.mode
    }

    pub fn set(&mut self, mode: ThemeMode) {
        self.mode = mode;
        self.source = ThemeSource::Persisted;
        self.store.set(&Namespace::Global, keys::THEME_MODE, &mode);
        info!("Theme set to {}", mode);
        self.events.publish(StateEvent::ThemeChanged(mode));
    }
}

/// Terminal background hint from `COLORFGBG` ("fg;bg", bg 7 or 15 is a light background).
pub fn system_preference() -> Option<ThemeMode> {
    std::env::var("COLORFGBG").ok().as_deref().and_then(parse_colorfgbg)
}

pub fn parse_colorfgbg(value: &str) -> Option<ThemeMode> {
    let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match background {
        7 | 15 => Some(ThemeMode::Light),
        0..=15 => Some(ThemeMode::Dark),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(dir: &std::path::Path, system: Option<ThemeMode>) -> ThemeState {
        let store = Arc::new(PreferenceStore::new(dir));
        ThemeState::resolve(store, EventBus::default(), system, ThemeMode::Dark)
    }

    #[test]
    fn test_initial_mode_precedence() {
        let dir = tempfile::tempdir().unwrap();

        let theme = resolve(dir.path(), None);
        assert_eq!((theme.mode(), theme.source()), (ThemeMode::Dark, ThemeSource::Default));

        let theme = resolve(dir.path(), Some(ThemeMode::Light));
        assert_eq!((theme.mode(), theme.source()), (ThemeMode::Light, ThemeSource::System));
    }

    #[test]
    fn test_toggle_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut theme = resolve(dir.path(), Some(ThemeMode::Light));
        assert_eq!(theme.toggle(), ThemeMode::Dark);

        // The persisted choice beats the system hint on the next start.
        let reloaded = resolve(dir.path(), Some(ThemeMode::Light));
        assert_eq!(reloaded.mode(), ThemeMode::Dark);
        assert_eq!(reloaded.source(), ThemeSource::Persisted);
    }

    #[test]
    fn test_toggle_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(PreferenceStore::new(dir.path()));
        let events = EventBus::default();
        let mut rx = events.subscribe();
        let mut theme = ThemeState::resolve(store, events, None, ThemeMode::Dark);

        theme.toggle();
        assert_eq!(rx.try_recv().unwrap(), StateEvent::ThemeChanged(ThemeMode::Light));
        assert_eq!(theme.palette(), ThemeMode::Light.palette());
    }

    #[test]
    fn test_parse_colorfgbg() {
        assert_eq!(parse_colorfgbg("15;0"), Some(ThemeMode::Dark));
        assert_eq!(parse_colorfgbg("0;15"), Some(ThemeMode::Light));
        assert_eq!(parse_colorfgbg("0;default;7"), Some(ThemeMode::Light));
        assert_eq!(parse_colorfgbg("garbage"), None);
        assert_eq!(parse_colorfgbg("0;200"), None);
    }
}
