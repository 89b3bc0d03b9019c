use std::collections::HashMap;

pub const DEFAULT_THEME_STORAGE_KEY:
  &str = "theme";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Theme {
  Light,
  Dark
}

impl Theme {
  pub fn storage_value(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "light",
      | Self::Dark => "dark"
    }
  }

  pub fn next(self) -> Self {
    match self {
      | Self::Light => Self::Dark,
      | Self::Dark => Self::Light
    }
  }

  /// Anything other than `dark`,
  /// including no value at all, reads as
  /// the light baseline.
  pub fn from_attribute(
    raw: Option<&str>
  ) -> Self {
    match raw {
      | Some("dark") => Self::Dark,
      | _ => Self::Light
    }
  }
}

/// Key-value persistence for the
/// preference (browser local storage in
/// the web frontend).
pub trait PreferenceStore {
  fn get(&self, key: &str)
  -> Option<String>;
  fn set(&mut self, key: &str, value: &str);
}

/// Where the active theme is reflected
/// (the document root attribute in the web
/// frontend).
pub trait ThemeTarget {
  fn current(&self) -> Option<String>;
  fn apply(&mut self, value: &str);
}

pub struct ThemeStore<S, T> {
  key:    String,
  store:  S,
  target: T
}

impl<S, T> ThemeStore<S, T>
where
  S: PreferenceStore,
  T: ThemeTarget
{
  pub fn new(
    key: impl Into<String>,
    store: S,
    target: T
  ) -> Self {
    Self {
      key: key.into(),
      store,
      target
    }
  }

  pub fn toggle(&mut self) -> Theme {
    let current = Theme::from_attribute(
      self.target.current().as_deref()
    );
    let next = current.next();
    self
      .target
      .apply(next.storage_value());
    self
      .store
      .set(&self.key, next.storage_value());
    tracing::info!(
      theme = next.storage_value(),
      "toggled theme"
    );
    next
  }

  /// Applies the stored value verbatim;
  /// leaves the target untouched when
  /// nothing was stored.
  pub fn restore(
    &mut self
  ) -> Option<String> {
    let stored = self.store.get(&self.key);
    match stored.as_deref() {
      | Some(value) => {
        tracing::debug!(
          theme = value,
          "restoring saved theme"
        );
        self.target.apply(value);
      }
      | None => {
        tracing::debug!(
          "no saved theme; keeping \
           default styling"
        );
      }
    }
    stored
  }

  pub fn target(&self) -> &T {
    &self.target
  }

  pub fn into_parts(self) -> (S, T) {
    (self.store, self.target)
  }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
  values: HashMap<String, String>
}

impl PreferenceStore
  for MemoryPreferences
{
  fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.values.get(key).cloned()
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) {
    self
      .values
      .insert(key.to_string(), value.to_string());
  }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRoot {
  pub attribute: Option<String>
}

impl ThemeTarget for MemoryRoot {
  fn current(&self) -> Option<String> {
    self.attribute.clone()
  }

  fn apply(&mut self, value: &str) {
    self.attribute =
      Some(value.to_string());
  }
}

#[cfg(test)]
mod tests {
  use super::{
    DEFAULT_THEME_STORAGE_KEY,
    MemoryPreferences,
    MemoryRoot,
    PreferenceStore,
    Theme,
    ThemeStore
  };

  #[test]
  fn first_toggle_goes_dark_second_goes_light()
  {
    let mut themes = ThemeStore::new(
      DEFAULT_THEME_STORAGE_KEY,
      MemoryPreferences::default(),
      MemoryRoot::default()
    );

    assert_eq!(themes.toggle(), Theme::Dark);
    assert_eq!(
      themes.toggle(),
      Theme::Light
    );

    let (prefs, root) =
      themes.into_parts();
    assert_eq!(
      root.attribute.as_deref(),
      Some("light")
    );
    assert_eq!(
      prefs
        .get(DEFAULT_THEME_STORAGE_KEY)
        .as_deref(),
      Some("light")
    );
  }

  #[test]
  fn restore_reapplies_on_fresh_document()
  {
    let mut themes = ThemeStore::new(
      DEFAULT_THEME_STORAGE_KEY,
      MemoryPreferences::default(),
      MemoryRoot::default()
    );
    themes.toggle();
    let (prefs, _) = themes.into_parts();

    let mut reloaded = ThemeStore::new(
      DEFAULT_THEME_STORAGE_KEY,
      prefs,
      MemoryRoot::default()
    );
    reloaded.restore();
    assert_eq!(
      reloaded
        .target()
        .attribute
        .as_deref(),
      Some("dark")
    );
  }

  #[test]
  fn restore_without_preference_is_noop()
  {
    let mut themes = ThemeStore::new(
      DEFAULT_THEME_STORAGE_KEY,
      MemoryPreferences::default(),
      MemoryRoot::default()
    );
    assert_eq!(themes.restore(), None);
    assert_eq!(
      themes.target().attribute,
      None
    );
  }

  #[test]
  fn corrupted_value_is_applied_verbatim()
  {
    let mut prefs =
      MemoryPreferences::default();
    prefs.set(
      DEFAULT_THEME_STORAGE_KEY,
      "sepia"
    );
    let mut themes = ThemeStore::new(
      DEFAULT_THEME_STORAGE_KEY,
      prefs,
      MemoryRoot::default()
    );
    themes.restore();
    assert_eq!(
      themes.target().attribute.as_deref(),
      Some("sepia")
    );
    assert_eq!(themes.toggle(), Theme::Dark);
  }
}
