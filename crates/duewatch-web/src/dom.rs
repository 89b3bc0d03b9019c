use duewatch_shared::dashboard::THEME_TOGGLE_ID;
use duewatch_shared::theme::{
  PreferenceStore,
  ThemeStore,
  ThemeTarget
};
use duewatch_shared::{
  DashboardError,
  Notifier
};
use gloo::events::EventListener;
use web_sys::{
  Element,
  Storage
};

const THEME_ATTRIBUTE: &str =
  "data-theme";

pub fn element_by_id(
  id: &str
) -> Option<Element> {
  web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document.get_element_by_id(id)
    })
}

fn local_storage() -> Option<Storage> {
  web_sys::window().and_then(|window| {
    window
      .local_storage()
      .ok()
      .flatten()
  })
}

fn document_root() -> Option<Element> {
  web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document.document_element()
    })
}

pub struct LocalPreferences {
  storage: Option<Storage>
}

impl PreferenceStore for LocalPreferences {
  fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self
      .storage
      .as_ref()
      .and_then(|storage| {
        storage.get_item(key).ok().flatten()
      })
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) {
    if let Some(storage) = &self.storage
      && storage
        .set_item(key, value)
        .is_err()
    {
      tracing::error!(
        key,
        "failed writing theme to local storage"
      );
    }
  }
}

pub struct DocumentRoot {
  root: Option<Element>
}

impl ThemeTarget for DocumentRoot {
  fn current(&self) -> Option<String> {
    self.root.as_ref().and_then(|root| {
      root.get_attribute(THEME_ATTRIBUTE)
    })
  }

  fn apply(&mut self, value: &str) {
    if let Some(root) = &self.root
      && root
        .set_attribute(
          THEME_ATTRIBUTE,
          value
        )
        .is_err()
    {
      tracing::error!(
        value,
        "failed setting theme attribute"
      );
    }
  }
}

pub fn theme_store(
  key: &str
) -> ThemeStore<LocalPreferences, DocumentRoot>
{
  ThemeStore::new(
    key,
    LocalPreferences {
      storage: local_storage()
    },
    DocumentRoot {
      root: document_root()
    }
  )
}

/// Wires `#theme-toggle` for the lifetime
/// of the page.
pub fn bind_theme_toggle(
  key: String
) -> Result<(), DashboardError> {
  let Some(toggle) =
    element_by_id(THEME_TOGGLE_ID)
  else {
    return Err(
      DashboardError::MissingMountPoint(
        THEME_TOGGLE_ID.to_string()
      )
    );
  };

  EventListener::new(
    &toggle,
    "click",
    move |_| {
      theme_store(&key).toggle();
    }
  )
  .forget();
  Ok(())
}

pub struct AlertNotifier;

impl Notifier for AlertNotifier {
  fn notify(&mut self, message: &str) {
    gloo::dialogs::alert(message);
  }
}
