//! Template rendering.
//!
//! Templates use Jinja syntax and are loaded lazily from the configured
//! template directory. Every render receives a `pages` variable holding
//! the sorted route listing.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use minijinja::Environment;

use crate::error::FacadeError;

/// Key under which the route listing is injected into template bindings.
pub const PAGES_KEY: &str = "pages";

/// Template variables passed to [`Templates::render`].
pub type Bindings = BTreeMap<String, serde_json::Value>;

/// Shared template environment rooted at a directory.
#[derive(Debug, Clone)]
pub struct Templates {
    env: Arc<Environment<'static>>,
}

impl Templates {
    /// Creates an environment that loads templates from `dir`.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir));
        Self { env: Arc::new(env) }
    }

    /// Renders `name` with `bindings`.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Template`] if the template cannot be found,
    /// fails to parse, or fails to render.
    pub fn render(&self, name: &str, bindings: &Bindings) -> Result<String, FacadeError> {
        let template = self.env.get_template(name)?;
        Ok(template.render(bindings)?)
    }
}

/// Inserts `pages` into `bindings`, replacing any previous value.
pub fn inject_pages(bindings: &mut Bindings, pages: &[String]) {
    let listing = pages
        .iter()
        .map(|p| serde_json::Value::String(p.clone()))
        .collect();
    bindings.insert(PAGES_KEY.to_string(), serde_json::Value::Array(listing));
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn write_template(dir: &Path, name: &str, body: &str) {
        if let Err(e) = std::fs::write(dir.join(name), body) {
            panic!("failed to write template: {e}");
        }
    }

    #[test]
    fn renders_from_directory() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        write_template(dir.path(), "hi.txt", "hi {{ who }}");
        let templates = Templates::from_dir(dir.path());

        let mut bindings = Bindings::new();
        bindings.insert("who".to_string(), serde_json::json!("there"));
        let out = templates.render("hi.txt", &bindings);
        let Ok(out) = out else {
            panic!("render failed");
        };
        assert_eq!(out, "hi there");
    }

    #[test]
    fn missing_template_is_an_error() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let templates = Templates::from_dir(dir.path());
        let result = templates.render("absent.html", &Bindings::new());
        assert!(matches!(result, Err(FacadeError::Template(_))));
    }

    #[test]
    fn inject_pages_overwrites_key() {
        let mut bindings = Bindings::new();
        bindings.insert(PAGES_KEY.to_string(), serde_json::json!("stale"));
        inject_pages(&mut bindings, &["/".to_string(), "/a".to_string()]);
        assert_eq!(bindings.get(PAGES_KEY), Some(&serde_json::json!(["/", "/a"])));
    }
}
