//! # freeadmin-hooks
//!
//! Plugin registry for freeadmin. Plugins observe the lifecycle of every
//! administrative form without the forms knowing about them: a form fires
//! `form_init` after it is constructed, `form_delete` after its record is
//! deleted, and `form_done` after a successful save. Each hook receives the
//! form's class name so plugins can react to the forms they care about.
//!
//! ## Usage
//!
//! ```
//! use freeadmin_forms::form::{BaseForm, Form, FormKwargs};
//! use freeadmin_hooks::{AppPool, FormPlugin};
//! use std::sync::Arc;
//!
//! struct Branding;
//!
//! impl FormPlugin for Branding {
//!     fn form_init(&self, form_name: &str, form: &mut BaseForm, _kwargs: &FormKwargs) {
//!         if form_name == "GlobalConfigurationForm" {
//!             form.initial_mut().insert("gc_hostname".into(), "truenas".into());
//!         }
//!     }
//! }
//!
//! let pool = AppPool::new();
//! pool.register("branding", Arc::new(Branding));
//!
//! let mut form = BaseForm::new(vec![]);
//! pool.hook_form_init("GlobalConfigurationForm", &mut form, &FormKwargs::new());
//! assert!(form.initial().contains_key("gc_hostname"));
//! ```

use std::sync::{Arc, RwLock};

use freeadmin_forms::form::{BaseForm, FormKwargs};

/// Events a view emits back to the browser after a form operation
/// (e.g. `"refreshTree()"`). Hooks may append to it.
pub type Events = Vec<String>;

/// The request a delete or done hook runs under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// HTTP method (e.g. "POST").
    pub method: String,
    /// Request path.
    pub path: String,
    /// Authenticated user name, if any.
    pub user: Option<String>,
}

impl RequestContext {
    /// Creates a request context.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            user: None,
        }
    }

    /// Sets the authenticated user.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

/// A plugin observing form lifecycle events.
///
/// Every method defaults to a no-op, so a plugin implements only the hooks
/// it needs.
pub trait FormPlugin: Send + Sync {
    /// Called after a form is constructed (and pruned), before its dynamic
    /// choices are rerolled. May mutate the form.
    fn form_init(&self, form_name: &str, form: &mut BaseForm, kwargs: &FormKwargs) {
        let _ = (form_name, form, kwargs);
    }

    /// Called after the form's record has been deleted.
    fn form_delete(
        &self,
        form_name: &str,
        form: &BaseForm,
        request: Option<&RequestContext>,
        events: &mut Events,
    ) {
        let _ = (form_name, form, request, events);
    }

    /// Called when the form's save has completed.
    fn form_done(
        &self,
        form_name: &str,
        form: &BaseForm,
        request: Option<&RequestContext>,
        events: &mut Events,
    ) {
        let _ = (form_name, form, request, events);
    }
}

/// The registry of installed plugins.
///
/// Plugins are dispatched in registration order. The registry is shared
/// across request threads behind an `Arc`.
#[derive(Default)]
pub struct AppPool {
    plugins: RwLock<Vec<(String, Arc<dyn FormPlugin>)>>,
}

impl std::fmt::Debug for AppPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppPool")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}

impl AppPool {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin under `name`.
    ///
    /// If a plugin with the same name is already registered, it is replaced
    /// in place and keeps its position.
    pub fn register(&self, name: impl Into<String>, plugin: Arc<dyn FormPlugin>) {
        let name = name.into();
        let mut plugins = self.plugins.write().expect("plugin registry lock poisoned");
        if let Some(entry) = plugins.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = plugin;
        } else {
            tracing::debug!(target: "freeadmin::hooks", plugin = %name, "plugin registered");
            plugins.push((name, plugin));
        }
    }

    /// Unregisters the plugin named `name`.
    ///
    /// Returns `true` if a plugin was found and removed.
    pub fn unregister(&self, name: &str) -> bool {
        let mut plugins = self.plugins.write().expect("plugin registry lock poisoned");
        let len_before = plugins.len();
        plugins.retain(|(n, _)| n != name);
        plugins.len() < len_before
    }

    /// Returns the registered plugin names in dispatch order.
    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins
            .read()
            .expect("plugin registry lock poisoned")
            .iter()
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.read().expect("plugin registry lock poisoned").len()
    }

    /// Returns `true` if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dispatches `form_init` to every plugin.
    pub fn hook_form_init(&self, form_name: &str, form: &mut BaseForm, kwargs: &FormKwargs) {
        for plugin in self.snapshot() {
            plugin.form_init(form_name, form, kwargs);
        }
        tracing::trace!(target: "freeadmin::hooks", form = form_name, "form_init dispatched");
    }

    /// Dispatches `form_delete` to every plugin.
    pub fn hook_form_delete(
        &self,
        form_name: &str,
        form: &BaseForm,
        request: Option<&RequestContext>,
        events: &mut Events,
    ) {
        for plugin in self.snapshot() {
            plugin.form_delete(form_name, form, request, events);
        }
        tracing::trace!(target: "freeadmin::hooks", form = form_name, "form_delete dispatched");
    }

    /// Dispatches `form_done` to every plugin.
    pub fn hook_form_done(
        &self,
        form_name: &str,
        form: &BaseForm,
        request: Option<&RequestContext>,
        events: &mut Events,
    ) {
        for plugin in self.snapshot() {
            plugin.form_done(form_name, form, request, events);
        }
        tracing::trace!(target: "freeadmin::hooks", form = form_name, "form_done dispatched");
    }

    // Plugins run outside the lock so a hook may register or unregister.
    fn snapshot(&self) -> Vec<Arc<dyn FormPlugin>> {
        self.plugins
            .read()
            .expect("plugin registry lock poisoned")
            .iter()
            .map(|(_, p)| Arc::clone(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl FormPlugin for Recorder {
        fn form_init(&self, form_name: &str, _form: &mut BaseForm, _kwargs: &FormKwargs) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:init:{form_name}", self.tag));
        }

        fn form_done(
            &self,
            form_name: &str,
            _form: &BaseForm,
            _request: Option<&RequestContext>,
            events: &mut Events,
        ) {
            events.push(format!("{}:{form_name}", self.tag));
        }
    }

    struct Silent;

    impl FormPlugin for Silent {}

    fn recorder(tag: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn FormPlugin> {
        Arc::new(Recorder {
            tag,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pool = AppPool::new();
        pool.register("a", recorder("a", &log));
        pool.register("b", recorder("b", &log));
        let mut form = BaseForm::new(vec![]);
        pool.hook_form_init("F", &mut form, &FormKwargs::new());
        assert_eq!(*log.lock().unwrap(), vec!["a:init:F", "b:init:F"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pool = AppPool::new();
        pool.register("a", recorder("first", &log));
        pool.register("b", recorder("b", &log));
        pool.register("a", recorder("second", &log));
        assert_eq!(pool.plugin_names(), vec!["a", "b"]);
        let mut events = Events::new();
        pool.hook_form_done("F", &BaseForm::new(vec![]), None, &mut events);
        assert_eq!(events, vec!["second:F", "b:F"]);
    }

    #[test]
    fn test_unregister() {
        let pool = AppPool::new();
        pool.register("silent", Arc::new(Silent));
        assert_eq!(pool.len(), 1);
        assert!(pool.unregister("silent"));
        assert!(!pool.unregister("silent"));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_default_hooks_are_noops() {
        let pool = AppPool::new();
        pool.register("silent", Arc::new(Silent));
        let mut form = BaseForm::new(vec![]);
        let mut events = Events::new();
        pool.hook_form_init("F", &mut form, &FormKwargs::new());
        pool.hook_form_delete("F", &form, None, &mut events);
        pool.hook_form_done("F", &form, None, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_request_context_builder() {
        let req = RequestContext::new("POST", "/network/").with_user("root");
        assert_eq!(req.method, "POST");
        assert_eq!(req.user.as_deref(), Some("root"));
    }
}
