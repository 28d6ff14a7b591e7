//! Integration tests for the plugin registry.
//!
//! Tests cover: plugins mutating forms on init, events appended on delete
//! and done, form-name filtering inside plugins, and sharing one registry
//! across threads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use freeadmin_forms::fields::{FormFieldDef, FormFieldType};
use freeadmin_forms::form::{BaseForm, Form, FormKwargs};
use freeadmin_hooks::{AppPool, Events, FormPlugin, RequestContext};

/// Hides the proxy field on the network form only.
struct HideProxy;

impl FormPlugin for HideProxy {
    fn form_init(&self, form_name: &str, form: &mut BaseForm, _kwargs: &FormKwargs) {
        if form_name == "GlobalConfigurationForm" {
            let keep: Vec<String> = form
                .field_names()
                .into_iter()
                .filter(|n| *n != "gc_httpproxy")
                .map(String::from)
                .collect();
            form.remove_fields_except(&keep);
        }
    }

    fn form_delete(
        &self,
        form_name: &str,
        _form: &BaseForm,
        request: Option<&RequestContext>,
        events: &mut Events,
    ) {
        let user = request.and_then(|r| r.user.as_deref()).unwrap_or("anonymous");
        events.push(format!("deleted {form_name} by {user}"));
    }
}

struct Counter(Arc<AtomicUsize>);

impl FormPlugin for Counter {
    fn form_done(
        &self,
        _form_name: &str,
        _form: &BaseForm,
        _request: Option<&RequestContext>,
        _events: &mut Events,
    ) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn network_form() -> BaseForm {
    BaseForm::new(vec![
        FormFieldDef::new("gc_hostname", FormFieldType::char()),
        FormFieldDef::new("gc_httpproxy", FormFieldType::char()),
    ])
}

#[test]
fn test_init_hook_mutates_matching_form_only() {
    let pool = AppPool::new();
    pool.register("hide_proxy", Arc::new(HideProxy));

    let mut network = network_form();
    pool.hook_form_init("GlobalConfigurationForm", &mut network, &FormKwargs::new());
    assert_eq!(network.field_names(), vec!["gc_hostname"]);

    let mut other = network_form();
    pool.hook_form_init("SomeOtherForm", &mut other, &FormKwargs::new());
    assert_eq!(other.fields().len(), 2);
}

#[test]
fn test_delete_hook_sees_request() {
    let pool = AppPool::new();
    pool.register("hide_proxy", Arc::new(HideProxy));
    let request = RequestContext::new("POST", "/network/delete/").with_user("root");
    let mut events = Events::new();
    pool.hook_form_delete("StaticRouteForm", &network_form(), Some(&request), &mut events);
    pool.hook_form_delete("StaticRouteForm", &network_form(), None, &mut events);
    assert_eq!(
        events,
        vec![
            "deleted StaticRouteForm by root",
            "deleted StaticRouteForm by anonymous"
        ]
    );
}

#[test]
fn test_shared_registry_across_threads() {
    let count = Arc::new(AtomicUsize::new(0));
    let pool = Arc::new(AppPool::new());
    pool.register("counter", Arc::new(Counter(Arc::clone(&count))));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut events = Events::new();
                pool.hook_form_done("F", &BaseForm::new(vec![]), None, &mut events);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(count.load(Ordering::SeqCst), 4);
}

#[test]
fn test_hook_may_register_during_dispatch() {
    struct Installer(Arc<AppPool>);

    impl FormPlugin for Installer {
        fn form_init(&self, _form_name: &str, _form: &mut BaseForm, _kwargs: &FormKwargs) {
            self.0.register("late", Arc::new(HideProxy));
        }
    }

    let pool = Arc::new(AppPool::new());
    pool.register("installer", Arc::new(Installer(Arc::clone(&pool))));
    let mut form = network_form();
    pool.hook_form_init("F", &mut form, &FormKwargs::new());
    assert_eq!(pool.plugin_names(), vec!["installer", "late"]);
}
