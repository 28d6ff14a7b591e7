//! End-to-end test through the meta-crate: settings loaded from TOML drive
//! backup-node pruning of a model form, and a plugin sees the result.

use std::sync::{Arc, LazyLock, Mutex};

use freeadmin::core::settings_loader::from_toml_str;
use freeadmin::prelude::*;

static META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    app_label: "network",
    model_name: "globalconfiguration",
    db_table: "network_globalconfiguration".to_string(),
    verbose_name: "global configuration".to_string(),
    fields: vec![
        ModelFieldDef::new("id", ModelFieldType::AutoField).primary_key(),
        ModelFieldDef::new("gc_hostname", ModelFieldType::CharField).max_length(120),
        ModelFieldDef::new("gc_domain", ModelFieldType::CharField).max_length(120),
    ],
});

struct Network(Value);

impl Model for Network {
    fn meta() -> &'static ModelMeta {
        &META
    }

    fn pk(&self) -> Option<&Value> {
        Some(&self.0)
    }

    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![("gc_hostname", "nas".into()), ("gc_domain", "local".into())]
    }

    fn delete(&mut self) -> AdminResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct Seen(Mutex<Vec<String>>);

impl FormPlugin for Seen {
    fn form_init(&self, form_name: &str, form: &mut BaseForm, _kwargs: &FormKwargs) {
        self.0
            .lock()
            .unwrap()
            .push(format!("{form_name}:{}", form.field_names().join(",")));
    }
}

#[test]
fn test_settings_drive_backup_pruning() {
    let settings = from_toml_str(
        r#"
            [no_sync_map.network_globalconfiguration]
            fields = ["gc_hostname"]
        "#,
    )
    .unwrap();

    let seen = Arc::new(Seen::default());
    let hooks = Arc::new(AppPool::new());
    hooks.register("seen", seen.clone());
    let services = FormServices::new(hooks, Arc::new(settings.no_sync_map)).with_notifier(
        Arc::new(freeadmin::common::StaticFailover(Some(FailoverStatus::Backup))),
    );

    let form = ModelForm::new(
        "GlobalConfigurationForm",
        &ModelFormConfig::new(&META),
        Network(Value::Int(1)),
        AdminFormKwargs::new(),
        &services,
    );

    assert_eq!(form.base().field_names(), vec!["gc_hostname"]);
    assert_eq!(
        *seen.0.lock().unwrap(),
        vec!["GlobalConfigurationForm:gc_hostname".to_string()]
    );
}
