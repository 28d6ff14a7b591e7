//! Model metadata and the [`Model`] trait.
//!
//! Persistence lives outside this workspace; a record type describes its
//! fields through a static [`ModelMeta`] and exposes its primary key, current
//! field values, and deletion. That is everything the model form adapter
//! needs to generate fields, seed initial values, decide whether a record
//! already exists, and delegate deletion.

use freeadmin_core::AdminResult;

use crate::value::Value;

/// The storage type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFieldType {
    /// Auto-incrementing integer primary key.
    AutoField,
    /// Bounded string.
    CharField,
    /// Unbounded string.
    TextField,
    /// Integer.
    IntegerField,
    /// Boolean.
    BooleanField,
    /// Email address.
    EmailField,
}

/// Definition of one model field.
#[derive(Debug, Clone)]
pub struct ModelFieldDef {
    /// The attribute name of this field.
    pub name: &'static str,
    /// The type of this field.
    pub field_type: ModelFieldType,
    /// Whether this field is the primary key.
    pub primary_key: bool,
    /// Whether NULL is allowed in storage.
    pub null: bool,
    /// Whether the field may be left blank in forms.
    pub blank: bool,
    /// Default value for new instances.
    pub default: Option<Value>,
    /// Maximum character length.
    pub max_length: Option<usize>,
    /// Human-readable help text.
    pub help_text: String,
    /// Human-readable name for the field.
    pub verbose_name: String,
    /// Allowed values as `(value, display_label)` pairs.
    pub choices: Option<Vec<(String, String)>>,
    /// Whether the field is editable in forms.
    pub editable: bool,
}

impl ModelFieldDef {
    /// Creates a new non-null, editable field.
    pub fn new(name: &'static str, field_type: ModelFieldType) -> Self {
        Self {
            name,
            field_type,
            primary_key: false,
            null: false,
            blank: false,
            default: None,
            max_length: None,
            help_text: String::new(),
            verbose_name: name.replace('_', " "),
            choices: None,
            editable: true,
        }
    }

    /// Marks this field as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.editable = false;
        self
    }

    /// Allows NULL.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Allows blank values in forms.
    #[must_use]
    pub fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the verbose name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Restricts the field to a set of choices.
    #[must_use]
    pub fn choices<V, L>(mut self, choices: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<String>,
        L: Into<String>,
    {
        self.choices = Some(
            choices
                .into_iter()
                .map(|(v, l)| (v.into(), l.into()))
                .collect(),
        );
        self
    }

    /// Marks the field as not editable in forms.
    #[must_use]
    pub fn not_editable(mut self) -> Self {
        self.editable = false;
        self
    }
}

/// Static metadata for a model type.
#[derive(Debug, Clone)]
pub struct ModelMeta {
    /// The application label (e.g. "network", "system").
    pub app_label: &'static str,
    /// The model name in lowercase (e.g. "globalconfiguration").
    pub model_name: &'static str,
    /// The storage table name, the key used by the no-sync map.
    pub db_table: String,
    /// Human-readable singular name.
    pub verbose_name: String,
    /// Field definitions in declaration order.
    pub fields: Vec<ModelFieldDef>,
}

impl ModelMeta {
    /// Returns the definition of the named field.
    pub fn field(&self, name: &str) -> Option<&ModelFieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the primary key field, if declared.
    pub fn pk_field(&self) -> Option<&ModelFieldDef> {
        self.fields.iter().find(|f| f.primary_key)
    }
}

/// A persisted record type.
pub trait Model: Send + Sync + 'static {
    /// Returns the static metadata for this model type.
    fn meta() -> &'static ModelMeta;

    /// Returns the storage table name.
    fn table_name() -> &'static str {
        &Self::meta().db_table
    }

    /// Returns the primary key value, or `None` for a record not yet saved.
    fn pk(&self) -> Option<&Value>;

    /// Returns all field name-value pairs for this instance.
    fn field_values(&self) -> Vec<(&'static str, Value)>;

    /// Deletes the record from storage.
    ///
    /// A record that is already gone is reported as
    /// [`AdminError::DoesNotExist`](freeadmin_core::AdminError::DoesNotExist).
    fn delete(&mut self) -> AdminResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builder() {
        let f = ModelFieldDef::new("gc_hostname", ModelFieldType::CharField)
            .max_length(120)
            .blank()
            .verbose_name("Hostname");
        assert_eq!(f.max_length, Some(120));
        assert!(f.blank);
        assert!(f.editable);
        assert_eq!(f.verbose_name, "Hostname");
    }

    #[test]
    fn test_default_verbose_name() {
        let f = ModelFieldDef::new("gc_domain", ModelFieldType::CharField);
        assert_eq!(f.verbose_name, "gc domain");
    }

    #[test]
    fn test_primary_key_not_editable() {
        let f = ModelFieldDef::new("id", ModelFieldType::AutoField).primary_key();
        assert!(f.primary_key);
        assert!(!f.editable);
    }

    #[test]
    fn test_meta_lookup() {
        let meta = ModelMeta {
            app_label: "network",
            model_name: "globalconfiguration",
            db_table: "network_globalconfiguration".to_string(),
            verbose_name: "Global Configuration".to_string(),
            fields: vec![
                ModelFieldDef::new("id", ModelFieldType::AutoField).primary_key(),
                ModelFieldDef::new("gc_hostname", ModelFieldType::CharField),
            ],
        };
        assert_eq!(meta.pk_field().map(|f| f.name), Some("id"));
        assert!(meta.field("gc_hostname").is_some());
        assert!(meta.field("missing").is_none());
    }
}
