//! # freeadmin-common
//!
//! The form adapters every freeadmin UI form is built on. They layer the
//! appliance-specific behavior over [`freeadmin_forms`]:
//!
//! - on the backup node of an HA pair, model forms over node-specific tables
//!   show only the fields that are not synchronized
//! - installed plugins are notified through [`freeadmin_hooks`] when a form
//!   is constructed, deleted, or saved
//! - dynamic choice lists are rerolled on every construction
//! - stored multiple-choice strings and cron schedule fields are normalized
//!   into the lists their widgets expect
//! - backend error attributes are mapped back to form fields
//!
//! ## Modules
//!
//! - [`model_form`] - [`ModelForm`], the adapter for forms over model records
//! - [`form`] - [`Form`], the adapter for non-model forms
//! - [`kwargs`] - Construction arguments shared by both adapters
//! - [`ha`] - Failover role lookup and [`FormServices`]
//! - [`normalize`] - Multiple-choice initial value normalization
//! - [`cron`] - The cron field evaluator used for schedule fields
//! - [`middleware`] - Mapping middleware error attributes to fields
//! - [`advanced`] - Advanced-field grouping

pub mod advanced;
pub mod cron;
pub mod form;
pub mod ha;
pub mod kwargs;
pub mod middleware;
pub mod model_form;
pub mod normalize;

pub use advanced::AdvancedFields;
pub use cron::{CronExpression, CronField};
pub use form::Form;
pub use ha::{FailoverNotifier, FailoverStatus, FormServices, StaticFailover};
pub use kwargs::AdminFormKwargs;
pub use middleware::MiddlewareErrorMap;
pub use model_form::{FormSets, FormsetCleaner, ModelForm};
pub use normalize::normalize_multichoice;
