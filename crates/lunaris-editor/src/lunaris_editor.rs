//! LunarisDB Editor - presentation state without a toolkit
//!
//! These models hold what the browser shows and decide how it changes in
//! response to user actions. Rendering is left to whichever front end
//! drives them.

mod error;
mod notifications;
mod results;
mod tabs;
mod tree;

pub use error::{EditorError, Result};
pub use notifications::{Notification, NotificationLevel};
pub use results::{ERROR_PLACEHOLDER, NO_RESULTS_PLACEHOLDER, ResultGrid};
pub use tabs::{EditorId, EditorTab, EditorTabs};
pub use tree::{ObjectTree, TreeEntry, TreeGroup};
