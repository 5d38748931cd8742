use crate::config::resource_type::ResourceType;
use crate::strings::{index, user_str};
use serde::Serialize;

/// Key holding the resource kind discriminator in every document item.
pub const KIND_KEY: &str = "kind";

/// Key holding the resource name.
pub const NAME_KEY: &str = "name";

/// Identity and provenance shared by every resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceFields {
    pub name: String,
    /// Source document the resource was read from.
    #[serde(skip)]
    pub file_path: String,
    /// Zero-based position within the source document.
    #[serde(skip)]
    pub index: usize,
}

/// Anything defined by a document item.
pub trait Resource: std::fmt::Debug {
    fn fields(&self) -> &ResourceFields;

    fn resource_type(&self) -> ResourceType;

    fn name(&self) -> &str {
        &self.fields().name
    }

    fn file_path(&self) -> &str {
        &self.fields().file_path
    }

    fn index(&self) -> usize {
        self.fields().index
    }
}

/// Breadcrumbs locating a document item, outermost first.
///
/// The file path comes first when known, followed by the resource label:
/// `api "iris" at index 2`, or `api at index 2` when the name is unknown.
pub fn identify(
    file_path: &str,
    resource_type: ResourceType,
    name: &str,
    i: usize,
) -> Vec<String> {
    let label = match resource_type {
        ResourceType::Unknown => "resource",
        other => other.as_str(),
    };

    let resource = if name.is_empty() {
        format!("{} at {}", label, index(i))
    } else {
        format!("{} {} at {}", label, user_str(name), index(i))
    };

    let mut crumbs = Vec::with_capacity(2);
    if !file_path.is_empty() {
        crumbs.push(file_path.to_string());
    }
    crumbs.push(resource);
    crumbs
}

/// [`identify`] for an already-built resource.
pub fn identify_resource(resource: &dyn Resource) -> Vec<String> {
    identify(
        resource.file_path(),
        resource.resource_type(),
        resource.name(),
        resource.index(),
    )
}
