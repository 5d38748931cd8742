use crate::config::resource::Resource;
use crate::errors::{ConfigResult, ErrorKind};
use std::collections::{BTreeMap, BTreeSet};

/// The first group of resources sharing a name, by name order.
pub fn find_duplicate_resource_name<'a>(resources: &[&'a dyn Resource]) -> Vec<&'a dyn Resource> {
    let mut by_name: BTreeMap<&str, Vec<&'a dyn Resource>> = BTreeMap::new();
    for resource in resources {
        by_name.entry(resource.name()).or_default().push(*resource);
    }

    by_name
        .into_values()
        .find(|group| group.len() > 1)
        .unwrap_or_default()
}

/// Build the error for one group of same-named resources.
///
/// Types and file paths are deduplicated and sorted. Resources that were not
/// read from a file contribute no path.
pub fn duplicate_resource_name_error(duplicates: &[&dyn Resource]) -> ErrorKind {
    let name = duplicates
        .first()
        .map(|r| r.name().to_string())
        .unwrap_or_default();

    let resource_types: BTreeSet<&str> = duplicates
        .iter()
        .map(|r| r.resource_type().plural())
        .collect();

    let file_paths: BTreeSet<&str> = duplicates
        .iter()
        .map(|r| r.file_path())
        .filter(|p| !p.is_empty())
        .collect();

    ErrorKind::DuplicateResourceName {
        name,
        resource_types: resource_types.into_iter().map(String::from).collect(),
        file_paths: file_paths.into_iter().map(String::from).collect(),
    }
}

/// Fail on the first name shared by two or more resources.
pub fn check_unique_names(resources: &[&dyn Resource]) -> ConfigResult<()> {
    let duplicates = find_duplicate_resource_name(resources);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(duplicate_resource_name_error(&duplicates).into())
    }
}
