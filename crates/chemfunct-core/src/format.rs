//! Delimited plain-string rendering of query results.

use crate::graph::HierarchyPath;
use crate::model::Naming;

/// Separator between the elements of one path.
pub const PATH_SEPARATOR: &str = " -> ";
/// Separator between whole paths.
pub const PATHS_SEPARATOR: &str = " | ";
/// Separator between classes in a class list.
pub const CLASS_SEPARATOR: &str = "; ";

/// `Root -> Mid -> Leaf`
pub fn join_path(path: &HierarchyPath, naming: Naming) -> String {
    path.names(naming).join(PATH_SEPARATOR)
}

/// `A -> B | A -> C`
pub fn join_paths(paths: &[HierarchyPath], naming: Naming) -> String {
    paths
        .iter()
        .map(|path| join_path(path, naming))
        .collect::<Vec<_>>()
        .join(PATHS_SEPARATOR)
}

/// `Fillers; Solvents`
pub fn join_classes<S: AsRef<str>>(classes: &[S]) -> String {
    classes
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(CLASS_SEPARATOR)
}
