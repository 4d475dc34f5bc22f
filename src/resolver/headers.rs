use crate::model::Location;

/// Decides which declarations belong to the analysed header tree.
///
/// Headers are reported relative to the root with `/` separators. Files
/// outside the root, or generated into its `codegen` subtree, have no header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderPolicy {
    root: Option<String>,
}

impl HeaderPolicy {
    pub fn new(root: Option<impl Into<String>>) -> Self {
        let root = root
            .map(Into::into)
            .map(|r| r.replace('\\', "/").trim_end_matches('/').to_string())
            .filter(|r| !r.is_empty());
        Self { root }
    }

    pub fn unrestricted() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.root.is_some()
    }

    /// Header path of a declaration relative to the root.
    pub fn header_of(&self, location: &Location) -> Option<String> {
        let root = self.root.as_deref()?;
        let file = location.file.replace('\\', "/");

        let prefix = file.get(..root.len())?;
        if !prefix.eq_ignore_ascii_case(root) {
            return None;
        }

        let relative = file[root.len()..].trim_start_matches('/');
        if relative.is_empty() || relative.starts_with("codegen") {
            None
        } else {
            Some(relative.to_string())
        }
    }

    /// With no root configured every declaration counts as defined.
    pub fn counts_as_defined(&self, header: Option<&str>) -> bool {
        header.is_some() || !self.is_configured()
    }
}
