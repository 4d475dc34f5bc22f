use crate::model::Location;
use crate::validation::Diagnostic;

/// Consecutive diagnostics sharing one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticGroup<'a> {
    pub location: Option<&'a Location>,
    pub messages: Vec<&'a str>,
}

/// Group runs of diagnostics with an identical location, keeping discovery
/// order. Equal locations that are not adjacent start a new group.
pub fn group_by_location(diagnostics: &[Diagnostic]) -> Vec<DiagnosticGroup<'_>> {
    let mut groups: Vec<DiagnosticGroup<'_>> = Vec::new();
    for diagnostic in diagnostics {
        let location = diagnostic.location.as_ref();
        let starts_new_group = groups.last().is_none_or(|g| g.location != location);
        if starts_new_group {
            groups.push(DiagnosticGroup {
                location,
                messages: Vec::new(),
            });
        }
        if let Some(group) = groups.last_mut() {
            group.messages.push(&diagnostic.message);
        }
    }
    groups
}

/// `file:line:column: `, or nothing for a diagnostic without a location.
pub fn location_prefix(location: Option<&Location>) -> String {
    location
        .map(|loc| format!("{}:{}:{}: ", loc.file, loc.line, loc.column))
        .unwrap_or_default()
}

/// Write the "Composing" line followed by the grouped diagnostics.
pub fn log_composition(entity: &str, label: &str, diagnostics: &[Diagnostic]) {
    log::info!("Composing {} as {}", entity, label);
    for group in group_by_location(diagnostics) {
        let prefix = location_prefix(group.location);
        for message in group.messages {
            log::info!("  {}{}", prefix, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(message: &str, line: u32) -> Diagnostic {
        Diagnostic::new(message, Some(Location::new("a.h", line, 1)))
    }

    #[test]
    fn test_groups_only_adjacent_locations() {
        let diagnostics = vec![at("one", 1), at("two", 1), at("three", 2), at("four", 1)];
        let groups = group_by_location(&diagnostics);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].messages, vec!["one", "two"]);
        assert_eq!(groups[1].messages, vec!["three"]);
        assert_eq!(groups[2].messages, vec!["four"]);
    }

    #[test]
    fn test_missing_locations_group_together() {
        let diagnostics = vec![Diagnostic::new("x", None), Diagnostic::new("y", None)];
        let groups = group_by_location(&diagnostics);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].location, None);
    }

    #[test]
    fn test_location_prefix() {
        let location = Location::new("include/a.h", 4, 2);
        assert_eq!(location_prefix(Some(&location)), "include/a.h:4:2: ");
        assert_eq!(location_prefix(None), "");
    }
}
