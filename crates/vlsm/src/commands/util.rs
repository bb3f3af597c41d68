//! Shared helpers for command handlers.

use std::path::Path;

use serde::Deserialize;

use vlsm_core::{SubnetRequirement, validate_cidr};

use crate::error::CliError;

/// Name given to the `index`-th requirement when none was supplied:
/// `Subnet A` through `Subnet Z`, then `Subnet 27`, `Subnet 28`, ...
pub fn default_name(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => format!("Subnet {}", char::from(b'A' + i)),
        _ => format!("Subnet {}", index + 1),
    }
}

/// Parse a `NAME=HOSTS` or bare `HOSTS` argument.
///
/// `index` is the requirement's position in the combined list and only
/// feeds [`default_name`].
pub fn parse_requirement(input: &str, index: usize) -> Result<SubnetRequirement, CliError> {
    let (name, hosts) = match input.rsplit_once('=') {
        Some((name, hosts)) => (name.trim(), hosts.trim()),
        None => ("", input.trim()),
    };

    let host_count: u32 = hosts.parse().map_err(|_| CliError::InvalidRequirement {
        input: input.into(),
        reason: format!("host count '{hosts}' is not a whole number"),
    })?;

    let name = if name.is_empty() {
        default_name(index)
    } else {
        name.to_owned()
    };

    Ok(SubnetRequirement::new(name, host_count))
}

/// Parse every argument, numbering auto-names from `offset`.
pub fn parse_requirements(
    inputs: &[String],
    offset: usize,
) -> Result<Vec<SubnetRequirement>, CliError> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| parse_requirement(input, offset + i))
        .collect()
}

/// One entry of a `--from-file` document. Unknown keys (like `id`) are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileRequirement {
    #[serde(default)]
    name: Option<String>,
    #[serde(alias = "hosts")]
    host_count: u32,
}

/// Read requirements from a JSON or YAML array (`.yaml` / `.yml` select YAML).
pub fn read_requirements_file(
    path: &Path,
    offset: usize,
) -> Result<Vec<SubnetRequirement>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let entries: Vec<FileRequirement> = if is_yaml {
        serde_yaml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let name = entry
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| default_name(offset + i));
            SubnetRequirement::new(name, entry.host_count)
        })
        .collect())
}

/// The two guards applied before any allocation: a parent is present and
/// well-formed, and at least one requirement exists.
pub fn check_request(parent: &str, requirements: &[SubnetRequirement]) -> Result<(), CliError> {
    if parent.trim().is_empty() {
        return Err(CliError::MissingParent);
    }
    if !validate_cidr(parent) {
        return Err(CliError::InvalidCidr {
            input: parent.into(),
        });
    }
    if requirements.is_empty() {
        return Err(CliError::NoRequirements);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_names_follow_letters_then_numbers() {
        assert_eq!(default_name(0), "Subnet A");
        assert_eq!(default_name(2), "Subnet C");
        assert_eq!(default_name(25), "Subnet Z");
        assert_eq!(default_name(26), "Subnet 27");
        assert_eq!(default_name(300), "Subnet 301");
    }

    #[test]
    fn named_requirement() {
        let req = parse_requirement("Sales=100", 0).unwrap();
        assert_eq!(req, SubnetRequirement::new("Sales", 100));
    }

    #[test]
    fn name_may_contain_equals_and_spaces() {
        let req = parse_requirement("a=b = 7", 0).unwrap();
        assert_eq!(req, SubnetRequirement::new("a=b", 7));
    }

    #[test]
    fn bare_count_gets_positional_name() {
        let req = parse_requirement("12", 1).unwrap();
        assert_eq!(req, SubnetRequirement::new("Subnet B", 12));
        let req = parse_requirement("=12", 3).unwrap();
        assert_eq!(req.name, "Subnet D");
    }

    #[test]
    fn zero_is_accepted_and_left_to_the_allocator() {
        assert_eq!(parse_requirement("spare=0", 0).unwrap().host_count, 0);
    }

    #[test]
    fn rejects_non_numeric_counts() {
        for bad in ["Sales=", "Sales=lots", "Sales=-3", "Sales=1.5", "lots"] {
            assert!(
                matches!(
                    parse_requirement(bad, 0),
                    Err(CliError::InvalidRequirement { .. })
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn offsets_continue_auto_names() {
        let reqs = parse_requirements(&["5".into(), "x=6".into(), "7".into()], 2).unwrap();
        let names: Vec<_> = reqs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Subnet C", "x", "Subnet E"]);
    }

    #[test]
    fn reads_json_file_with_extra_and_alias_keys() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"id":"k3j","name":"Sales","hostCount":100}},{{"hosts":20}},{{"name":"","hostCount":3}}]"#
        )
        .unwrap();

        let reqs = read_requirements_file(file.path(), 0).unwrap();
        assert_eq!(
            reqs,
            vec![
                SubnetRequirement::new("Sales", 100),
                SubnetRequirement::new("Subnet B", 20),
                SubnetRequirement::new("Subnet C", 3),
            ]
        );
    }

    #[test]
    fn reads_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "- name: Ops\n  hosts: 50\n- hostCount: 9").unwrap();

        let reqs = read_requirements_file(file.path(), 4).unwrap();
        assert_eq!(
            reqs,
            vec![
                SubnetRequirement::new("Ops", 50),
                SubnetRequirement::new("Subnet F", 9),
            ]
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            read_requirements_file(file.path(), 0),
            Err(CliError::Json(_))
        ));
    }

    #[test]
    fn guards_in_order() {
        let one = vec![SubnetRequirement::new("a", 1)];
        assert!(matches!(check_request("  ", &one), Err(CliError::MissingParent)));
        assert!(matches!(
            check_request("300.1.1.1/24", &one),
            Err(CliError::InvalidCidr { .. })
        ));
        assert!(matches!(
            check_request("10.0.0.0/24", &[]),
            Err(CliError::NoRequirements)
        ));
        assert!(check_request("10.0.0.0/24", &one).is_ok());
    }
}
