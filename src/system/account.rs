use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{CollectError, ParseError};
use crate::metric::Metric;
use crate::parse::{rows, split_fields};
use crate::pipeline::{CommandSpec, Pipeline, Runner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    System,
    User,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::System => f.write_str("system"),
            AccountType::User => f.write_str("user"),
        }
    }
}

impl FromStr for AccountType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(AccountType::System),
            "user" => Ok(AccountType::User),
            other => Err(ParseError::UnknownLabel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "Type")]
    pub kind: AccountType,
    pub name: String,
    pub description: String,
    pub home: String,
    pub shell: String,
}

pub const PASSWD_PATH: &str = "/etc/passwd";

/// Account directory classification over [`PASSWD_PATH`].
pub fn pipeline(system_uid_max: u32) -> Pipeline {
    directory_pipeline(PASSWD_PATH, system_uid_max)
}

/// Classifies every entry of a passwd-format file by uid inside `awk`,
/// entries up to `system_uid_max` being system accounts. The free-form
/// comment field may hold `;`, which becomes `,` so rows keep five fields.
pub fn directory_pipeline(path: &str, system_uid_max: u32) -> Pipeline {
    Pipeline::of(CommandSpec::new("awk").args([
        "-F:".to_string(),
        "-v".to_string(),
        format!("max={system_uid_max}"),
        r#"{ gsub(/;/, ",", $5); if ($3<=max) print "system;"$1";"$5";"$6";"$7; else print "user;"$1";"$5";"$6";"$7; }"#
            .to_string(),
        path.to_string(),
    ]))
}

pub fn collect(runner: &dyn Runner, system_uid_max: u32) -> Result<Vec<User>, CollectError> {
    let output = runner.run(&pipeline(system_uid_max))?;
    parse(&output).map_err(|err| CollectError::parse(Metric::Passwd, err))
}

pub fn parse(output: &str) -> Result<Vec<User>, ParseError> {
    rows(output)
        .map(|line| {
            let fields = split_fields(line, 5)?;
            Ok(User {
                kind: fields[0].parse()?,
                name: fields[1].to_string(),
                description: fields[2].to_string(),
                home: fields[3].to_string(),
                shell: fields[4].to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ProcessRunner;

    #[test]
    fn entries_keep_directory_order() {
        let output = "\
system;root;root;/root;/bin/bash
system;daemon;daemon;/usr/sbin;/usr/sbin/nologin
user;alice;Alice Example,,,;/home/alice;/bin/zsh
";
        let users = parse(output).unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["root", "daemon", "alice"]);
        assert_eq!(users[0].kind, AccountType::System);
        assert_eq!(users[2].kind, AccountType::User);
        assert_eq!(users[2].description, "Alice Example,,,");
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(matches!(
            parse("admin;root;root;/root;/bin/bash"),
            Err(ParseError::UnknownLabel(ref label)) if label == "admin"
        ));
    }

    #[test]
    fn short_row_is_rejected() {
        assert!(matches!(
            parse("user;alice;/home/alice"),
            Err(ParseError::Shape { expected: 5, .. })
        ));
    }

    #[test]
    fn account_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AccountType::System).unwrap(),
            r#""system""#
        );
        assert_eq!(AccountType::User.to_string(), "user");
    }

    #[test]
    fn threshold_is_passed_to_awk() {
        let rendered = pipeline(999).to_string();
        assert!(rendered.starts_with("awk -F: -v max=999 '{ gsub"), "{rendered}");
        assert!(rendered.ends_with(" /etc/passwd"), "{rendered}");
    }

    fn classify(name: &str, contents: &str, system_uid_max: u32) -> Vec<User> {
        let dir = std::env::temp_dir().join(format!("sysdash-passwd-{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("passwd");
        std::fs::write(&path, contents).unwrap();

        let output = ProcessRunner
            .run(&directory_pipeline(path.to_str().unwrap(), system_uid_max))
            .unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        parse(&output).unwrap()
    }

    #[test]
    fn uid_at_threshold_is_a_system_account() {
        let users = classify(
            "uid-threshold",
            "\
root:x:0:0:root:/root:/bin/bash
svc:x:499:499:Service:/var/lib/svc:/usr/sbin/nologin
first:x:500:500:First User:/home/first:/bin/sh
",
            499,
        );
        let kinds: Vec<(&str, AccountType)> =
            users.iter().map(|u| (u.name.as_str(), u.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("root", AccountType::System),
                ("svc", AccountType::System),
                ("first", AccountType::User),
            ]
        );
    }

    #[test]
    fn semicolon_in_comment_field_keeps_columns_aligned() {
        let users = classify(
            "gecos",
            "bob:x:1000:1000:Bob;Room 4;ext 12:/home/bob:/bin/zsh\n",
            499,
        );
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].description, "Bob,Room 4,ext 12");
        assert_eq!(users[0].home, "/home/bob");
        assert_eq!(users[0].shell, "/bin/zsh");
    }
}
