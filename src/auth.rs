//! Login gate for the console.  A fixed table, exact string matches, no
//! hashing: this guards a simulation demo, not real accounts.

use std::collections::HashMap;

/// The only group allowed to log in.
pub const GROUP: &str = "group9";

const BUILTIN: [(&str, &str); 5] = [
    ("Louay", "pass1"),
    ("Hamza", "pass2"),
    ("Yasir", "pass3"),
    ("Mohamed", "pass4"),
    // Blank login, kept for quick demos.
    ("", ""),
];

#[derive(Clone, Debug)]
pub struct CredentialTable {
    group: String,
    passwords: HashMap<String, String>,
}

impl Default for CredentialTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CredentialTable {
    pub fn builtin() -> Self {
        Self::new(GROUP, BUILTIN.iter().copied())
    }

    pub fn new<'a>(group: &str, users: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            group: group.to_string(),
            passwords: users
                .into_iter()
                .map(|(user, pass)| (user.to_string(), pass.to_string()))
                .collect(),
        }
    }

    pub fn validate(&self, group: &str, username: &str, password: &str) -> bool {
        group == self.group
            && self
                .passwords
                .get(username)
                .is_some_and(|expected| expected == password)
    }
}
