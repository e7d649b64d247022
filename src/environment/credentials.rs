use std::collections::BTreeMap;
use std::fmt;

use super::snapshot::EnvironmentSnapshot;

/// Base name of the optional extractor credential variables.
pub const CREDENTIAL_VARIABLE: &str = "YT_EXTRACTOR_AUTH";

/// Keys every credential slot must carry.
pub const REQUIRED_CREDENTIAL_KEYS: [&str; 2] = ["access_token", "token_type"];

/// One credential variable as found in the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSlot {
    pub variable: String,
    value: String,
}

impl CredentialSlot {
    /// Parsed `key=value` pairs, or `None` when the slot is malformed.
    pub fn fields(&self) -> Option<BTreeMap<String, String>> {
        parse_credential(&self.value)
    }

    pub fn is_valid(&self) -> bool {
        self.fields().is_some()
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for CredentialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSlot")
            .field("variable", &self.variable)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// The credential slots present in one environment snapshot.
///
/// Ordered as the unindexed variable first, then `_1`, `_2`, ... by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSlotSet {
    slots: Vec<CredentialSlot>,
}

impl CredentialSlotSet {
    pub fn from_env(env: &EnvironmentSnapshot) -> Self {
        let mut indexed: Vec<(u64, CredentialSlot)> = env
            .with_prefix(CREDENTIAL_VARIABLE)
            .filter(|(_, value)| !value.is_empty())
            .filter_map(|(name, value)| {
                let index = slot_index(name)?;
                Some((
                    index,
                    CredentialSlot {
                        variable: name.to_string(),
                        value: value.to_string(),
                    },
                ))
            })
            .collect();
        indexed.sort_by_key(|(index, _)| *index);

        Self {
            slots: indexed.into_iter().map(|(_, slot)| slot).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CredentialSlot> {
        self.slots.iter()
    }

    pub fn into_valid(self) -> Vec<CredentialSlot> {
        self.slots.into_iter().filter(CredentialSlot::is_valid).collect()
    }
}

// Unindexed sorts before `_1`; anything not `<base>` or `<base>_<digits>` is ignored.
fn slot_index(name: &str) -> Option<u64> {
    let rest = name.strip_prefix(CREDENTIAL_VARIABLE)?;
    if rest.is_empty() {
        return Some(0);
    }
    let digits = rest.strip_prefix('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok().map(|n| n.saturating_add(1))
}

/// Parse a `key=value&key=value` credential.
///
/// Every pair needs a non-empty key, and the required keys need non-empty values.
pub fn parse_credential(raw: &str) -> Option<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();
    for pair in raw.split('&') {
        let (key, value) = pair.split_once('=')?;
        if key.is_empty() {
            return None;
        }
        fields.insert(key.to_string(), value.to_string());
    }

    let complete = REQUIRED_CREDENTIAL_KEYS
        .iter()
        .all(|key| fields.get(*key).is_some_and(|value| !value.is_empty()));
    complete.then_some(fields)
}
