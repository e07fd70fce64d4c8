//! Access policy for submissions.
//!
//! Reads are always public. Submissions are open to any caller unless the
//! registry is configured with an allow-list.

use serde::{Deserialize, Serialize};

use clairo_core::Submitter;

/// Who may submit proofs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AccessPolicy {
    /// Any caller may submit.
    #[default]
    Open,
    /// Only the listed callers may submit.
    AllowList {
        #[serde(with = "submitter_hex")]
        callers: Vec<Submitter>,
    },
}

impl AccessPolicy {
    pub fn allow_list(callers: impl IntoIterator<Item = Submitter>) -> Self {
        AccessPolicy::AllowList {
            callers: callers.into_iter().collect(),
        }
    }

    /// Whether `caller` may submit.
    pub fn permits(&self, caller: &Submitter) -> bool {
        match self {
            AccessPolicy::Open => true,
            AccessPolicy::AllowList { callers } => callers.contains(caller),
        }
    }
}

/// Submitters as `0x`-prefixed hex strings, so config files stay readable.
mod submitter_hex {
    use clairo_core::Submitter;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(callers: &[Submitter], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(callers.iter().map(|c| c.to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Submitter>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|s| {
                Submitter::from_hex(s)
                    .map_err(|e| D::Error::custom(format!("invalid caller {s:?}: {e}")))
            })
            .collect()
    }
}
