//! Account and token identifiers (`shard.realm.num[-checksum]`).

use crate::error::AccountIdError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

static ENTITY_ID_REGEX: OnceLock<Regex> = OnceLock::new();

const ENTITY_ID_PATTERN: &str =
    r"^(0|(?:[1-9][0-9]*))\.(0|(?:[1-9][0-9]*))\.(0|(?:[1-9][0-9]*))(?:-([a-z]{5}))?$";

fn entity_id_regex() -> &'static Regex {
    ENTITY_ID_REGEX
        .get_or_init(|| Regex::new(ENTITY_ID_PATTERN).expect("entity id pattern compiles"))
}

/// Returns `true` when `address` is a structurally valid account id.
///
/// Purely syntactic: each component is a non-negative integer without a
/// leading zero (except `0` itself), optionally followed by a five letter
/// lowercase checksum. No existence check is made against the network.
pub fn is_valid_wallet_address(address: &str) -> bool {
    entity_id_regex().is_match(address)
}

/// A `shard.realm.num` triple with an optional checksum suffix.
///
/// The checksum is presentational only; equality, ordering and hashing use
/// the numeric components.
#[derive(Debug, Clone)]
pub struct EntityId {
    /// Shard number.
    pub shard: u64,
    /// Realm number.
    pub realm: u64,
    /// Entity number.
    pub num: u64,
    /// Optional five letter checksum.
    pub checksum: Option<String>,
}

impl EntityId {
    /// Creates an id without checksum.
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self {
            shard,
            realm,
            num,
            checksum: None,
        }
    }

    fn key(&self) -> (u64, u64, u64) {
        (self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = entity_id_regex()
            .captures(s)
            .ok_or_else(|| AccountIdError::malformed(s))?;

        let component = |index: usize| -> Result<u64, AccountIdError> {
            captures[index]
                .parse::<u64>()
                .map_err(|_| AccountIdError::OutOfRange {
                    input: s.to_string(),
                })
        };

        Ok(Self {
            shard: component(1)?,
            realm: component(2)?,
            num: component(3)?,
            checksum: captures.get(4).map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)?;
        if let Some(checksum) = &self.checksum {
            write!(f, "-{checksum}")?;
        }
        Ok(())
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for EntityId {}

impl PartialOrd for EntityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntityId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

macro_rules! entity_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(EntityId);

        impl $name {
            /// Creates an id without checksum.
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self(EntityId::new(shard, realm, num))
            }

            /// The underlying entity triple.
            pub fn entity(&self) -> &EntityId {
                &self.0
            }

            /// Rendering without the checksum suffix.
            pub fn without_checksum(&self) -> String {
                format!("{}.{}.{}", self.0.shard, self.0.realm, self.0.num)
            }
        }

        impl FromStr for $name {
            type Err = AccountIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                EntityId::from_str(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<EntityId> for $name {
            fn from(id: EntityId) -> Self {
                Self(id)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

entity_id_type!(
    /// Ledger account identifier.
    AccountId
);

entity_id_type!(
    /// Fungible token identifier.
    TokenId
);
