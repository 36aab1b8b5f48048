use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(PhoneId);

/// Catalogue list entry. Fields the list view does not know about are kept in `extra`
/// so a summary round-trips through the host untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneSummary {
    pub id: PhoneId,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PhoneSummary {
    pub fn new(id: impl Into<PhoneId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneDetails {
    pub id: PhoneId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// Whatever the viewer hands over with an "add" event. Forwarded to the cart as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItem(pub Value);

/// Payload of the show-phone transition: a bare id while details are still in flight,
/// the full record once they arrive.
#[derive(Debug, Clone, PartialEq)]
pub enum PhoneRef {
    Id(PhoneId),
    Full(PhoneDetails),
}

impl PhoneRef {
    pub fn id(&self) -> &PhoneId {
        match self {
            PhoneRef::Id(id) => id,
            PhoneRef::Full(details) => &details.id,
        }
    }

    pub fn details(&self) -> Option<&PhoneDetails> {
        match self {
            PhoneRef::Id(_) => None,
            PhoneRef::Full(details) => Some(details),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Catalogue,
    Viewer,
}
