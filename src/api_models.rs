use colored::Colorize;
use serde::Serialize;

/// One input row: who we are looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub address: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// One output row. `url` is empty when nothing was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntity {
    #[serde(rename = "Account Name")]
    pub name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl ResolvedEntity {
    pub fn new(entity: Entity, url: String) -> Self {
        ResolvedEntity {
            name: entity.name,
            address: entity.address,
            url,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.url.is_empty()
    }

    pub fn display_line(&self) -> String {
        if self.is_found() {
            format!("{}: {}", self.name, self.url.green())
        } else {
            format!("{}: {}", self.name, "(no url)".yellow())
        }
    }
}
