use std::collections::BTreeMap;

use serde::Serialize;

use crate::{IdToken, Persona, PersonaName, TrustList};

/// The client's copy of one list, as of its last successful fetch
///
/// Always built whole from a fetched sequence, never patched. The sequence
/// keeps the server's sort order, the index maps names to their entry (a
/// repeated name resolves to its last occurrence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterSnapshot {
    list: TrustList,
    personas: Vec<Persona>,
    #[serde(skip)]
    by_name: BTreeMap<PersonaName, usize>,
}

impl RosterSnapshot {
    pub fn empty(list: TrustList) -> Self {
        Self {
            list,
            personas: vec![],
            by_name: BTreeMap::new(),
        }
    }

    pub fn from_fetched(list: TrustList, personas: Vec<Persona>) -> Self {
        let by_name = personas
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        Self {
            list,
            personas,
            by_name,
        }
    }

    pub fn list(&self) -> TrustList {
        self.list
    }

    pub fn get(&self, name: &PersonaName) -> Option<&Persona> {
        self.by_name.get(name).map(|&i| &self.personas[i])
    }

    pub fn contains(&self, name: &PersonaName) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn contains_token(&self, token: &IdToken) -> bool {
        self.personas.iter().any(|p| &p.token == token)
    }

    /// Entries in the order the server returned them
    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    /// Distinct names
    pub fn names(&self) -> impl Iterator<Item = &PersonaName> {
        self.by_name.keys()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
