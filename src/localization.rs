//! Localized strings: keys, string tables and the lookups the window uses to resolve them.

use std::{fmt, task::Poll};

use bevy::{
    asset::{io::Reader, AssetLoader, AsyncReadExt, LoadContext, LoadState},
    ecs::system::SystemParam,
    prelude::*,
    reflect::TypePath,
    utils::BoxedFuture,
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_ron::de::from_bytes;

use crate::errors::RonLoaderError;
use crate::signal::DialogueCallback;

/// A key into a string table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct LocalizedString {
    /// Name of the string table.
    pub table: String,
    /// Entry inside the table.
    pub entry: String,
}

impl LocalizedString {
    /// Creates a key for `entry` in `table`.
    pub fn new(table: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            entry: entry.into(),
        }
    }

    /// The string shown when a key does not resolve to anything.
    pub fn missing_text(&self) -> String {
        format!("No translation found for '{}' in {}", self.entry, self.table)
    }
}

impl fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.table, self.entry)
    }
}

/// Resolves [`LocalizedString`]s.
///
/// Returns [`Poll::Pending`] while the string cannot be known yet, e.g. when
/// its table is still loading. Once ready, any string is valid display
/// content, including an empty one.
pub trait StringDatabase {
    /// Looks up `key`.
    fn localized_string(&self, key: &LocalizedString) -> Poll<String>;
}

/// A named table of localized entries.
///
/// Loaded from `*.strings.ron` files:
///
/// ```ron
/// (
///     name: "Dialogue",
///     entries: {
///         "greeting": "Hello there!",
///     },
/// )
/// ```
#[derive(Asset, TypePath, Debug, Default, Clone, PartialEq, Deserialize)]
pub struct StringTable {
    /// The table name used by [`LocalizedString::table`].
    pub name: String,
    /// The entries, in file order.
    #[serde(default)]
    pub entries: IndexMap<String, String>,
}

impl StringTable {
    /// Creates a table from `(entry, text)` pairs.
    pub fn new<K, V>(name: impl Into<String>, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses a table from RON bytes.
    pub fn from_ron_bytes(bytes: &[u8]) -> Result<Self, RonLoaderError> {
        Ok(from_bytes::<StringTable>(bytes)?)
    }

    /// The text of `entry`, if present.
    pub fn get(&self, entry: &str) -> Option<&str> {
        self.entries.get(entry).map(String::as_str)
    }

    /// The text of `key.entry`, or the missing text.
    fn resolve(&self, key: &LocalizedString) -> String {
        match self.get(&key.entry) {
            Some(text) => text.to_owned(),
            None => {
                warn!("Entry {} not found in string table {}", key.entry, self.name);
                key.missing_text()
            }
        }
    }
}

/// In-memory tables, keyed by table name. Always ready.
impl StringDatabase for IndexMap<String, StringTable> {
    fn localized_string(&self, key: &LocalizedString) -> Poll<String> {
        match self.get(&key.table) {
            Some(table) => Poll::Ready(table.resolve(key)),
            None => {
                warn!("String table {} not found", key.table);
                Poll::Ready(key.missing_text())
            }
        }
    }
}

/// Load [`StringTable`]s from `strings.ron` assets.
#[derive(Default)]
pub struct StringTableLoader;

impl AssetLoader for StringTableLoader {
    type Asset = StringTable;
    type Settings = ();
    type Error = RonLoaderError;

    fn load<'a>(
        &'a self,
        reader: &'a mut Reader,
        _settings: &'a Self::Settings,
        _load_context: &'a mut LoadContext,
    ) -> BoxedFuture<'a, Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            StringTable::from_ron_bytes(&bytes)
        })
    }

    fn extensions(&self) -> &[&str] {
        &["strings.ron"]
    }
}

/// The string tables known to the app, by table name.
#[derive(Resource, Debug, Default)]
pub struct StringTables {
    /// Handles of the registered tables.
    tables: IndexMap<String, Handle<StringTable>>,
}

impl StringTables {
    /// Registers an already obtained handle under `name`.
    pub fn insert(&mut self, name: impl Into<String>, handle: Handle<StringTable>) {
        self.tables.insert(name.into(), handle);
    }

    /// Starts loading the table at `path` and registers it under `name`.
    pub fn load(&mut self, server: &AssetServer, name: impl Into<String>, path: &str) {
        let handle = server.load(path.to_owned());
        self.insert(name, handle);
    }

    /// The handle registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Handle<StringTable>> {
        self.tables.get(name)
    }
}

/// [`StringDatabase`] over the [`StringTables`] resource and the loaded assets.
///
/// A key is pending while its table is still loading. Unknown tables and
/// tables that failed to load resolve to [`LocalizedString::missing_text`].
#[derive(SystemParam)]
pub struct Localization<'w> {
    /// Registered tables.
    tables: Res<'w, StringTables>,
    /// Loaded tables.
    assets: Res<'w, Assets<StringTable>>,
    /// Used to tell a loading table from a failed one.
    server: Res<'w, AssetServer>,
}

impl StringDatabase for Localization<'_> {
    fn localized_string(&self, key: &LocalizedString) -> Poll<String> {
        let Some(handle) = self.tables.get(&key.table) else {
            warn!("String table {} is not registered", key.table);
            return Poll::Ready(key.missing_text());
        };
        if let Some(table) = self.assets.get(handle) {
            return Poll::Ready(table.resolve(key));
        }
        if self.server.get_load_state(handle) == Some(LoadState::Failed) {
            warn!("String table {} failed to load", key.table);
            return Poll::Ready(key.missing_text());
        }
        Poll::Pending
    }
}

/// A dialogue whose texts still have to go through a [`StringDatabase`].
pub struct LocalizedDialogue {
    /// Key of the speaker name.
    pub speaker: LocalizedString,
    /// Key of the dialogue text.
    pub text: LocalizedString,
    /// Called once the dialogue is shown.
    pub on_show: Option<DialogueCallback>,
    /// Called when the dialogue closes.
    pub on_close: Option<DialogueCallback>,
}

impl LocalizedDialogue {
    /// A localized dialogue without callbacks.
    pub fn new(speaker: LocalizedString, text: LocalizedString) -> Self {
        Self {
            speaker,
            text,
            on_show: None,
            on_close: None,
        }
    }

    /// Sets the callback run when the dialogue is shown.
    pub fn on_show(mut self, callback: DialogueCallback) -> Self {
        self.on_show = Some(callback);
        self
    }

    /// Sets the callback run when the dialogue closes.
    pub fn on_close(mut self, callback: DialogueCallback) -> Self {
        self.on_close = Some(callback);
        self
    }
}

impl fmt::Debug for LocalizedDialogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalizedDialogue")
            .field("speaker", &self.speaker)
            .field("text", &self.text)
            .field("on_show", &self.on_show.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}
