//! Marker identifier → display symbol lookup.
//!
//! XMind stores markers as opaque ids (`priority-1`, `task-done`,
//! `flag-red`, ...). They are rendered as emoji in the Markdown output.

use std::collections::HashMap;

/// Built-in marker table.
pub const DEFAULT_MARKERS: &[(&str, &str)] = &[
    // Priority
    ("priority-1", "1️⃣"),
    ("priority-2", "2️⃣"),
    ("priority-3", "3️⃣"),
    ("priority-4", "4️⃣"),
    ("priority-5", "5️⃣"),
    ("priority-6", "6️⃣"),
    ("priority-7", "7️⃣"),
    ("priority-8", "8️⃣"),
    ("priority-9", "9️⃣"),
    // Task progress
    ("task-start", "⬜"),
    ("task-oct", "🕐"),
    ("task-quarter", "🕒"),
    ("task-3oct", "🕓"),
    ("task-half", "🕕"),
    ("task-5oct", "🕖"),
    ("task-3quar", "🕘"),
    ("task-7oct", "🕚"),
    ("task-done", "✅"),
    ("task-pause", "⏸️"),
    // Flags
    ("flag-red", "🚩"),
    ("flag-orange", "🟠"),
    ("flag-yellow", "🟡"),
    ("flag-green", "🟢"),
    ("flag-blue", "🔵"),
    ("flag-purple", "🟣"),
    ("flag-gray", "⚪"),
    ("flag-black", "🏴"),
    // Stars
    ("star-red", "⭐"),
    ("star-orange", "⭐"),
    ("star-yellow", "⭐"),
    ("star-green", "⭐"),
    ("star-blue", "⭐"),
    ("star-purple", "⭐"),
    ("star-gray", "⭐"),
    // Smileys
    ("smiley-smile", "😊"),
    ("smiley-laugh", "😄"),
    ("smiley-angry", "😠"),
    ("smiley-cry", "😢"),
    ("smiley-surprise", "😮"),
    ("smiley-boring", "😐"),
    // Arrows
    ("arrow-up", "⬆️"),
    ("arrow-up-right", "↗️"),
    ("arrow-right", "➡️"),
    ("arrow-down-right", "↘️"),
    ("arrow-down", "⬇️"),
    ("arrow-down-left", "↙️"),
    ("arrow-left", "⬅️"),
    ("arrow-up-left", "↖️"),
    ("arrow-refresh", "🔄"),
    // Symbols
    ("symbol-plus", "➕"),
    ("symbol-minus", "➖"),
    ("symbol-question", "❓"),
    ("symbol-exclam", "❗"),
    ("symbol-info", "ℹ️"),
    ("symbol-wrong", "❌"),
    ("symbol-right", "✔️"),
    ("symbol-attention", "⚠️"),
    ("symbol-lightbulb", "💡"),
    ("symbol-pin", "📌"),
    ("symbol-heart", "❤️"),
    ("symbol-star", "🌟"),
    // Calendar
    ("month-jan", "📅 Jan"),
    ("month-feb", "📅 Feb"),
    ("month-mar", "📅 Mar"),
    ("month-apr", "📅 Apr"),
    ("month-may", "📅 May"),
    ("month-jun", "📅 Jun"),
    ("month-jul", "📅 Jul"),
    ("month-aug", "📅 Aug"),
    ("month-sep", "📅 Sep"),
    ("month-oct", "📅 Oct"),
    ("month-nov", "📅 Nov"),
    ("month-dec", "📅 Dec"),
    ("week-mon", "📆 Mon"),
    ("week-tue", "📆 Tue"),
    ("week-wed", "📆 Wed"),
    ("week-thu", "📆 Thu"),
    ("week-fri", "📆 Fri"),
    ("week-sat", "📆 Sat"),
    ("week-sun", "📆 Sun"),
];

/// Resolves marker ids to symbols.
///
/// Unknown ids are never dropped: they come back as the raw id in square
/// brackets, so a custom marker still shows up in the output.
#[derive(Debug, Clone)]
pub struct MarkerResolver {
    table: HashMap<String, String>,
}

impl Default for MarkerResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerResolver {
    /// Resolver with the built-in table.
    pub fn new() -> Self {
        let table = DEFAULT_MARKERS
            .iter()
            .map(|(id, symbol)| (id.to_string(), symbol.to_string()))
            .collect();
        Self { table }
    }

    /// Resolver with caller overrides merged over the built-in table.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut resolver = Self::new();
        resolver
            .table
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        resolver
    }

    /// Display symbol for a marker id.
    pub fn resolve(&self, marker_id: &str) -> String {
        match self.table.get(marker_id) {
            Some(symbol) => symbol.clone(),
            None => format!("[{marker_id}]"),
        }
    }

    /// Whether the id has an entry (built-in or override).
    pub fn is_known(&self, marker_id: &str) -> bool {
        self.table.contains_key(marker_id)
    }
}
