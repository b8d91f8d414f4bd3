mod prefs;

pub use prefs::PreferenceStore;
