mod source;
pub use source::{BIBLE_DIR, CONFIG_FILE, CorpusSource, DirectorySource, HYMNAL_DIR, LoadError};

mod registry;
pub use registry::CorpusRegistry;

mod hymnal_store;
pub use hymnal_store::HymnalStore;
